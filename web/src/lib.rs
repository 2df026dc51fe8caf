use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use domain::analysis::Provider;
use domain::call_log::CallLog;
use log::*;
use service::config::Config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};

mod controller;
mod error;
mod params;
pub mod router;

pub use error::{Error, Result};

// Everything a request handler needs, built once at startup.
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    analyzer: Option<Arc<dyn Provider>>,
    call_log: CallLog,
}

impl AppState {
    /// `analyzer` is `None` when no API key was configured; `/analyze` then answers 500.
    pub fn new(config: Config, analyzer: Option<Arc<dyn Provider>>, call_log: CallLog) -> Self {
        Self {
            config,
            analyzer,
            call_log,
        }
    }

    pub fn analyzer(&self) -> Option<&dyn Provider> {
        self.analyzer.as_deref()
    }

    pub fn call_log(&self) -> &CallLog {
        &self.call_log
    }
}

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let server_url = format!("{}:{}", app_state.config.interface, app_state.config.port);
    let cors_layer = cors_layer(&app_state.config);

    let listener = TcpListener::bind(&server_url).await?;
    info!("Server starting... listening for connections on http://{server_url}");

    let router = router::define_routes(app_state).layer(cors_layer);

    axum::serve(listener, router).await
}

fn cors_layer(config: &Config) -> CorsLayer {
    let allow_origin = if config.allowed_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("Ignoring invalid CORS origin {origin:?}: {e}");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
}
