use domain::analysis::Provider;
use domain::call_log::CallLog;
use domain::gateway::groq::GroqClient;
use log::{error, info};
use service::{config::Config, logging::Logger};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config as &Config);

    info!(
        "Starting call analysis service [{}] with model {}",
        config.runtime_env(),
        config.groq_model()
    );

    let analyzer: Option<Arc<dyn Provider>> = match GroqClient::from_config(&config) {
        Ok(Some(client)) => Some(Arc::new(client)),
        Ok(None) => {
            error!("GROQ_API_KEY not found in environment variables; /analyze will answer 500");
            None
        }
        Err(e) => {
            error!("Failed to initialize Groq client: {e:?}; /analyze will answer 500");
            None
        }
    };

    let call_log = CallLog::new(config.analysis_log_path());
    if let Err(e) = call_log.ensure_header().await {
        error!(
            "Failed to prepare call log at {}: {e:?}",
            call_log.path().display()
        );
        std::process::exit(1);
    }

    let app_state = web::AppState::new(config, analyzer, call_log);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server exited with error: {e}");
        std::process::exit(1);
    }
}
