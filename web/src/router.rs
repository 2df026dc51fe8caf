use crate::controller::{analysis_controller, health_check_controller};
use crate::{error::ErrorBody, params, AppState};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Call Analysis API"
        ),
        paths(
            analysis_controller::analyze,
            health_check_controller::health_check,
        ),
        components(
            schemas(
                domain::CallRecord,
                ErrorBody,
                params::analysis::AnalyzeParams,
            )
        ),
        tags(
            (name = "call_analysis", description = "Call transcript summarization and sentiment API")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(analysis_routes(app_state))
        .merge(health_routes())
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn analysis_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/analyze", post(analysis_controller::analyze))
        // Transcripts of long calls are accepted whatever their size.
        .layer(DefaultBodyLimit::disable())
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}
