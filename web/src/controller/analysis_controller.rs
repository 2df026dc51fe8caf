//! Controller for call transcript analysis.

use crate::error::ErrorBody;
use crate::params::analysis::AnalyzeParams;
use crate::{AppState, Error};

use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use domain::analysis as AnalysisApi;
use domain::CallRecord;
use log::*;

/// POST /analyze
///
/// Summarize a call transcript and classify the customer's sentiment.
/// Every successful analysis is also appended to the call log.
#[utoipa::path(
    post,
    path = "/analyze",
    request_body = AnalyzeParams,
    responses(
        (status = 200, description = "Transcript analyzed and logged", body = CallRecord),
        (status = 400, description = "Missing 'transcript' in request body", body = ErrorBody),
        (status = 500, description = "Analysis client is not configured", body = ErrorBody),
    )
)]
pub async fn analyze(
    State(app_state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, Error> {
    let params = AnalyzeParams::from_body(&body)?;

    debug!(
        "POST analyze transcript ({} bytes)",
        params.transcript.len()
    );

    let record = AnalysisApi::analyze_and_record(
        app_state.analyzer(),
        app_state.call_log(),
        params.transcript,
    )
    .await?;

    Ok(Json(record))
}
