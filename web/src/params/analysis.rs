use domain::analysis as AnalysisApi;
use domain::error::Error as DomainError;
use utoipa::ToSchema;

/// Request body for `POST /analyze`.
#[derive(Debug, ToSchema)]
pub(crate) struct AnalyzeParams {
    /// Raw text of the customer call. May be empty.
    #[schema(example = "Customer called about billing.")]
    pub transcript: String,
}

impl AnalyzeParams {
    /// Parses the raw request body. Any body without a `transcript` key is rejected with
    /// the same input error, whether it is empty, malformed or simply missing the key.
    pub fn from_body(body: &[u8]) -> Result<Self, DomainError> {
        AnalysisApi::transcript_from_body(body).map(|transcript| Self { transcript })
    }
}
