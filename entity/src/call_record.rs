use crate::analysis::Analysis;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Placeholder for a field the model left out of its answer.
pub const NOT_AVAILABLE: &str = "N/A";

/// Column names of the call log, in row order.
pub const COLUMNS: [&str; 3] = ["Transcript", "Summary", "Sentiment"];

/// One analyzed call: the body of a successful `/analyze` response and one row of the call log.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct CallRecord {
    #[schema(example = "Customer called about billing.")]
    pub transcript: String,
    #[schema(example = "Billing inquiry.")]
    pub summary: String,
    #[schema(example = "Neutral")]
    pub sentiment: String,
}

impl CallRecord {
    /// Combines a transcript with its analysis, filling each missing field with `N/A`.
    pub fn new(transcript: impl Into<String>, analysis: Analysis) -> Self {
        Self {
            transcript: transcript.into(),
            summary: analysis
                .summary
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            sentiment: analysis
                .sentiment
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }

    /// Field values in `COLUMNS` order.
    pub fn fields(&self) -> [&str; 3] {
        [
            self.transcript.as_str(),
            self.summary.as_str(),
            self.sentiment.as_str(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_copies_analysis_fields() {
        let record = CallRecord::new(
            "Customer called about billing.",
            Analysis {
                summary: Some("Billing inquiry.".to_string()),
                sentiment: Some("Neutral".to_string()),
            },
        );

        assert_eq!(
            record.fields(),
            ["Customer called about billing.", "Billing inquiry.", "Neutral"]
        );
    }

    #[test]
    fn test_new_defaults_each_missing_field_independently() {
        let no_summary = CallRecord::new(
            "t",
            Analysis {
                summary: None,
                sentiment: Some("Positive".to_string()),
            },
        );
        assert_eq!(no_summary.summary, "N/A");
        assert_eq!(no_summary.sentiment, "Positive");

        let no_sentiment = CallRecord::new(
            "t",
            Analysis {
                summary: Some("Short call.".to_string()),
                sentiment: None,
            },
        );
        assert_eq!(no_sentiment.summary, "Short call.");
        assert_eq!(no_sentiment.sentiment, "N/A");
    }

    #[test]
    fn test_serializes_to_the_response_shape() {
        let record = CallRecord::new("hello", Analysis::fallback());
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "transcript": "hello",
                "summary": "Error in analysis.",
                "sentiment": "Unknown"
            })
        );
    }
}
