use crate::sentiment::Sentiment;
use serde_json::{Map, Value};

/// Summary substituted when the model could not be reached or answered with unusable content.
pub const FALLBACK_SUMMARY: &str = "Error in analysis.";

/// Summary and sentiment as returned by the language model.
///
/// Either field may be missing from the model's answer; callers decide how to fill gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    pub summary: Option<String>,
    pub sentiment: Option<String>,
}

impl Analysis {
    /// The fixed result used in place of a failed analysis.
    pub fn fallback() -> Self {
        Self {
            summary: Some(FALLBACK_SUMMARY.to_string()),
            sentiment: Some(Sentiment::Unknown.to_string()),
        }
    }

    /// Picks `summary` and `sentiment` out of the model's JSON object.
    ///
    /// Strings are taken as-is, `null` counts as missing, and any other JSON value
    /// is kept as its compact JSON text. Other keys are ignored.
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        Self {
            summary: object.get("summary").and_then(value_text),
            sentiment: object.get("sentiment").and_then(value_text),
        }
    }

    /// The sentiment as one of the known labels, if it is one.
    pub fn known_sentiment(&self) -> Option<Sentiment> {
        self.sentiment.as_deref().and_then(|label| label.parse().ok())
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
