use std::str::FromStr;

/// Customer sentiment label assigned to a call.
///
/// The model is asked for one of the first three; `Unknown` marks a failed analysis.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    Unknown,
}

#[derive(Debug, PartialEq, Eq)]
pub struct SentimentParseError;

impl std::fmt::Display for SentimentParseError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(fmt, "not a known sentiment label")
    }
}

impl std::error::Error for SentimentParseError {}

impl FromStr for Sentiment {
    type Err = SentimentParseError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label.trim().to_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            "unknown" => Ok(Sentiment::Unknown),
            _ => Err(SentimentParseError),
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(fmt, "Positive"),
            Sentiment::Neutral => write!(fmt, "Neutral"),
            Sentiment::Negative => write!(fmt, "Negative"),
            Sentiment::Unknown => write!(fmt, "Unknown"),
        }
    }
}
