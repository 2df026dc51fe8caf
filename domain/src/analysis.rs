//! Call transcript analysis: one language-model call, parsed into a summary and sentiment.

use crate::call_log::CallLog;
use crate::error::{DomainErrorKind, Error, ExternalErrorKind};
use async_trait::async_trait;
use entity::{Analysis, CallRecord};
use log::*;
use serde_json::Value;

/// Message returned to callers whose request body has no `transcript` key.
pub const MISSING_TRANSCRIPT_MESSAGE: &str = "Missing 'transcript' in request body";

/// Message returned to callers when no language-model client was configured at startup.
pub const CLIENT_NOT_INITIALIZED_MESSAGE: &str = "Groq client is not initialized. Check API key.";

/// Instruction sent ahead of every transcript.
pub const SYSTEM_PROMPT: &str = "You are an expert in conversation analysis. \
    Analyze the following customer call transcript. \
    Provide a concise summary in 2-3 sentences. \
    Also, determine the customer's sentiment as one of these three options: 'Positive', 'Neutral', or 'Negative'. \
    Please respond with ONLY a valid JSON object with two keys: 'summary' and 'sentiment'.";

/// A language model that answers a system prompt plus user content with JSON text.
///
/// Implementations report every failure (network, auth, bad envelope) as an `Err`;
/// deciding what to do about it is left to `analyze_transcript`.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Run the prompt and return the raw text of the model's answer.
    async fn complete_json(&self, system_prompt: &str, user_content: &str)
        -> Result<String, Error>;

    /// Short lowercase name of the provider, used in log output.
    fn provider_id(&self) -> &str;
}

/// Pulls the transcript out of a raw request body.
///
/// Only the presence of the `transcript` key is checked: an empty string is accepted.
/// A body that is empty, not JSON, or not a JSON object is treated as missing the key.
/// A non-string value is used as its compact JSON text.
pub fn transcript_from_body(body: &[u8]) -> Result<String, Error> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        debug!("Rejecting analysis request with unparsable body: {e}");
        Error::invalid(MISSING_TRANSCRIPT_MESSAGE)
    })?;

    match value.get("transcript") {
        Some(Value::String(transcript)) => Ok(transcript.clone()),
        Some(other) => Ok(other.to_string()),
        None => Err(Error::invalid(MISSING_TRANSCRIPT_MESSAGE)),
    }
}

/// Ask the model for a summary and sentiment of `transcript`.
///
/// Returns a configuration error when `provider` is `None`. Every failure of the call
/// itself, including an answer that is not a JSON object, yields `Analysis::fallback()`.
pub async fn analyze_transcript(
    provider: Option<&dyn Provider>,
    transcript: &str,
) -> Result<Analysis, Error> {
    let provider = provider.ok_or_else(|| Error::config(CLIENT_NOT_INITIALIZED_MESSAGE))?;

    let analysis = match provider.complete_json(SYSTEM_PROMPT, transcript).await {
        Ok(content) => match parse_model_output(&content) {
            Ok(analysis) => analysis,
            Err(e) => {
                error!(
                    "Could not parse {} response as a JSON object: {e}, response: {content}",
                    provider.provider_id()
                );
                Analysis::fallback()
            }
        },
        Err(e) => {
            error!(
                "An error occurred with the {} API: {e}",
                provider.provider_id()
            );
            Analysis::fallback()
        }
    };

    if let Some(label) = analysis.sentiment.as_deref() {
        if analysis.known_sentiment().is_none() {
            warn!("Model returned unexpected sentiment label: {label}");
        }
    }

    Ok(analysis)
}

/// Analyze `transcript`, append the result to `call_log`, and return the logged record.
///
/// Nothing is appended when no provider is configured.
pub async fn analyze_and_record(
    provider: Option<&dyn Provider>,
    call_log: &CallLog,
    transcript: String,
) -> Result<CallRecord, Error> {
    let analysis = analyze_transcript(provider, &transcript).await?;
    let record = CallRecord::new(transcript, analysis);

    call_log.append(&record).await?;

    for line in completion_trace(&record) {
        info!("{line}");
    }

    Ok(record)
}

/// Human-readable lines describing one finished analysis, in log order.
fn completion_trace(record: &CallRecord) -> [String; 5] {
    [
        "--- Call Analysis Complete ---".to_string(),
        format!("Original Transcript: {}", record.transcript),
        format!("Summary: {}", record.summary),
        format!("Sentiment: {}", record.sentiment),
        "----------------------------".to_string(),
    ]
}

fn parse_model_output(content: &str) -> Result<Analysis, Error> {
    match serde_json::from_str::<Value>(content)? {
        Value::Object(object) => Ok(Analysis::from_json_object(&object)),
        other => Err(Error {
            source: None,
            error_kind: DomainErrorKind::External(ExternalErrorKind::Other(format!(
                "Expected a JSON object from model, got {other}"
            ))),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InternalErrorKind;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Provider that replays a canned answer and records what it was asked.
    struct StubProvider {
        answer: fn() -> Result<String, Error>,
        requests: Mutex<Vec<(String, String)>>,
    }

    impl StubProvider {
        fn new(answer: fn() -> Result<String, Error>) -> Self {
            Self {
                answer,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Provider for StubProvider {
        async fn complete_json(
            &self,
            system_prompt: &str,
            user_content: &str,
        ) -> Result<String, Error> {
            self.requests
                .lock()
                .unwrap()
                .push((system_prompt.to_string(), user_content.to_string()));
            (self.answer)()
        }

        fn provider_id(&self) -> &str {
            "stub"
        }
    }

    fn network_failure() -> Result<String, Error> {
        Err(Error {
            source: None,
            error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
        })
    }

    fn line_count(call_log: &CallLog) -> usize {
        std::fs::read_to_string(call_log.path())
            .map(|contents| contents.lines().count())
            .unwrap_or(0)
    }

    #[test]
    fn test_transcript_from_body_requires_the_key() {
        assert_eq!(
            transcript_from_body(br#"{"transcript":"hi"}"#).unwrap(),
            "hi"
        );
        assert_eq!(transcript_from_body(br#"{"transcript":""}"#).unwrap(), "");

        for body in [
            &b""[..],
            b"not json",
            b"[]",
            b"\"transcript\"",
            br#"{"text":"hi"}"#,
        ] {
            let err = transcript_from_body(body).unwrap_err();
            assert_eq!(
                err.error_kind,
                DomainErrorKind::Internal(InternalErrorKind::Invalid(
                    MISSING_TRANSCRIPT_MESSAGE.to_string()
                ))
            );
        }
    }

    #[test]
    fn test_transcript_from_body_renders_non_string_values_as_json() {
        assert_eq!(
            transcript_from_body(br#"{"transcript":42}"#).unwrap(),
            "42"
        );
        assert_eq!(
            transcript_from_body(br#"{"transcript":null}"#).unwrap(),
            "null"
        );
    }

    #[tokio::test]
    async fn test_analyze_transcript_without_provider_is_config_error() {
        let err = analyze_transcript(None, "hello").await.unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Config(
                CLIENT_NOT_INITIALIZED_MESSAGE.to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_analyze_transcript_sends_fixed_prompt_and_parses_answer() {
        let provider = StubProvider::new(|| {
            Ok(r#"{"summary":"Billing inquiry.","sentiment":"Neutral"}"#.to_string())
        });

        let analysis = analyze_transcript(Some(&provider), "Customer called about billing.")
            .await
            .unwrap();

        assert_eq!(analysis.summary.as_deref(), Some("Billing inquiry."));
        assert_eq!(analysis.sentiment.as_deref(), Some("Neutral"));

        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, SYSTEM_PROMPT);
        assert_eq!(requests[0].1, "Customer called about billing.");
    }

    #[tokio::test]
    async fn test_analyze_transcript_falls_back_when_call_fails() {
        let provider = StubProvider::new(network_failure);

        let analysis = analyze_transcript(Some(&provider), "hello").await.unwrap();

        assert_eq!(analysis, Analysis::fallback());
    }

    #[tokio::test]
    async fn test_analyze_transcript_falls_back_on_non_json_or_non_object_answers() {
        for answer in [
            (|| Ok("Sure! Here is the summary.".to_string())) as fn() -> Result<String, Error>,
            || Ok(r#"["Billing inquiry.","Neutral"]"#.to_string()),
        ] {
            let provider = StubProvider::new(answer);
            let analysis = analyze_transcript(Some(&provider), "hello").await.unwrap();
            assert_eq!(analysis, Analysis::fallback());
        }
    }

    #[tokio::test]
    async fn test_analyze_transcript_passes_unexpected_labels_through() {
        let provider =
            StubProvider::new(|| Ok(r#"{"summary":"Mixed call.","sentiment":"Mixed"}"#.to_string()));

        let analysis = analyze_transcript(Some(&provider), "hello").await.unwrap();

        assert_eq!(analysis.sentiment.as_deref(), Some("Mixed"));
    }

    #[tokio::test]
    async fn test_analyze_and_record_appends_one_row_per_call() {
        let dir = TempDir::new().unwrap();
        let call_log = CallLog::new(dir.path().join("calls.csv"));
        let provider = StubProvider::new(|| Ok(r#"{"summary":"Short call."}"#.to_string()));

        let record = analyze_and_record(Some(&provider), &call_log, "hi".to_string())
            .await
            .unwrap();

        assert_eq!(record.summary, "Short call.");
        assert_eq!(record.sentiment, "N/A");
        assert_eq!(line_count(&call_log), 2);

        analyze_and_record(Some(&provider), &call_log, "hi".to_string())
            .await
            .unwrap();
        assert_eq!(line_count(&call_log), 3);
    }

    #[tokio::test]
    async fn test_analyze_and_record_without_provider_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let call_log = CallLog::new(dir.path().join("calls.csv"));

        let result = analyze_and_record(None, &call_log, "hi".to_string()).await;

        assert!(result.is_err());
        assert!(!call_log.path().exists());
    }

    #[test]
    fn test_completion_trace_lists_transcript_summary_and_sentiment() {
        let record = CallRecord::new(
            "Customer called about billing.",
            Analysis {
                summary: Some("Billing inquiry.".to_string()),
                sentiment: None,
            },
        );

        let trace = completion_trace(&record);

        assert_eq!(trace[0], "--- Call Analysis Complete ---");
        assert_eq!(trace[1], "Original Transcript: Customer called about billing.");
        assert_eq!(trace[2], "Summary: Billing inquiry.");
        assert_eq!(trace[3], "Sentiment: N/A");
        assert!(trace[4].chars().all(|c| c == '-'));
    }

    #[tokio::test]
    async fn test_analyze_and_record_logs_fallback_values() {
        let dir = TempDir::new().unwrap();
        let call_log = CallLog::new(dir.path().join("calls.csv"));
        let provider = StubProvider::new(network_failure);

        let record = analyze_and_record(Some(&provider), &call_log, "hi".to_string())
            .await
            .unwrap();

        assert_eq!(record, CallRecord::new("hi", Analysis::fallback()));
        let contents = std::fs::read_to_string(call_log.path()).unwrap();
        assert!(contents.ends_with("hi,Error in analysis.,Unknown\r\n"));
    }
}
