//! Groq API client for chat completions.
//!
//! Groq exposes an OpenAI-compatible `/chat/completions` endpoint. This client only
//! implements the subset needed for JSON-mode analysis prompts.

use crate::analysis::Provider;
use crate::error::{DomainErrorKind, Error, ExternalErrorKind, InternalErrorKind};
use async_trait::async_trait;
use log::*;
use serde::{Deserialize, Serialize};
use service::config::Config;

/// Sampling temperature for analysis requests. Low, to keep phrasing stable between calls.
pub const ANALYSIS_TEMPERATURE: f64 = 0.2;

/// Request body for `POST /chat/completions`
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

/// A single message in a chat conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Constrains the shape of the model's answer
#[derive(Debug, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self {
            format_type: "json_object".to_string(),
        }
    }
}

/// Response from `POST /chat/completions`
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Groq API client
pub struct GroqClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl GroqClient {
    /// Create a new Groq client with the given API key, base URL and model
    pub fn new(api_key: &str, base_url: &str, model: &str) -> Result<Self, Error> {
        let mut headers = reqwest::header::HeaderMap::new();

        let mut header_value = reqwest::header::HeaderValue::from_str(&format!(
            "Bearer {api_key}"
        ))
        .map_err(|e| {
            warn!("Failed to create auth header: {:?}", e);
            Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                    "Invalid API key format".to_string(),
                )),
            }
        })?;
        header_value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, header_value);

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    /// Build a client from configuration.
    ///
    /// Returns `Ok(None)` when no API key is configured; the analysis path is then disabled.
    pub fn from_config(config: &Config) -> Result<Option<Self>, Error> {
        match config.groq_api_key() {
            Some(api_key) => {
                Self::new(api_key, config.groq_base_url(), config.groq_model()).map(Some)
            }
            None => Ok(None),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a chat-completion request and return the decoded response
    pub async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, Error> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!(
            "Requesting Groq chat completion from model {} with {} message(s)",
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to send Groq chat completion: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
                }
            })?;

        if response.status().is_success() {
            let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
                warn!("Failed to parse Groq response: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                        "Invalid response from Groq".to_string(),
                    )),
                }
            })?;
            debug!(
                "Groq chat completion finished: {}",
                completion.id.as_deref().unwrap_or("<no id>")
            );
            Ok(completion)
        } else {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Groq API returned {}: {}", status, error_text);
            Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Other(format!(
                    "Groq API returned {status}"
                ))),
            })
        }
    }
}

#[async_trait]
impl Provider for GroqClient {
    async fn complete_json(&self, system_prompt: &str, user_content: &str) -> Result<String, Error> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(system_prompt),
                ChatMessage::user(user_content),
            ],
            temperature: ANALYSIS_TEMPERATURE,
            response_format: Some(ResponseFormat::json_object()),
        };

        let completion = self.chat_completion(request).await?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                warn!("Groq chat completion contained no message content");
                Error {
                    source: None,
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                        "Empty response from Groq".to_string(),
                    )),
                }
            })
    }

    fn provider_id(&self) -> &str {
        "groq"
    }
}
