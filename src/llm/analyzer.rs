use std::time::Duration;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};
use super::config::LLMConfig;

/// Upper bound on a single call to the model endpoint.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Prefix of the text rendered in place of an analysis when the model call fails.
pub const ERROR_PREFIX: &str = "Error calling model: ";

const SYSTEM_PROMPT: &str = "You are a helpful release-note explainer for engineers.";

#[derive(Debug, Error)]
pub enum ModelCallError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("invalid JSON in model response: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("model response has no string at choices[0].message.content")]
    MissingContent,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl ChatCompletionRequest {
    pub fn new(model: &str, text: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_prompt(text),
                },
            ],
        }
    }
}

/// Wraps the pasted text in the fixed instructions sent as the user message.
pub fn build_prompt(text: &str) -> String {
    format!(
        "
You are a concise assistant for dev and platform teams.

The user will paste release notes, logs, or configuration text.

Please respond with:

1. A very short summary (2-3 bullet points).
2. Any potential BREAKING CHANGES (if none, say 'None spotted').
3. Action items for a DevOps / Platform engineer.

Here is the text:

{}
",
        text
    )
}

/// Relay between the web form and the chat-completions endpoint.
///
/// Holds one HTTP client for the whole process; every call builds its own
/// payload, so concurrent requests never share mutable state.
pub struct Analyzer {
    client: Client,
    config: LLMConfig,
    timeout: Duration,
}

impl Analyzer {
    pub fn new(config: LLMConfig) -> Result<Self> {
        Self::with_timeout(config, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(config: LLMConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, config, timeout })
    }

    pub fn config(&self) -> &LLMConfig {
        &self.config
    }

    /// Returns the model's reply, or the error text prefixed with [`ERROR_PREFIX`].
    /// Never fails, so the page can always be rendered.
    pub async fn explain(&self, text: &str) -> String {
        match self.request_analysis(text).await {
            Ok(content) => content,
            Err(e) => {
                warn!("Model call to {} failed: {}", self.config.completions_url(), e);
                format!("{}{}", ERROR_PREFIX, e)
            }
        }
    }

    pub async fn request_analysis(&self, text: &str) -> Result<String, ModelCallError> {
        let url = self.config.completions_url();
        let request_body = ChatCompletionRequest::new(&self.config.model_name, text);

        info!(
            "Requesting analysis from {} ({} chars of input)",
            self.config.model_name,
            text.chars().count()
        );

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| self.request_error(e))?
            .error_for_status()
            .map_err(|e| self.request_error(e))?;

        let body = response.text().await.map_err(|e| self.request_error(e))?;
        let response_json: Value = serde_json::from_str(&body)?;

        extract_content(&response_json)
    }

    fn request_error(&self, err: reqwest::Error) -> ModelCallError {
        if err.is_timeout() {
            ModelCallError::Timeout(self.timeout)
        } else {
            ModelCallError::Http(err)
        }
    }
}

/// Reads `choices[0].message.content`. Only a JSON string counts as a reply;
/// `null`, numbers and objects are reported as [`ModelCallError::MissingContent`].
fn extract_content(response_json: &Value) -> Result<String, ModelCallError> {
    response_json["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            let response_str = serde_json::to_string_pretty(response_json)
                .unwrap_or_else(|_| "Failed to format response".to_string());
            debug!("Invalid response format. Full response: {}", response_str);
            ModelCallError::MissingContent
        })
}
