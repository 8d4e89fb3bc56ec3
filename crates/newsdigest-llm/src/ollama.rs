//! Ollama `/api/generate` client for locally hosted models.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::prompt::summary_prompt;

const PROVIDER: &str = "ollama";

pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    language: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl OllamaClient {
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the `reqwest::Client` cannot be constructed.
    pub fn new(
        base_url: &str,
        model: &str,
        language: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, LlmError> {
        let client = crate::build_http_client(timeout_secs, user_agent)?;
        tracing::debug!(url = %base_url, model = %model, "ollama client initialized");

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            language: language.to_string(),
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Summarize `text` with a non-streaming generate call.
    ///
    /// # Errors
    ///
    /// - [`LlmError::Http`] on network failure or timeout.
    /// - [`LlmError::UnexpectedStatus`] on a non-2xx response.
    /// - [`LlmError::Deserialize`] if the body is not the expected JSON.
    /// - [`LlmError::EmptyResponse`] when `response` is blank.
    pub async fn summarize(&self, text: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt: summary_prompt(&self.language, text),
            stream: false,
        };

        let response = self.client.post(&url).json(&request).send().await?;
        let response = crate::check_status(PROVIDER, response).await?;
        let raw = response.text().await?;

        let parsed: GenerateResponse =
            serde_json::from_str(&raw).map_err(|e| LlmError::Deserialize {
                context: format!("ollama generate(model={})", self.model),
                source: e,
            })?;

        let summary = parsed.response.trim().to_string();
        if summary.is_empty() {
            return Err(LlmError::EmptyResponse { provider: PROVIDER });
        }

        tracing::debug!(length = summary.chars().count(), "ollama summary generated");
        Ok(summary)
    }
}
