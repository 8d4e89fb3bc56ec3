//! Google Gemini `generateContent` client.

use reqwest::Client;
use serde::Deserialize;

use crate::error::LlmError;
use crate::prompt::summary_prompt;

/// Public Gemini API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const PROVIDER: &str = "gemini";

pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    language: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
    /// Creates a client pointed at the public Gemini API.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::MissingApiKey`] for a blank key and
    /// [`LlmError::Http`] if the `reqwest::Client` cannot be constructed.
    pub fn new(
        api_key: &str,
        model: &str,
        language: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, LlmError> {
        Self::with_base_url(
            api_key,
            model,
            language,
            timeout_secs,
            user_agent,
            DEFAULT_BASE_URL,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`GeminiClient::new`].
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        language: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey);
        }
        let client = crate::build_http_client(timeout_secs, user_agent)?;
        tracing::debug!(model = %model, "gemini client initialized");

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            language: language.to_string(),
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Summarize `text` with one `generateContent` call.
    ///
    /// # Errors
    ///
    /// - [`LlmError::Http`] on network failure or timeout.
    /// - [`LlmError::UnexpectedStatus`] on a non-2xx response.
    /// - [`LlmError::Deserialize`] if the body does not match the response shape.
    /// - [`LlmError::EmptyResponse`] when no candidate text comes back.
    pub async fn summarize(&self, text: &str) -> Result<String, LlmError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = serde_json::json!({
            "contents": [
                { "parts": [ { "text": summary_prompt(&self.language, text) } ] }
            ]
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;
        let response = crate::check_status(PROVIDER, response).await?;
        let raw = response.text().await?;

        let parsed: GenerateContentResponse =
            serde_json::from_str(&raw).map_err(|e| LlmError::Deserialize {
                context: format!("gemini generateContent(model={})", self.model),
                source: e,
            })?;

        let summary = extract_text(&parsed);
        if summary.is_empty() {
            return Err(LlmError::EmptyResponse { provider: PROVIDER });
        }

        tracing::debug!(length = summary.chars().count(), "gemini summary generated");
        Ok(summary)
    }
}

/// Concatenate the text parts of the first candidate, trimmed.
fn extract_text(response: &GenerateContentResponse) -> String {
    response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<String>()
        })
        .unwrap_or_default()
        .trim()
        .to_string()
}
