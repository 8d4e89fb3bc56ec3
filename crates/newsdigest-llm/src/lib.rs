//! Language-model summarizers: Google Gemini and a local Ollama server.

pub mod client;
pub mod error;
pub mod factory;
pub mod gemini;
pub mod ollama;
pub(crate) mod prompt;

pub use client::SummarizerClient;
pub use error::LlmError;
pub use factory::{LlmFactory, LlmSettings};
pub use gemini::GeminiClient;
pub use ollama::OllamaClient;

use std::time::Duration;

/// Shared `reqwest::Client` construction for both providers.
pub(crate) fn build_http_client(
    timeout_secs: u64,
    user_agent: &str,
) -> Result<reqwest::Client, LlmError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Turn a non-2xx response into [`LlmError::UnexpectedStatus`], keeping the body.
pub(crate) async fn check_status(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(LlmError::UnexpectedStatus {
        provider,
        status: status.as_u16(),
        body,
    })
}
