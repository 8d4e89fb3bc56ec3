use thiserror::Error;

/// Errors returned by the summarizer clients.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} returned HTTP {status}: {body}")]
    UnexpectedStatus {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{provider} returned an empty summary")]
    EmptyResponse { provider: &'static str },

    #[error("GEMINI_API_KEY is required for the gemini summarizer")]
    MissingApiKey,
}
