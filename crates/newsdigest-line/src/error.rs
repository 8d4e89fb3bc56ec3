use thiserror::Error;

/// Errors returned by the LINE push client.
#[derive(Debug, Error)]
pub enum LineError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// LINE rejected the push (bad token, unknown recipient, rate limit).
    #[error("LINE push failed with HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
}
