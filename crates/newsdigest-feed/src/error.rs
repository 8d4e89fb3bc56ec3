use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// Network failure, timeout, or non-2xx status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),
}
