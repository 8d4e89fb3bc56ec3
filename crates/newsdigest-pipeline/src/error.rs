use std::io;

use thiserror::Error;

use newsdigest_core::{FeedUnavailable, SummarizerProvider};

use crate::orchestrator::Stage;

/// Failures reading or writing the notified cache file.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to read cache file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("cache file {path} is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write cache file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize cache: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A failure that aborts one target. The orchestrator reports it to the
/// target's recipient and moves on to the next target.
#[derive(Debug, Error)]
pub enum TargetError {
    #[error(transparent)]
    Feed(#[from] FeedUnavailable),

    #[error("failed to create {provider} summarizer: {message}")]
    SummarizerInit {
        provider: SummarizerProvider,
        message: String,
    },

    #[error("delivery failed: {0}")]
    Delivery(String),
}

impl TargetError {
    /// The stage the target was in when it failed.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            TargetError::Feed(_) => Stage::Collecting,
            TargetError::SummarizerInit { .. } => Stage::Summarizing,
            TargetError::Delivery(_) => Stage::Notifying,
        }
    }
}
