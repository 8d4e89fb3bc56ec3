use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A single news entry produced by a feed source.
///
/// `url` is the identity of the item: deduplication and the notified cache
/// both key on it. `summary` and `relevance_score` start empty and are filled
/// in by later pipeline stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    pub published_at: DateTime<FixedOffset>,
    pub description: String,
    /// Language-model summary. `None` until summarized, or when summarization failed.
    pub summary: Option<String>,
    /// Keyword relevance in `[0.0, 1.0]`. Set by the scorer.
    pub relevance_score: Option<f32>,
}

impl NewsItem {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        published_at: DateTime<FixedOffset>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            published_at,
            description: description.into(),
            summary: None,
            relevance_score: None,
        }
    }

    /// Text to show a reader: the summary when available, else the feed description.
    #[must_use]
    pub fn display_text(&self) -> &str {
        match self.summary.as_deref() {
            Some(summary) if !summary.is_empty() => summary,
            _ => &self.description,
        }
    }
}
