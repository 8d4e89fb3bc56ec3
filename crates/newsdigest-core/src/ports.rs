//! Contracts for the pipeline's external collaborators.
//!
//! The pipeline runs on a single-threaded runtime and awaits every call in
//! sequence, so these traits use native `async fn` and do not require `Send`
//! futures.
#![allow(async_fn_in_trait)]

use std::collections::HashSet;
use std::fmt::Display;

use crate::{NewsItem, SummarizerProvider};

/// Every keyword query of a collection call failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("feed unavailable: all {attempted} keyword queries failed (last error: {last_error})")]
pub struct FeedUnavailable {
    pub attempted: usize,
    pub last_error: String,
}

/// Source of news items for keyword searches.
pub trait FeedSource {
    type Error: Display;

    /// Run one keyword sub-query.
    ///
    /// Entries that cannot be parsed are skipped by the implementation.
    async fn fetch_keyword(&self, keyword: &str) -> Result<Vec<NewsItem>, Self::Error>;

    /// Fetch items for every keyword, deduplicated by URL in first-seen order.
    ///
    /// A failing keyword is logged and contributes zero items.
    ///
    /// # Errors
    ///
    /// Returns [`FeedUnavailable`] only when every keyword query failed.
    async fn fetch_for_keywords(
        &self,
        keywords: &[String],
    ) -> Result<Vec<NewsItem>, FeedUnavailable> {
        let mut seen_urls: HashSet<String> = HashSet::new();
        let mut items = Vec::new();
        let mut failures = 0usize;
        let mut last_error = None;

        for keyword in keywords {
            match self.fetch_keyword(keyword).await {
                Ok(fetched) => {
                    let before = items.len();
                    for item in fetched {
                        if seen_urls.insert(item.url.clone()) {
                            items.push(item);
                        }
                    }
                    tracing::debug!(
                        keyword = %keyword,
                        count = items.len() - before,
                        "keyword query returned items"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        keyword = %keyword,
                        error = %e,
                        "keyword query failed; continuing with remaining keywords"
                    );
                    failures += 1;
                    last_error = Some(e.to_string());
                }
            }
        }

        if !keywords.is_empty() && failures == keywords.len() {
            return Err(FeedUnavailable {
                attempted: failures,
                last_error: last_error.unwrap_or_default(),
            });
        }

        Ok(items)
    }
}

/// Language-model summarizer.
pub trait Summarizer {
    type Error: Display;

    /// Summarize `text`. Empty provider output is an error.
    async fn summarize(&self, text: &str) -> Result<String, Self::Error>;
}

/// Builds the summarizer a target selected.
pub trait SummarizerFactory {
    type Summarizer: Summarizer;
    type Error: Display;

    /// # Errors
    ///
    /// Returns `Self::Error` when the provider cannot be constructed
    /// (missing credentials, HTTP client build failure).
    fn create(&self, provider: SummarizerProvider) -> Result<Self::Summarizer, Self::Error>;
}

/// Push delivery of digests and error reports.
pub trait Notifier {
    type Error: Display;

    /// Deliver `items` to `recipient_id` as one digest labelled `label`.
    ///
    /// Delivering an empty slice is a no-op that returns `Ok`.
    async fn deliver(
        &self,
        recipient_id: &str,
        items: &[NewsItem],
        label: &str,
    ) -> Result<(), Self::Error>;

    /// Best-effort error report to `recipient_id`.
    async fn deliver_error(&self, recipient_id: &str, message: &str) -> Result<(), Self::Error>;
}
