//! Map a summarizer over items, tolerating per-item failure.

use newsdigest_core::{NewsItem, Summarizer};

pub struct SummarizationStage<S> {
    summarizer: S,
}

impl<S: Summarizer> SummarizationStage<S> {
    #[must_use]
    pub fn new(summarizer: S) -> Self {
        Self { summarizer }
    }

    /// Summarize every item in order.
    ///
    /// A failed item is logged and kept with `summary = None`. Never fails.
    pub async fn summarize_all(&self, items: Vec<NewsItem>) -> Vec<NewsItem> {
        let total = items.len();
        let mut succeeded = 0usize;
        let mut out = Vec::with_capacity(total);

        for mut item in items {
            match self.summarizer.summarize(&article_text(&item)).await {
                Ok(summary) => {
                    item.summary = Some(summary);
                    succeeded += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        url = %item.url,
                        error = %e,
                        "summarization failed; keeping item without summary"
                    );
                }
            }
            out.push(item);
        }

        tracing::info!(
            succeeded,
            failed = total - succeeded,
            "summarization finished"
        );
        out
    }

    /// Summarize a single item.
    ///
    /// # Errors
    ///
    /// Propagates the summarizer's error.
    pub async fn summarize_one(&self, mut item: NewsItem) -> Result<NewsItem, S::Error> {
        let summary = self.summarizer.summarize(&article_text(&item)).await?;
        item.summary = Some(summary);
        Ok(item)
    }
}

fn article_text(item: &NewsItem) -> String {
    format!("{}\n\n{}", item.title, item.description)
}
