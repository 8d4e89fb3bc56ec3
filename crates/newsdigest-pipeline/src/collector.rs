//! Fetch, same-day filter, and notified-cache dedup for one keyword set.

use newsdigest_core::{FeedSource, FeedUnavailable, NewsItem};

use crate::cache::NotifiedCache;
use crate::recency::DayWindow;

/// Produces the genuinely new, same-day items for a keyword set.
pub struct CollectionPipeline<'a, F> {
    source: &'a F,
    window: DayWindow,
}

impl<'a, F: FeedSource> CollectionPipeline<'a, F> {
    #[must_use]
    pub fn new(source: &'a F, window: DayWindow) -> Self {
        Self { source, window }
    }

    /// Fetch candidates for `keywords` and keep those published inside the
    /// window that are not already in `cache`, in fetch order.
    ///
    /// # Errors
    ///
    /// Returns [`FeedUnavailable`] when every keyword query failed.
    pub async fn collect(
        &self,
        cache: &NotifiedCache,
        keywords: &[String],
    ) -> Result<Vec<NewsItem>, FeedUnavailable> {
        let fetched = self.source.fetch_for_keywords(keywords).await?;
        let fetched_count = fetched.len();

        let mut out_of_window = 0usize;
        let mut already_notified = 0usize;
        let items: Vec<NewsItem> = fetched
            .into_iter()
            .filter(|item| {
                if self.window.contains(&item.published_at) {
                    return true;
                }
                tracing::debug!(
                    url = %item.url,
                    published_at = %item.published_at,
                    "dropping item not published today"
                );
                out_of_window += 1;
                false
            })
            .filter(|item| {
                if !cache.is_notified(&item.url) {
                    return true;
                }
                tracing::debug!(url = %item.url, "dropping already-notified item");
                already_notified += 1;
                false
            })
            .collect();

        tracing::info!(
            fetched = fetched_count,
            out_of_window,
            already_notified,
            kept = items.len(),
            "collected new items"
        );
        Ok(items)
    }
}
