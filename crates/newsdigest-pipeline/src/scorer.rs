//! Keyword relevance scoring and ranking.

use newsdigest_core::NewsItem;

/// Fraction of `keywords` found in the item's title or description.
///
/// Matching is a case-insensitive substring test against
/// `"{title} {description}"`. Returns `0.0` for an empty keyword list, so the
/// result is always in `[0.0, 1.0]`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn relevance_score(item: &NewsItem, keywords: &[String]) -> f32 {
    if keywords.is_empty() {
        return 0.0;
    }

    let haystack = format!("{} {}", item.title, item.description).to_lowercase();
    let matched = keywords
        .iter()
        .filter(|k| haystack.contains(&k.to_lowercase()))
        .count();

    matched as f32 / keywords.len() as f32
}

/// Score every item and order by descending score.
///
/// The sort is stable: items with equal scores keep their input order.
#[must_use]
pub fn rank(items: Vec<NewsItem>, keywords: &[String]) -> Vec<NewsItem> {
    let mut scored: Vec<NewsItem> = items
        .into_iter()
        .map(|mut item| {
            item.relevance_score = Some(relevance_score(&item, keywords));
            item
        })
        .collect();

    scored.sort_by(|a, b| {
        let a = a.relevance_score.unwrap_or(0.0);
        let b = b.relevance_score.unwrap_or(0.0);
        b.total_cmp(&a)
    });

    tracing::debug!(count = scored.len(), "ranked items by relevance");
    scored
}

/// Keep items whose score is at least `threshold`. Unscored items are dropped.
#[must_use]
pub fn filter_by_threshold(items: Vec<NewsItem>, threshold: f32) -> Vec<NewsItem> {
    items
        .into_iter()
        .filter(|item| item.relevance_score.is_some_and(|s| s >= threshold))
        .collect()
}
