//! `cache` command handlers.

use anyhow::Context;
use newsdigest_core::AppConfig;
use newsdigest_pipeline::NotifiedCache;

pub(crate) fn cache_stats(config: &AppConfig) -> anyhow::Result<()> {
    let cache = NotifiedCache::load(&config.cache_path);
    println!("cache file: {}", cache.path().display());
    println!("notified URLs: {}", cache.len());
    Ok(())
}

pub(crate) fn cache_clear(config: &AppConfig) -> anyhow::Result<()> {
    let mut cache = NotifiedCache::load(&config.cache_path);
    let removed = cache.len();
    cache
        .clear()
        .with_context(|| format!("failed to write {}", cache.path().display()))?;
    println!("cleared {removed} notified URLs from {}", cache.path().display());
    Ok(())
}
