//! Deduplication and relevance pipeline for keyword news digests.
//!
//! Per target: fetch items for the target's keywords, keep those published
//! today that were never delivered before, rank them by keyword relevance,
//! summarize the top items, deliver one digest, and only then record the
//! delivered URLs in the notified cache.

pub mod cache;
pub mod collector;
pub mod error;
pub mod orchestrator;
pub mod recency;
pub mod scorer;
pub mod summarize;

pub use cache::NotifiedCache;
pub use collector::CollectionPipeline;
pub use error::{CacheError, TargetError};
pub use orchestrator::{
    describe_failure, RunReport, Stage, TargetOrchestrator, TargetOutcome, TargetReport,
    MAX_ITEMS_PER_TARGET,
};
pub use recency::{is_today, DayWindow};
pub use scorer::{filter_by_threshold, rank, relevance_score};
pub use summarize::SummarizationStage;
