//! Shared domain types, configuration, and collaborator contracts for newsdigest.

pub mod app_config;
pub mod config;
pub mod error;
pub mod news;
pub mod ports;
pub mod targets;

pub use app_config::{zone_from_hours, AppConfig, DEFAULT_UTC_OFFSET_HOURS};
pub use config::{load_app_config, load_app_config_from_env, validate_target_credentials};
pub use error::ConfigError;
pub use news::NewsItem;
pub use ports::{FeedSource, FeedUnavailable, Notifier, Summarizer, SummarizerFactory};
pub use targets::{load_targets, parse_targets, KeywordTarget, SummarizerProvider, TargetsFile};
