use std::path::PathBuf;

use chrono::FixedOffset;

use crate::SummarizerProvider;

/// Hours east of UTC for the civil day used by the recency filter (JST).
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 9;

/// Build a fixed offset from whole hours east of UTC.
///
/// Returns `None` when `hours` is outside `-23..=23`.
#[must_use]
pub fn zone_from_hours(hours: i32) -> Option<FixedOffset> {
    if !(-23..=23).contains(&hours) {
        return None;
    }
    FixedOffset::east_opt(hours * 3600)
}

/// Process-wide settings, built once at startup and passed by reference.
#[derive(Clone)]
pub struct AppConfig {
    pub line_channel_access_token: String,
    pub gemini_api_key: Option<String>,
    pub default_provider: SummarizerProvider,
    pub gemini_model: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub summary_language: String,
    pub targets_path: PathBuf,
    pub cache_path: PathBuf,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    /// Reference zone for "today".
    pub utc_offset: FixedOffset,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub feed_language: String,
    pub feed_country: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("line_channel_access_token", &"[redacted]")
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("default_provider", &self.default_provider)
            .field("gemini_model", &self.gemini_model)
            .field("ollama_url", &self.ollama_url)
            .field("ollama_model", &self.ollama_model)
            .field("summary_language", &self.summary_language)
            .field("targets_path", &self.targets_path)
            .field("cache_path", &self.cache_path)
            .field("log_level", &self.log_level)
            .field("log_file", &self.log_file)
            .field("utc_offset", &self.utc_offset)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("feed_language", &self.feed_language)
            .field("feed_country", &self.feed_country)
            .finish()
    }
}
