use crate::app_config::{zone_from_hours, AppConfig, DEFAULT_UTC_OFFSET_HOURS};
use crate::{ConfigError, KeywordTarget, SummarizerProvider};

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Check that every provider the given targets select has the credentials it needs.
///
/// Only `targets` are checked, so a run restricted to Ollama targets needs no
/// Gemini key.
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar("GEMINI_API_KEY")` when a target uses
/// Gemini and no API key is configured.
pub fn validate_target_credentials(
    config: &AppConfig,
    targets: &[KeywordTarget],
) -> Result<(), ConfigError> {
    let has_gemini_key = config
        .gemini_api_key
        .as_deref()
        .is_some_and(|k| !k.trim().is_empty());

    let uses_gemini = targets
        .iter()
        .any(|t| t.summarizer == SummarizerProvider::Gemini);

    if uses_gemini && !has_gemini_key {
        return Err(ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()));
    }

    Ok(())
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a map.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> { lookup(var).ok().filter(|v| !v.trim().is_empty()) };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let line_channel_access_token = require("LINE_CHANNEL_ACCESS_TOKEN")?;
    let gemini_api_key = optional("GEMINI_API_KEY");

    let default_provider = or_default("NEWSDIGEST_DEFAULT_PROVIDER", "gemini")
        .parse::<SummarizerProvider>()
        .map_err(|reason| ConfigError::InvalidEnvVar {
            var: "NEWSDIGEST_DEFAULT_PROVIDER".to_string(),
            reason,
        })?;

    let gemini_model = or_default("NEWSDIGEST_GEMINI_MODEL", "gemini-2.5-flash");
    let ollama_url = or_default("NEWSDIGEST_OLLAMA_URL", "http://localhost:11434");
    let ollama_model = or_default("NEWSDIGEST_OLLAMA_MODEL", "llama2");
    let summary_language = or_default("NEWSDIGEST_SUMMARY_LANGUAGE", "Japanese");

    let targets_path = PathBuf::from(or_default(
        "NEWSDIGEST_TARGETS_PATH",
        "./config/keywords.yaml",
    ));
    let cache_path = PathBuf::from(or_default(
        "NEWSDIGEST_CACHE_PATH",
        "./data/cache/notified_urls.json",
    ));
    let log_level = or_default("NEWSDIGEST_LOG_LEVEL", "info");
    let log_file = optional("NEWSDIGEST_LOG_FILE").map(PathBuf::from);

    let utc_offset = parse_utc_offset(&or_default(
        "NEWSDIGEST_UTC_OFFSET_HOURS",
        &DEFAULT_UTC_OFFSET_HOURS.to_string(),
    ))?;

    let request_timeout_secs = parse_u64("NEWSDIGEST_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "NEWSDIGEST_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let user_agent = or_default(
        "NEWSDIGEST_USER_AGENT",
        "newsdigest/0.1 (keyword-news-digest)",
    );
    let feed_language = or_default("NEWSDIGEST_FEED_LANGUAGE", "ja");
    let feed_country = or_default("NEWSDIGEST_FEED_COUNTRY", "JP");

    Ok(AppConfig {
        line_channel_access_token,
        gemini_api_key,
        default_provider,
        gemini_model,
        ollama_url,
        ollama_model,
        summary_language,
        targets_path,
        cache_path,
        log_level,
        log_file,
        utc_offset,
        request_timeout_secs,
        user_agent,
        feed_language,
        feed_country,
    })
}

fn parse_utc_offset(raw: &str) -> Result<chrono::FixedOffset, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "NEWSDIGEST_UTC_OFFSET_HOURS".to_string(),
        reason,
    };

    let hours = raw.trim().parse::<i32>().map_err(|e| invalid(e.to_string()))?;
    zone_from_hours(hours).ok_or_else(|| invalid(format!("{hours} is outside -23..=23")))
}
