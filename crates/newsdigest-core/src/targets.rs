use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Language-model backend used to summarize a target's items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummarizerProvider {
    Gemini,
    Ollama,
}

impl std::fmt::Display for SummarizerProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummarizerProvider::Gemini => write!(f, "gemini"),
            SummarizerProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl FromStr for SummarizerProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(SummarizerProvider::Gemini),
            "ollama" => Ok(SummarizerProvider::Ollama),
            other => Err(format!("unknown summarizer provider '{other}'; expected gemini or ollama")),
        }
    }
}

/// One notification destination with its own keyword set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordTarget {
    pub name: String,
    pub recipient_id: String,
    /// Search and scoring keywords, in configured order. Never empty.
    pub keywords: Vec<String>,
    pub summarizer: SummarizerProvider,
}

/// Validated contents of the targets file.
#[derive(Debug, Clone)]
pub struct TargetsFile {
    pub notification_targets: Vec<KeywordTarget>,
}

impl TargetsFile {
    /// Every keyword across all targets, deduplicated, in first-seen order.
    #[must_use]
    pub fn all_keywords(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.notification_targets
            .iter()
            .flat_map(|t| t.keywords.iter())
            .filter(|k| seen.insert(k.as_str()))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn target_by_name(&self, name: &str) -> Option<&KeywordTarget> {
        self.notification_targets.iter().find(|t| t.name == name)
    }
}

#[derive(Debug, Deserialize)]
struct RawTargetsFile {
    notification_targets: Vec<RawTarget>,
}

#[derive(Debug, Deserialize)]
struct RawTarget {
    name: String,
    #[serde(alias = "line_user_id")]
    recipient_id: String,
    keywords: Vec<String>,
    #[serde(default, alias = "llm_provider")]
    summarizer: Option<SummarizerProvider>,
}

/// Load and validate the targets file.
///
/// Targets that omit `summarizer` get `default_provider`.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_targets(
    path: &Path,
    default_provider: SummarizerProvider,
) -> Result<TargetsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TargetsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_targets(&content, default_provider)
}

/// Parse and validate targets YAML already in memory.
///
/// # Errors
///
/// Returns `ConfigError::TargetsFileParse` for malformed YAML and
/// `ConfigError::Validation` for semantically invalid targets.
pub fn parse_targets(
    content: &str,
    default_provider: SummarizerProvider,
) -> Result<TargetsFile, ConfigError> {
    let raw: RawTargetsFile = serde_yaml::from_str(content)?;

    let notification_targets = raw
        .notification_targets
        .into_iter()
        .map(|t| resolve_target(t, default_provider))
        .collect();
    let targets_file = TargetsFile {
        notification_targets,
    };

    validate_targets(&targets_file)?;

    Ok(targets_file)
}

fn resolve_target(raw: RawTarget, default_provider: SummarizerProvider) -> KeywordTarget {
    let keywords = raw
        .keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();

    KeywordTarget {
        name: raw.name.trim().to_string(),
        recipient_id: raw.recipient_id.trim().to_string(),
        keywords,
        summarizer: raw.summarizer.unwrap_or(default_provider),
    }
}

fn validate_targets(targets_file: &TargetsFile) -> Result<(), ConfigError> {
    if targets_file.notification_targets.is_empty() {
        return Err(ConfigError::Validation(
            "at least one notification target is required".to_string(),
        ));
    }

    let mut seen_names = HashSet::new();

    for target in &targets_file.notification_targets {
        if target.name.is_empty() {
            return Err(ConfigError::Validation(
                "target name must be non-empty".to_string(),
            ));
        }

        if !seen_names.insert(target.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate target name: '{}'",
                target.name
            )));
        }

        if target.recipient_id.is_empty() {
            return Err(ConfigError::Validation(format!(
                "target '{}' has an empty recipient_id",
                target.name
            )));
        }

        if target.keywords.is_empty() {
            return Err(ConfigError::Validation(format!(
                "target '{}' must have at least one keyword",
                target.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "targets_test.rs"]
mod tests;
