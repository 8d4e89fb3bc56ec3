//! Durable set of already-delivered item URLs.
//!
//! Backed by one JSON file of the form `{"notified_urls": [...]}`. Every
//! mutation rewrites the whole file. Write failures are logged and the
//! in-memory set stays authoritative for the rest of the run.

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    #[serde(default)]
    notified_urls: Vec<String>,
}

#[derive(Debug)]
pub struct NotifiedCache {
    path: PathBuf,
    urls: HashSet<String>,
}

impl NotifiedCache {
    /// Load the cache from `path`.
    ///
    /// A missing file yields an empty cache. An unreadable or corrupt file is
    /// logged and also yields an empty cache; loading never fails.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(
                    path = %parent.display(),
                    error = %e,
                    "failed to create cache directory"
                );
            }
        }

        let urls = match read_urls(&path) {
            Ok(Some(urls)) => {
                tracing::info!(
                    path = %path.display(),
                    count = urls.len(),
                    "loaded notified cache"
                );
                urls
            }
            Ok(None) => {
                tracing::info!(path = %path.display(), "no cache file yet; starting empty");
                HashSet::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load notified cache; starting empty");
                HashSet::new()
            }
        };

        Self { path, urls }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn is_notified(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Record `urls` as delivered and persist the whole set.
    pub fn add_notified<I, S>(&mut self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.urls.len();
        self.urls.extend(urls.into_iter().map(Into::into));
        tracing::info!(
            added = self.urls.len() - before,
            total = self.urls.len(),
            "recorded notified URLs"
        );
        self.persist();
    }

    /// Forget every URL and persist the empty set.
    ///
    /// The in-memory set is emptied even when the write fails.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Write`] if the empty set cannot be written.
    pub fn clear(&mut self) -> Result<(), CacheError> {
        self.urls.clear();
        tracing::info!(path = %self.path.display(), "cleared notified cache");
        self.save().inspect_err(|e| {
            tracing::error!(error = %e, "failed to persist notified cache");
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Write the full set to disk.
    ///
    /// The file is written next to its final location and renamed into place,
    /// so readers never see a partial file. URLs are written sorted.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Write`] if the temp file cannot be written or
    /// renamed.
    pub fn save(&self) -> Result<(), CacheError> {
        let mut notified_urls: Vec<String> = self.urls.iter().cloned().collect();
        notified_urls.sort_unstable();
        let json = serde_json::to_string_pretty(&CacheFile { notified_urls })?;

        let write_err = |source| CacheError::Write {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let tmp = self.temp_path();
        std::fs::write(&tmp, json).map_err(write_err)?;
        std::fs::rename(&tmp, &self.path).map_err(write_err)?;

        tracing::debug!(count = self.urls.len(), "saved notified cache");
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            tracing::error!(error = %e, "failed to persist notified cache");
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map_or_else(|| OsString::from("notified_urls"), OsString::from);
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// `Ok(None)` when the file does not exist.
fn read_urls(path: &Path) -> Result<Option<HashSet<String>>, CacheError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(CacheError::Read {
                path: path.display().to_string(),
                source: e,
            })
        }
    };

    let file: CacheFile = serde_json::from_str(&content).map_err(|e| CacheError::Parse {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(Some(file.notified_urls.into_iter().collect()))
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
