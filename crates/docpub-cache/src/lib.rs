//! Persistent page-id cache for docpub.
//!
//! [`PageIdCache`] maps `(space key, page title)` pairs to the last-known
//! remote page id so repeat publish runs can fetch pages by id instead of
//! searching by title. The cache is a plain JSON object on disk:
//!
//! ```json
//! {
//!   "DOCS:Automation Hub": "123456",
//!   "DOCS:Operations": "123457"
//! }
//! ```
//!
//! Lifecycle: loaded once at the start of a publish batch, mutated in
//! memory during the run (one writer, no locking), and saved exactly once
//! at the end. A missing cache file is not an error; an unreadable or
//! corrupt file degrades to an empty cache with a warning. Entries are
//! removed when a cached id no longer resolves remotely, so a stale cache
//! self-heals on the next run.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Error from cache persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// I/O error reading or writing the cache file.
    #[error("cache I/O error")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("cache JSON error")]
    Json(#[from] serde_json::Error),
}

/// On-disk page-id cache, keyed by `"{space}:{title}"`.
///
/// Owned exclusively by the publish run that loaded it; load and save are
/// its only I/O boundary.
#[derive(Debug)]
pub struct PageIdCache {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl PageIdCache {
    /// Load the cache from `path`, or start empty if the file is absent.
    ///
    /// A file that exists but cannot be read or parsed is treated as
    /// absent (logged as a warning) rather than failing the run.
    #[must_use]
    pub fn load(path: PathBuf) -> Self {
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("ignoring corrupt page-id cache {}: {e}", path.display());
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!("failed to read page-id cache {}: {e}", path.display());
                BTreeMap::new()
            }
        };

        if !entries.is_empty() {
            tracing::info!("loaded page-id cache with {} entries", entries.len());
        }

        Self { path, entries }
    }

    /// Write the cache back to its file.
    ///
    /// Creates parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the file cannot be written.
    pub fn save(&self) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, raw)?;
        tracing::info!("saved page-id cache with {} entries", self.entries.len());
        Ok(())
    }

    /// Look up the cached page id for a `(space, title)` pair.
    #[must_use]
    pub fn get(&self, space_key: &str, title: &str) -> Option<&str> {
        self.entries.get(&cache_key(space_key, title)).map(String::as_str)
    }

    /// Record the page id for a `(space, title)` pair, replacing any
    /// previous entry.
    pub fn insert(&mut self, space_key: &str, title: &str, page_id: &str) {
        self.entries
            .insert(cache_key(space_key, title), page_id.to_owned());
    }

    /// Drop the entry for a `(space, title)` pair.
    ///
    /// Returns the removed page id, if one was cached.
    pub fn remove(&mut self, space_key: &str, title: &str) -> Option<String> {
        self.entries.remove(&cache_key(space_key, title))
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Composite cache key for a page within a space.
fn cache_key(space_key: &str, title: &str) -> String {
    format!("{space_key}:{title}")
}
