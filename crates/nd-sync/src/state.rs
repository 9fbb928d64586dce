//! Per-page sync-state persistence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::error::SyncError;

/// Timestamp bookkeeping used to skip unchanged pages.
///
/// Persisted as a flat JSON object mapping page id to the last-edited
/// timestamp recorded when the page was last written successfully.
#[derive(Debug)]
pub struct SyncState {
    path: PathBuf,
    entries: HashMap<String, DateTime<Utc>>,
}

impl SyncState {
    /// Load state from `path`.
    ///
    /// A missing file is a fresh start; a corrupt file is logged and
    /// treated as empty rather than blocking the sync.
    #[must_use]
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!("ignoring corrupt sync state {}: {err}", path.display());
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self { path, entries }
    }

    /// An empty state persisted at `path`, regardless of what's on disk.
    #[must_use]
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: HashMap::new(),
        }
    }

    /// Persist the state.
    pub fn save(&self) -> Result<(), SyncError> {
        let content = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    /// Whether a page changed since it was last synced.
    ///
    /// Unseen pages always need an update.
    #[must_use]
    pub fn needs_update(&self, page_id: &str, last_edited: DateTime<Utc>) -> bool {
        match self.entries.get(page_id) {
            Some(synced) => last_edited > *synced,
            None => true,
        }
    }

    /// Record a successful write of a page.
    pub fn record(&mut self, page_id: impl Into<String>, last_edited: DateTime<Utc>) {
        self.entries.insert(page_id.into(), last_edited);
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
