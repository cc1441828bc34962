//! Durable sync state: the per-root tracking record and its store
//!
//! The tracking record is the ledger of what the engine believes exists
//! remotely. It lives inside the sync root as a hidden JSON file, is loaded
//! at the start of a run, mutated in memory while the plan executes, and
//! written back atomically at the end. A record that cannot be parsed is
//! quarantined rather than deleted, and the run proceeds from a fresh
//! state: the remote corpus is most likely intact, so re-reconciling from
//! scratch at worst re-uploads existing content.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

/// Tracking record format version this build reads and writes.
pub const FORMAT_VERSION: u32 = 1;

/// Reserved filename of the tracking record inside a sync root.
pub const TRACKING_FILENAME: &str = ".corpusync.json";

/// One previously synchronized file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedFile {
    /// Filename stem used as the remote document title
    pub display_name: String,
    /// Content fingerprint at last successful sync, `<algo>:<hex>`
    pub hash: String,
    /// Local modification time at last successful sync (informational;
    /// the hash is authoritative for change detection)
    pub local_modified_at: DateTime<Utc>,
    /// Remote document identifier; `None` means the file was tracked but
    /// never successfully uploaded
    #[serde(default)]
    pub remote_document_id: Option<String>,
    /// Time of the last successful remote write
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// The full durable record for one sync root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncState {
    /// Record format version; a mismatch is treated as corruption
    pub format_version: u32,
    /// Absolute sync root this record describes (informational)
    pub root_path: String,
    /// Remote collection the root is synced into
    #[serde(default)]
    pub remote_collection_id: Option<String>,
    /// Account that last performed a sync (used for warnings, not gating)
    #[serde(default)]
    pub owner_account: Option<String>,
    /// Time of the last completed sync
    #[serde(default)]
    pub last_sync_at: Option<DateTime<Utc>>,
    /// Relative path → tracked file ledger
    #[serde(default)]
    pub files: BTreeMap<String, TrackedFile>,
}

impl SyncState {
    /// Create a fresh, empty state for a root.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            root_path: root.display().to_string(),
            remote_collection_id: None,
            owner_account: None,
            last_sync_at: None,
            files: BTreeMap::new(),
        }
    }
}

/// Loads and persists the tracking record for one sync root.
pub struct StateStore {
    root: PathBuf,
    tracking_path: PathBuf,
}

impl StateStore {
    /// Create a store rooted at the given sync folder.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            tracking_path: root.join(TRACKING_FILENAME),
        }
    }

    /// Location of the tracking record on disk.
    #[must_use]
    pub fn tracking_path(&self) -> &Path {
        &self.tracking_path
    }

    /// Load the tracking record.
    ///
    /// A missing record is not an error: first-time syncs start from a
    /// fresh, empty state. A record that fails to parse or carries an
    /// unsupported format version is renamed to a quarantine sibling and
    /// replaced by a fresh state.
    ///
    /// # Errors
    ///
    /// Returns an error only if the record exists but cannot be read, or
    /// if a corrupt record cannot be quarantined (quarantining must never
    /// lose the original bytes).
    pub fn load(&self) -> Result<SyncState> {
        if !self.tracking_path.exists() {
            return Ok(SyncState::new(&self.root));
        }

        let raw = fs::read_to_string(&self.tracking_path).with_context(|| {
            format!(
                "Failed to read tracking record: {}",
                self.tracking_path.display()
            )
        })?;

        match Self::parse(&raw) {
            Ok(state) => Ok(state),
            Err(e) => {
                let backup = self.quarantine()?;
                warn!(
                    record = %self.tracking_path.display(),
                    backup = %backup.display(),
                    "tracking record unusable ({e}), quarantined and starting fresh"
                );
                Ok(SyncState::new(&self.root))
            }
        }
    }

    fn parse(raw: &str) -> Result<SyncState> {
        let state: SyncState =
            serde_json::from_str(raw).context("Tracking record is not valid JSON")?;
        if state.format_version != FORMAT_VERSION {
            anyhow::bail!(
                "Unsupported tracking record version: {}",
                state.format_version
            );
        }
        Ok(state)
    }

    /// Move the current record to a `.broken` sibling, never overwriting a
    /// previous backup.
    fn quarantine(&self) -> Result<PathBuf> {
        let base = self.tracking_path.with_file_name(format!("{TRACKING_FILENAME}.broken"));
        let mut candidate = base.clone();
        let mut counter = 1;
        while candidate.exists() {
            candidate = base.with_file_name(format!("{TRACKING_FILENAME}.broken.{counter}"));
            counter += 1;
        }
        fs::rename(&self.tracking_path, &candidate).with_context(|| {
            format!(
                "Failed to quarantine corrupt tracking record to {}",
                candidate.display()
            )
        })?;
        Ok(candidate)
    }

    /// Persist the state atomically (write a temp file, then rename it
    /// over the record), so an interrupted save never leaves a
    /// half-written record behind.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the filesystem operations fail.
    pub fn save(&self, state: &SyncState) -> Result<()> {
        let json = serde_json::to_string_pretty(state)
            .context("Failed to serialize tracking record")?;

        let temp_path = self
            .tracking_path
            .with_file_name(format!("{TRACKING_FILENAME}.tmp"));
        fs::write(&temp_path, json)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &self.tracking_path).with_context(|| {
            format!(
                "Failed to replace tracking record {}",
                self.tracking_path.display()
            )
        })?;

        Ok(())
    }

    /// Remove the tracking record, if present (force-rebuild support).
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be removed.
    pub fn discard(&self) -> Result<()> {
        if self.tracking_path.exists() {
            fs::remove_file(&self.tracking_path).with_context(|| {
                format!(
                    "Failed to discard tracking record: {}",
                    self.tracking_path.display()
                )
            })?;
        }
        Ok(())
    }
}
