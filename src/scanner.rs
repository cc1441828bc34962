//! Local folder scanning
//!
//! Walks a sync root recursively and returns metadata for every supported
//! document, keyed by relative path. Hidden entries and the tracking
//! record are never picked up, and a single unreadable file downgrades to
//! a warning rather than failing the scan.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use walkdir::{DirEntry, WalkDir};

use crate::error::{Result, SyncError};
use crate::state::TRACKING_FILENAME;

/// Document extensions eligible for syncing. A closed set, not a plugin
/// surface.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "txt", "md", "docx", "html", "epub"];

/// Metadata for one file found during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    /// Path relative to the sync root, `/`-separated
    pub relative_path: String,
    /// Absolute location on disk
    pub absolute_path: PathBuf,
    /// Filename stem, used as the remote document title
    pub display_name: String,
    /// Lowercased extension
    pub extension: String,
    /// File size in bytes
    pub size: u64,
    /// Last modification time
    pub modified_at: DateTime<Utc>,
}

/// Result of a scan with non-fatal warnings.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Relative path → file metadata for every supported file
    pub files: BTreeMap<String, LocalFile>,
    /// Entries that could not be read and were skipped
    pub warnings: Vec<String>,
}

/// Scans one sync root.
pub struct Scanner {
    root: PathBuf,
}

impl Scanner {
    /// Create a scanner for the given root.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Walk the root and collect supported files.
    ///
    /// An empty root yields an empty mapping, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::RootMissing`] / [`SyncError::RootNotDirectory`]
    /// when the root itself is unusable.
    pub fn scan(&self) -> Result<ScanResult> {
        if !self.root.exists() {
            return Err(SyncError::RootMissing(self.root.clone()).into());
        }
        if !self.root.is_dir() {
            return Err(SyncError::RootNotDirectory(self.root.clone()).into());
        }

        let mut result = ScanResult::default();

        let walker = WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(|e| !Self::is_hidden(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    result.warnings.push(format!("Skipping unreadable entry: {e}"));
                    continue;
                }
            };

            if !entry.file_type().is_file() || Self::is_excluded(&entry) {
                continue;
            }

            match self.describe(&entry) {
                Ok(Some(file)) => {
                    result.files.insert(file.relative_path.clone(), file);
                }
                Ok(None) => {} // unsupported extension
                Err(e) => {
                    result
                        .warnings
                        .push(format!("Skipping {}: {e:#}", entry.path().display()));
                }
            }
        }

        Ok(result)
    }

    /// Hidden entries (leading `.`) are pruned, subtrees included. The
    /// root itself is depth 0 and always kept.
    fn is_hidden(entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with('.'))
    }

    /// The tracking record is reserved and never re-ingested.
    fn is_excluded(entry: &DirEntry) -> bool {
        entry.file_name() == TRACKING_FILENAME
    }

    fn describe(&self, entry: &DirEntry) -> Result<Option<LocalFile>> {
        let path = entry.path();

        let Some(extension) = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
        else {
            return Ok(None);
        };
        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            return Ok(None);
        }

        let relative = path
            .strip_prefix(&self.root)
            .unwrap_or(path);
        let relative_path = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let display_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| relative_path.clone());

        let metadata = entry.metadata()?;
        let modified_at = DateTime::<Utc>::from(metadata.modified()?);

        Ok(Some(LocalFile {
            relative_path,
            absolute_path: path.to_path_buf(),
            display_name,
            extension,
            size: metadata.len(),
            modified_at,
        }))
    }
}
