//! Sync plan actions

use crate::scanner::LocalFile;
use crate::state::TrackedFile;

/// One reconciliation decision for one relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// Upload a file the remote corpus has no document for
    Add {
        /// Relative path of the file
        path: String,
        /// Current local metadata
        local: LocalFile,
        /// Freshly computed fingerprint
        hash: String,
    },
    /// Replace the remote document for a changed file
    Update {
        /// Relative path of the file
        path: String,
        /// Current local metadata
        local: LocalFile,
        /// Freshly computed fingerprint
        hash: String,
        /// Entry from the previous run, carrying the remote document id
        tracked: TrackedFile,
    },
    /// Leave an unchanged file alone
    Skip {
        /// Relative path of the file
        path: String,
    },
    /// Remove the document for a file that vanished locally
    Delete {
        /// Relative path of the file
        path: String,
        /// Entry from the previous run, carrying the remote document id
        tracked: TrackedFile,
    },
}

impl SyncAction {
    /// The relative path this action concerns.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Add { path, .. }
            | Self::Update { path, .. }
            | Self::Skip { path }
            | Self::Delete { path, .. } => path,
        }
    }

    /// Short verb for display.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Update { .. } => "update",
            Self::Skip { .. } => "skip",
            Self::Delete { .. } => "delete",
        }
    }
}
