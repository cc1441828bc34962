//! Core error types for the corpusync library

use std::path::PathBuf;

use thiserror::Error;

/// Structural failures that abort a sync before any plan is made.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The sync root does not exist on disk.
    #[error("sync root does not exist: {0}")]
    RootMissing(PathBuf),

    /// The sync root exists but is not a directory.
    #[error("sync root is not a directory: {0}")]
    RootNotDirectory(PathBuf),
}

/// Result type alias using `anyhow::Error`
pub type Result<T> = anyhow::Result<T>;
