//! Remote corpus client interface
//!
//! The sync engine only ever talks to the remote document store through
//! [`RemoteCorpus`]: one upload, one delete, nothing else. Retries, rate
//! limits and authentication live behind the seam. The shipped
//! implementation, [`BridgeClient`], shells out to an external bridge
//! command that owns the session and answers with a JSON object on stdout.

use std::path::Path;
use std::process::Command;

use anyhow::Context;
use serde::Deserialize;
use tracing::debug;

use crate::error::Result;

/// Outcome of a remote delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The document was removed
    Deleted,
    /// The document was already gone; callers treat this as success
    NotFound,
}

/// Narrow client interface to the remote document store.
pub trait RemoteCorpus {
    /// Upload a file into a collection and return the new document id.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote write fails.
    fn upload(&self, collection_id: &str, file: &Path, display_name: &str) -> Result<String>;

    /// Delete a document from a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote delete fails for any reason other
    /// than the document already being absent.
    fn delete(&self, collection_id: &str, document_id: &str) -> Result<DeleteOutcome>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    document_id: String,
}

#[derive(Debug, Deserialize)]
struct DeleteResponse {
    result: String,
}

/// [`RemoteCorpus`] implementation backed by an external bridge command.
pub struct BridgeClient {
    command: String,
}

impl BridgeClient {
    /// Create a client invoking the given bridge command.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        debug!(command = %self.command, ?args, "invoking corpus bridge");
        let output = Command::new(&self.command)
            .args(args)
            .output()
            .with_context(|| format!("Failed to invoke bridge command '{}'", self.command))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "Bridge command failed ({}): {}",
                output.status,
                stderr.trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl RemoteCorpus for BridgeClient {
    fn upload(&self, collection_id: &str, file: &Path, display_name: &str) -> Result<String> {
        let file_arg = file.display().to_string();
        let stdout = self.run(&[
            "add-file",
            "--collection-id",
            collection_id,
            "--file",
            &file_arg,
            "--title",
            display_name,
        ])?;

        let response: UploadResponse = serde_json::from_str(&stdout)
            .context("Bridge upload response is not valid JSON")?;
        Ok(response.document_id)
    }

    fn delete(&self, collection_id: &str, document_id: &str) -> Result<DeleteOutcome> {
        let stdout = self.run(&[
            "delete-document",
            "--collection-id",
            collection_id,
            "--document-id",
            document_id,
        ])?;

        let response: DeleteResponse = serde_json::from_str(&stdout)
            .context("Bridge delete response is not valid JSON")?;
        match response.result.as_str() {
            "deleted" => Ok(DeleteOutcome::Deleted),
            "not_found" => Ok(DeleteOutcome::NotFound),
            other => anyhow::bail!("Bridge reported unexpected delete result: {other}"),
        }
    }
}
