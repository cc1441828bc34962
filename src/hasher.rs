//! File fingerprinting for change detection using SHA-256
//!
//! Fingerprints are rendered as `sha256:<hex>` so that stored values stay
//! comparable if the algorithm ever changes.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::Context;
use sha2::{Digest, Sha256};

use crate::error::Result;

/// Algorithm tag prefixed to every fingerprint.
pub const ALGORITHM: &str = "sha256";

/// Compute the content fingerprint of a file by streaming its contents.
///
/// Identical bytes always produce an identical fingerprint; the file is
/// never loaded into memory as a whole.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn fingerprint_file(path: &Path) -> Result<String> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open file for hashing: {}", path.display()))?;

    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0; 8192]; // 8KB buffer for streaming

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{}:{:x}", ALGORITHM, hasher.finalize()))
}
