//! # corpusync
//!
//! Core library for synchronizing a local folder of documents into a
//! remote document corpus.
//!
//! A sync run scans the folder, diffs the result against a durable
//! tracking record, and reconciles the differences by issuing
//! add/replace/delete operations through a narrow [`remote::RemoteCorpus`]
//! client, persisting the updated record atomically at the end.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;

/// Streaming content fingerprinting
pub mod hasher;

/// Remote corpus client interface and the bridge-backed implementation
pub mod remote;

/// Local folder scanning
pub mod scanner;

/// Durable sync state and its on-disk store
pub mod state;

/// The scan → plan → apply sync engine
pub mod sync;
