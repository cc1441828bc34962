//! The scan → plan → apply sync engine
//!
//! [`Reconciler`] turns a scan and the stored state into an ordered plan,
//! [`PlanExecutor`] applies it against the remote corpus, and
//! [`SyncEngine`] composes both with state loading and persistence.

mod actions;
mod executor;
mod orchestrator;
mod reconciler;
mod reporting;

pub use actions::SyncAction;
pub use executor::PlanExecutor;
pub use orchestrator::{SyncEngine, SyncOptions, SyncOutcome};
pub use reconciler::{Plan, Reconciler};
pub use reporting::SyncReporter;

/// One per-item failure surfaced in the report.
#[derive(Debug, Clone)]
pub struct ItemFailure {
    /// Relative path of the affected file
    pub path: String,
    /// What went wrong
    pub message: String,
}

/// Result of applying (or dry-running) a plan, with per-action tallies.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Files uploaded for the first time
    pub added: usize,
    /// Files replaced remotely
    pub updated: usize,
    /// Files left untouched (fingerprint unchanged)
    pub skipped: usize,
    /// Files removed from tracking (and, best-effort, remotely)
    pub deleted: usize,
    /// Per-item failures; the run completes despite them
    pub failures: Vec<ItemFailure>,
    /// Whether this report describes a dry run
    pub dry_run: bool,
}

impl SyncReport {
    /// Total remote-affecting operations (planned or performed).
    #[must_use]
    pub const fn total_operations(&self) -> usize {
        self.added + self.updated + self.deleted
    }

    /// Whether the sync completed without per-item failures.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn fail(&mut self, path: &str, message: String) {
        self.failures.push(ItemFailure {
            path: path.to_string(),
            message,
        });
    }
}
