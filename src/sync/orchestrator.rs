//! Sync orchestration: load state, scan, plan, apply, persist

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{info, warn};

use super::executor::PlanExecutor;
use super::reconciler::Reconciler;
use super::{SyncAction, SyncReport};
use crate::error::Result;
use crate::remote::RemoteCorpus;
use crate::scanner::Scanner;
use crate::state::{StateStore, SyncState};

/// Options for one sync run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Remote collection the folder is synced into
    pub collection_id: String,
    /// Identity performing the sync, for ownership warnings
    pub account: Option<String>,
    /// Plan only; no remote calls, no persistence
    pub dry_run: bool,
    /// Discard the tracking record first and re-sync everything
    pub force_rebuild: bool,
}

/// Everything a caller needs to render one run: the plan, the warnings
/// gathered along the way, and the final report.
#[derive(Debug)]
pub struct SyncOutcome {
    /// The reconciliation plan that was applied (or would have been)
    pub actions: Vec<SyncAction>,
    /// Non-fatal warnings from scanning, planning and ownership checks
    pub warnings: Vec<String>,
    /// Tallies and per-item failures
    pub report: SyncReport,
}

/// Composes the scanner, reconciler, executor and state store into one
/// sync operation for a single root.
///
/// Callers must not run two syncs for the same root concurrently; the
/// plan assumes the baseline state is not mutated under it.
pub struct SyncEngine<'a> {
    root: PathBuf,
    client: &'a dyn RemoteCorpus,
}

impl<'a> SyncEngine<'a> {
    /// Create an engine for one sync root.
    #[must_use]
    pub fn new(root: &Path, client: &'a dyn RemoteCorpus) -> Self {
        Self {
            root: root.to_path_buf(),
            client,
        }
    }

    /// Run one sync operation.
    ///
    /// A real run persists the updated tracking record atomically at the
    /// end; a dry run leaves both the record and the in-memory state
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns an error for structural problems only (unusable root,
    /// unreadable or unpersistable tracking record). Per-item remote
    /// failures are collected in the report instead.
    pub fn sync(&self, options: &SyncOptions) -> Result<SyncOutcome> {
        let store = StateStore::new(&self.root);
        let mut warnings = Vec::new();

        let mut state = if options.force_rebuild {
            // Discarding the record is a mutation, so a dry run only
            // pretends: it plans against an empty baseline
            if !options.dry_run {
                store.discard()?;
            }
            SyncState::new(&self.root)
        } else {
            store.load()?
        };

        if let (Some(account), Some(owner)) = (&options.account, &state.owner_account)
            && account != owner
        {
            let message = format!(
                "folder was last synced by {owner}, current account is {account}"
            );
            warn!("{message}");
            warnings.push(message);
        }

        let scan = Scanner::new(&self.root).scan()?;
        warnings.extend(scan.warnings.iter().cloned());

        let plan = Reconciler::plan(&scan, &state);
        warnings.extend(plan.warnings.iter().cloned());

        let executor = PlanExecutor::new(self.client, &options.collection_id, options.dry_run);
        let report = executor.apply(&plan.actions, &mut state);

        if !options.dry_run {
            state.remote_collection_id = Some(options.collection_id.clone());
            state.owner_account = options.account.clone();
            state.last_sync_at = Some(Utc::now());
            store.save(&state)?;
            info!(
                root = %self.root.display(),
                added = report.added,
                updated = report.updated,
                deleted = report.deleted,
                skipped = report.skipped,
                failures = report.failures.len(),
                "sync complete"
            );
        }

        Ok(SyncOutcome {
            actions: plan.actions,
            warnings,
            report,
        })
    }
}
