//! Plan construction: diffing a fresh scan against the stored state
//!
//! The content fingerprint is the sole basis for change detection; size
//! and modification time are carried for display only and never trigger
//! an action on their own.

use super::actions::SyncAction;
use crate::hasher;
use crate::scanner::ScanResult;
use crate::state::SyncState;

/// An ordered reconciliation plan plus the warnings gathered building it.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    /// Actions in stable order: adds/updates/skips by path, then deletes
    pub actions: Vec<SyncAction>,
    /// Files dropped from the plan because they could not be fingerprinted
    pub warnings: Vec<String>,
}

impl Plan {
    /// Number of actions that would touch the remote corpus.
    #[must_use]
    pub fn changes(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| !matches!(a, SyncAction::Skip { .. }))
            .count()
    }
}

/// Compares scans against stored state. Read-only with respect to both.
pub struct Reconciler;

impl Reconciler {
    /// Build the plan for one sync run.
    ///
    /// Every scanned file is fingerprinted here. A file that cannot be
    /// read drops out of the plan with a warning; if it was tracked it
    /// stays tracked-but-unrefreshed and is retried next run.
    #[must_use]
    pub fn plan(scan: &ScanResult, state: &SyncState) -> Plan {
        let mut plan = Plan::default();

        for (path, local) in &scan.files {
            let hash = match hasher::fingerprint_file(&local.absolute_path) {
                Ok(hash) => hash,
                Err(e) => {
                    plan.warnings
                        .push(format!("Cannot fingerprint {path}: {e:#}"));
                    continue;
                }
            };

            let action = match state.files.get(path) {
                None => SyncAction::Add {
                    path: path.clone(),
                    local: local.clone(),
                    hash,
                },
                Some(tracked) if tracked.hash == hash => SyncAction::Skip { path: path.clone() },
                Some(tracked) => {
                    if tracked.remote_document_id.is_some() {
                        SyncAction::Update {
                            path: path.clone(),
                            local: local.clone(),
                            hash,
                            tracked: tracked.clone(),
                        }
                    } else {
                        // Tracked but never successfully uploaded: treat as
                        // new so a prior partial failure heals itself
                        SyncAction::Add {
                            path: path.clone(),
                            local: local.clone(),
                            hash,
                        }
                    }
                }
            };
            plan.actions.push(action);
        }

        // Tracked paths that vanished locally, after the add/update block
        for (path, tracked) in &state.files {
            if !scan.files.contains_key(path) {
                plan.actions.push(SyncAction::Delete {
                    path: path.clone(),
                    tracked: tracked.clone(),
                });
            }
        }

        plan
    }
}
