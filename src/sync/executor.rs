//! Plan application against the remote corpus
//!
//! Actions are applied sequentially; every remote call happens at most
//! once per action, and a single item's failure never aborts the run.
//! State is mutated in memory only after the corresponding remote write
//! succeeds, so an interrupted run can persist partial progress and
//! resume safely.

use chrono::Utc;
use tracing::warn;

use super::actions::SyncAction;
use super::SyncReport;
use crate::remote::RemoteCorpus;
use crate::scanner::LocalFile;
use crate::state::{SyncState, TrackedFile};

/// Applies a reconciliation plan.
pub struct PlanExecutor<'a> {
    client: &'a dyn RemoteCorpus,
    collection_id: &'a str,
    dry_run: bool,
}

impl<'a> PlanExecutor<'a> {
    /// Create an executor for one collection.
    #[must_use]
    pub fn new(client: &'a dyn RemoteCorpus, collection_id: &'a str, dry_run: bool) -> Self {
        Self {
            client,
            collection_id,
            dry_run,
        }
    }

    /// Apply every action in the plan, tallying a report.
    ///
    /// In dry-run mode no remote calls are made and `state` is left
    /// untouched; the report still counts what would have happened.
    pub fn apply(&self, plan: &[SyncAction], state: &mut SyncState) -> SyncReport {
        let mut report = SyncReport {
            dry_run: self.dry_run,
            ..SyncReport::default()
        };

        for action in plan {
            match action {
                SyncAction::Add { path, local, hash } => {
                    if self.dry_run {
                        report.added += 1;
                    } else {
                        self.apply_add(path, local, hash, state, &mut report);
                    }
                }
                SyncAction::Update {
                    path,
                    local,
                    hash,
                    tracked,
                } => {
                    if self.dry_run {
                        report.updated += 1;
                    } else {
                        self.apply_update(path, local, hash, tracked, state, &mut report);
                    }
                }
                SyncAction::Skip { .. } => {
                    report.skipped += 1;
                }
                SyncAction::Delete { path, tracked } => {
                    if self.dry_run {
                        report.deleted += 1;
                    } else {
                        self.apply_delete(path, tracked, state, &mut report);
                    }
                }
            }
        }

        report
    }

    fn apply_add(
        &self,
        path: &str,
        local: &LocalFile,
        hash: &str,
        state: &mut SyncState,
        report: &mut SyncReport,
    ) {
        match self
            .client
            .upload(self.collection_id, &local.absolute_path, &local.display_name)
        {
            Ok(document_id) => {
                state
                    .files
                    .insert(path.to_string(), Self::entry(local, hash, document_id));
                report.added += 1;
            }
            Err(e) => {
                report.fail(path, format!("upload failed: {e:#}"));
            }
        }
    }

    fn apply_update(
        &self,
        path: &str,
        local: &LocalFile,
        hash: &str,
        tracked: &TrackedFile,
        state: &mut SyncState,
        report: &mut SyncReport,
    ) {
        // Replace = delete the old document, then upload the new bytes.
        // A failed delete is best-effort: the upload still goes ahead, and
        // the old document may be left orphaned remotely (the tracked id
        // is replaced either way, so state never references stale content).
        let mut old_document_gone = false;
        if let Some(document_id) = &tracked.remote_document_id {
            match self.client.delete(self.collection_id, document_id) {
                Ok(_) => old_document_gone = true,
                Err(e) => {
                    warn!(path, %document_id, "delete before replace failed: {e:#}");
                }
            }
        }

        match self
            .client
            .upload(self.collection_id, &local.absolute_path, &local.display_name)
        {
            Ok(document_id) => {
                state
                    .files
                    .insert(path.to_string(), Self::entry(local, hash, document_id));
                report.updated += 1;
            }
            Err(e) => {
                if old_document_gone {
                    // The tracked id now points at nothing; drop it so the
                    // next run retries this file as an add
                    if let Some(entry) = state.files.get_mut(path) {
                        entry.remote_document_id = None;
                    }
                }
                report.fail(path, format!("replace upload failed: {e:#}"));
            }
        }
    }

    fn apply_delete(
        &self,
        path: &str,
        tracked: &TrackedFile,
        state: &mut SyncState,
        report: &mut SyncReport,
    ) {
        if let Some(document_id) = &tracked.remote_document_id {
            match self.client.delete(self.collection_id, document_id) {
                // Already gone remotely is the intended end state
                Ok(_) => {}
                Err(e) => {
                    report.fail(path, format!("remote delete failed: {e:#}"));
                }
            }
        }

        // The local intent (removal) wins even when the remote delete
        // failed; resurrecting the entry next run would be worse
        state.files.remove(path);
        report.deleted += 1;
    }

    fn entry(local: &LocalFile, hash: &str, document_id: String) -> TrackedFile {
        TrackedFile {
            display_name: local.display_name.clone(),
            hash: hash.to_string(),
            local_modified_at: local.modified_at,
            remote_document_id: Some(document_id),
            uploaded_at: Some(Utc::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::remote::DeleteOutcome;
    use chrono::Utc;
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};

    /// Scripted in-memory corpus client recording every call.
    #[derive(Default)]
    struct MockCorpus {
        calls: RefCell<Vec<String>>,
        fail_uploads: bool,
        fail_deletes: bool,
        delete_not_found: bool,
        next_id: RefCell<u32>,
    }

    impl MockCorpus {
        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl RemoteCorpus for MockCorpus {
        fn upload(&self, _collection: &str, file: &Path, _name: &str) -> Result<String> {
            self.calls
                .borrow_mut()
                .push(format!("upload {}", file.display()));
            if self.fail_uploads {
                anyhow::bail!("upload rejected");
            }
            let mut next = self.next_id.borrow_mut();
            *next += 1;
            Ok(format!("doc-{next}"))
        }

        fn delete(&self, _collection: &str, document_id: &str) -> Result<DeleteOutcome> {
            self.calls.borrow_mut().push(format!("delete {document_id}"));
            if self.fail_deletes {
                anyhow::bail!("delete rejected");
            }
            if self.delete_not_found {
                Ok(DeleteOutcome::NotFound)
            } else {
                Ok(DeleteOutcome::Deleted)
            }
        }
    }

    fn local(path: &str) -> LocalFile {
        LocalFile {
            relative_path: path.to_string(),
            absolute_path: PathBuf::from("/tmp").join(path),
            display_name: path.trim_end_matches(".md").to_string(),
            extension: "md".to_string(),
            size: 5,
            modified_at: Utc::now(),
        }
    }

    fn tracked(hash: &str, doc: Option<&str>) -> TrackedFile {
        TrackedFile {
            display_name: "a".to_string(),
            hash: hash.to_string(),
            local_modified_at: Utc::now(),
            remote_document_id: doc.map(str::to_string),
            uploaded_at: None,
        }
    }

    fn add(path: &str) -> SyncAction {
        SyncAction::Add {
            path: path.to_string(),
            local: local(path),
            hash: "sha256:new".to_string(),
        }
    }

    #[test]
    fn test_add_success_inserts_tracked_entry() {
        let client = MockCorpus::default();
        let mut state = SyncState::new(Path::new("/tmp"));
        let executor = PlanExecutor::new(&client, "col-1", false);

        let report = executor.apply(&[add("a.md")], &mut state);

        assert_eq!(report.added, 1);
        assert!(report.is_success());
        let entry = &state.files["a.md"];
        assert_eq!(entry.remote_document_id.as_deref(), Some("doc-1"));
        assert_eq!(entry.hash, "sha256:new");
        assert!(entry.uploaded_at.is_some());
    }

    #[test]
    fn test_add_failure_leaves_state_and_continues() {
        let client = MockCorpus {
            fail_uploads: true,
            ..MockCorpus::default()
        };
        let mut state = SyncState::new(Path::new("/tmp"));
        let executor = PlanExecutor::new(&client, "col-1", false);

        let report = executor.apply(&[add("a.md"), add("b.md")], &mut state);

        assert_eq!(report.added, 0);
        assert_eq!(report.failures.len(), 2);
        assert!(state.files.is_empty());
        // Both actions were still attempted
        assert_eq!(client.calls().len(), 2);
    }

    #[test]
    fn test_update_deletes_old_then_uploads() {
        let client = MockCorpus::default();
        let mut state = SyncState::new(Path::new("/tmp"));
        state
            .files
            .insert("a.md".to_string(), tracked("sha256:old", Some("doc-old")));
        let executor = PlanExecutor::new(&client, "col-1", false);

        let plan = [SyncAction::Update {
            path: "a.md".to_string(),
            local: local("a.md"),
            hash: "sha256:new".to_string(),
            tracked: tracked("sha256:old", Some("doc-old")),
        }];
        let report = executor.apply(&plan, &mut state);

        assert_eq!(report.updated, 1);
        assert_eq!(
            client.calls(),
            vec!["delete doc-old".to_string(), "upload /tmp/a.md".to_string()]
        );
        assert_eq!(
            state.files["a.md"].remote_document_id.as_deref(),
            Some("doc-1")
        );
    }

    #[test]
    fn test_update_proceeds_when_delete_fails() {
        let client = MockCorpus {
            fail_deletes: true,
            ..MockCorpus::default()
        };
        let mut state = SyncState::new(Path::new("/tmp"));
        state
            .files
            .insert("a.md".to_string(), tracked("sha256:old", Some("doc-old")));
        let executor = PlanExecutor::new(&client, "col-1", false);

        let plan = [SyncAction::Update {
            path: "a.md".to_string(),
            local: local("a.md"),
            hash: "sha256:new".to_string(),
            tracked: tracked("sha256:old", Some("doc-old")),
        }];
        let report = executor.apply(&plan, &mut state);

        // Upload happened anyway and the entry points at the new document
        assert_eq!(report.updated, 1);
        assert!(report.is_success());
        assert_eq!(
            state.files["a.md"].remote_document_id.as_deref(),
            Some("doc-1")
        );
    }

    #[test]
    fn test_update_upload_failure_after_delete_clears_stale_id() {
        let client = MockCorpus {
            fail_uploads: true,
            ..MockCorpus::default()
        };
        let mut state = SyncState::new(Path::new("/tmp"));
        state
            .files
            .insert("a.md".to_string(), tracked("sha256:old", Some("doc-old")));
        let executor = PlanExecutor::new(&client, "col-1", false);

        let plan = [SyncAction::Update {
            path: "a.md".to_string(),
            local: local("a.md"),
            hash: "sha256:new".to_string(),
            tracked: tracked("sha256:old", Some("doc-old")),
        }];
        let report = executor.apply(&plan, &mut state);

        assert_eq!(report.updated, 0);
        assert_eq!(report.failures.len(), 1);
        // Entry survives but no longer claims the deleted document, so the
        // next run retries as an add
        let entry = &state.files["a.md"];
        assert!(entry.remote_document_id.is_none());
        assert_eq!(entry.hash, "sha256:old");
    }

    #[test]
    fn test_update_both_steps_failing_keeps_tracked_id() {
        let client = MockCorpus {
            fail_uploads: true,
            fail_deletes: true,
            ..MockCorpus::default()
        };
        let mut state = SyncState::new(Path::new("/tmp"));
        state
            .files
            .insert("a.md".to_string(), tracked("sha256:old", Some("doc-old")));
        let executor = PlanExecutor::new(&client, "col-1", false);

        let plan = [SyncAction::Update {
            path: "a.md".to_string(),
            local: local("a.md"),
            hash: "sha256:new".to_string(),
            tracked: tracked("sha256:old", Some("doc-old")),
        }];
        executor.apply(&plan, &mut state);

        // The old document may still exist; keep claiming it
        assert_eq!(
            state.files["a.md"].remote_document_id.as_deref(),
            Some("doc-old")
        );
    }

    #[test]
    fn test_delete_removes_entry_even_when_remote_fails() {
        let client = MockCorpus {
            fail_deletes: true,
            ..MockCorpus::default()
        };
        let mut state = SyncState::new(Path::new("/tmp"));
        state
            .files
            .insert("a.md".to_string(), tracked("sha256:x", Some("doc-1")));
        let executor = PlanExecutor::new(&client, "col-1", false);

        let plan = [SyncAction::Delete {
            path: "a.md".to_string(),
            tracked: tracked("sha256:x", Some("doc-1")),
        }];
        let report = executor.apply(&plan, &mut state);

        assert_eq!(report.deleted, 1);
        assert_eq!(report.failures.len(), 1);
        assert!(!state.files.contains_key("a.md"));
    }

    #[test]
    fn test_delete_not_found_counts_as_success() {
        let client = MockCorpus {
            delete_not_found: true,
            ..MockCorpus::default()
        };
        let mut state = SyncState::new(Path::new("/tmp"));
        state
            .files
            .insert("a.md".to_string(), tracked("sha256:x", Some("doc-1")));
        let executor = PlanExecutor::new(&client, "col-1", false);

        let plan = [SyncAction::Delete {
            path: "a.md".to_string(),
            tracked: tracked("sha256:x", Some("doc-1")),
        }];
        let report = executor.apply(&plan, &mut state);

        assert_eq!(report.deleted, 1);
        assert!(report.is_success());
        assert!(!state.files.contains_key("a.md"));
    }

    #[test]
    fn test_delete_without_remote_id_skips_remote_call() {
        let client = MockCorpus::default();
        let mut state = SyncState::new(Path::new("/tmp"));
        state
            .files
            .insert("a.md".to_string(), tracked("sha256:x", None));
        let executor = PlanExecutor::new(&client, "col-1", false);

        let plan = [SyncAction::Delete {
            path: "a.md".to_string(),
            tracked: tracked("sha256:x", None),
        }];
        let report = executor.apply(&plan, &mut state);

        assert_eq!(report.deleted, 1);
        assert!(client.calls().is_empty());
        assert!(!state.files.contains_key("a.md"));
    }

    #[test]
    fn test_dry_run_makes_no_calls_and_no_mutations() {
        let client = MockCorpus::default();
        let mut state = SyncState::new(Path::new("/tmp"));
        state
            .files
            .insert("gone.md".to_string(), tracked("sha256:x", Some("doc-1")));
        let before = state.clone();
        let executor = PlanExecutor::new(&client, "col-1", true);

        let plan = [
            add("a.md"),
            SyncAction::Skip {
                path: "same.md".to_string(),
            },
            SyncAction::Delete {
                path: "gone.md".to_string(),
                tracked: tracked("sha256:x", Some("doc-1")),
            },
        ];
        let report = executor.apply(&plan, &mut state);

        assert!(report.dry_run);
        assert_eq!(report.added, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.deleted, 1);
        assert!(client.calls().is_empty());
        assert_eq!(state, before);
    }
}
