//! Sync plan and summary rendering

use super::actions::SyncAction;
use super::SyncReport;

/// Renders plans and reports for terminal output.
pub struct SyncReporter;

impl SyncReporter {
    /// Render the plan, one line per action, skips last.
    #[must_use]
    pub fn format_plan(actions: &[SyncAction], dry_run: bool) -> String {
        let mut output = String::new();

        if dry_run {
            output.push_str("=== Sync Plan (dry run) ===\n");
        } else {
            output.push_str("=== Sync Plan ===\n");
        }

        let mut skips = 0;
        for action in actions {
            match action {
                SyncAction::Skip { .. } => skips += 1,
                other => {
                    output.push_str(&format!("  {:<7} {}\n", other.verb(), other.path()));
                }
            }
        }
        if skips > 0 {
            output.push_str(&format!("  ({skips} unchanged)\n"));
        }
        if actions.is_empty() {
            output.push_str("  (nothing to sync)\n");
        }

        output
    }

    /// Generate a summary report
    #[must_use]
    pub fn generate_summary(report: &SyncReport) -> String {
        let mut output = String::new();

        if report.dry_run {
            output.push_str("\n=== Sync Summary (dry run) ===\n");
        } else {
            output.push_str("\n=== Sync Summary ===\n");
        }
        output.push_str(&format!("Added:    {}\n", report.added));
        output.push_str(&format!("Updated:  {}\n", report.updated));
        output.push_str(&format!("Deleted:  {}\n", report.deleted));
        output.push_str(&format!("Skipped:  {}\n", report.skipped));

        if !report.failures.is_empty() {
            output.push_str(&format!("\nFailures ({}):\n", report.failures.len()));
            for failure in &report.failures {
                output.push_str(&format!("  - {}: {}\n", failure.path, failure.message));
            }
        }

        output.push_str(&format!(
            "\nTotal operations: {}\n",
            report.total_operations()
        ));

        if report.is_success() {
            output.push_str("Status: ✓ Success\n");
        } else {
            output.push_str("Status: ✗ Completed with errors\n");
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::ItemFailure;

    #[test]
    fn test_summary_counts_and_status() {
        let report = SyncReport {
            added: 5,
            updated: 3,
            deleted: 1,
            skipped: 2,
            ..SyncReport::default()
        };

        let summary = SyncReporter::generate_summary(&report);

        assert!(summary.contains("Added:    5"));
        assert!(summary.contains("Updated:  3"));
        assert!(summary.contains("Skipped:  2"));
        assert!(summary.contains("Total operations: 9"));
        assert!(summary.contains("✓ Success"));
    }

    #[test]
    fn test_summary_with_failures() {
        let mut report = SyncReport {
            added: 1,
            ..SyncReport::default()
        };
        report.failures.push(ItemFailure {
            path: "a.md".to_string(),
            message: "upload failed".to_string(),
        });

        let summary = SyncReporter::generate_summary(&report);

        assert!(summary.contains("Failures (1)"));
        assert!(summary.contains("a.md: upload failed"));
        assert!(summary.contains("✗ Completed with errors"));
    }

    #[test]
    fn test_empty_plan_rendering() {
        let rendered = SyncReporter::format_plan(&[], true);

        assert!(rendered.contains("dry run"));
        assert!(rendered.contains("nothing to sync"));
    }

    #[test]
    fn test_plan_collapses_skips() {
        let actions = vec![
            SyncAction::Skip {
                path: "a.md".to_string(),
            },
            SyncAction::Skip {
                path: "b.md".to_string(),
            },
        ];

        let rendered = SyncReporter::format_plan(&actions, false);

        assert!(rendered.contains("(2 unchanged)"));
        assert!(!rendered.contains("a.md"));
    }
}
