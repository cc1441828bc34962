//! The `sync` subcommand

use std::path::Path;

use corpusync::error::Result;
use corpusync::remote::BridgeClient;
use corpusync::sync::{SyncEngine, SyncOptions, SyncReport, SyncReporter};

/// Run one sync and print the plan and summary.
#[allow(clippy::fn_params_excessive_bools)]
pub fn execute(
    folder: &Path,
    collection: &str,
    account: Option<&str>,
    bridge: &str,
    dry_run: bool,
    force_rebuild: bool,
    verbose: bool,
) -> Result<SyncReport> {
    let client = BridgeClient::new(bridge);
    let engine = SyncEngine::new(folder, &client);

    let outcome = engine.sync(&SyncOptions {
        collection_id: collection.to_string(),
        account: account.map(str::to_string),
        dry_run,
        force_rebuild,
    })?;

    for warning in &outcome.warnings {
        eprintln!("Warning: {warning}");
    }

    if dry_run || verbose {
        print!("{}", SyncReporter::format_plan(&outcome.actions, dry_run));
    }
    print!("{}", SyncReporter::generate_summary(&outcome.report));

    Ok(outcome.report)
}
