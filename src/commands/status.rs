//! The `status` subcommand
//!
//! A permanently-dry run: loads the tracking record, scans, and prints
//! the plan without any remote call or mutation.

use std::path::Path;

use corpusync::error::Result;
use corpusync::scanner::Scanner;
use corpusync::state::StateStore;
use corpusync::sync::{Reconciler, SyncReporter};

/// Print the current sync status of a folder.
pub fn execute(folder: &Path) -> Result<()> {
    let store = StateStore::new(folder);
    let state = store.load()?;

    println!("Folder:     {}", folder.display());
    match &state.remote_collection_id {
        Some(id) => println!("Collection: {id}"),
        None => println!("Collection: (never synced)"),
    }
    if let Some(owner) = &state.owner_account {
        println!("Owner:      {owner}");
    }
    match &state.last_sync_at {
        Some(at) => println!("Last sync:  {at}"),
        None => println!("Last sync:  never"),
    }
    println!("Tracked:    {} file(s)", state.files.len());

    let scan = Scanner::new(folder).scan()?;
    for warning in &scan.warnings {
        eprintln!("Warning: {warning}");
    }

    let plan = Reconciler::plan(&scan, &state);
    for warning in &plan.warnings {
        eprintln!("Warning: {warning}");
    }

    println!();
    print!("{}", SyncReporter::format_plan(&plan.actions, true));

    Ok(())
}
