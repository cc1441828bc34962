use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Folder-to-remote-corpus synchronization tool
///
/// Scans a local folder, diffs it against a durable tracking record, and
/// reconciles the differences into a remote document collection.
#[derive(Parser, Debug)]
#[command(name = "corpusync")]
#[command(long_about = None, version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Preview changes without executing (dry-run)
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sync a folder into a remote collection
    Sync {
        /// Folder to synchronize
        folder: PathBuf,

        /// Target collection id
        #[arg(long, value_name = "ID")]
        collection: String,

        /// Account identity performing the sync (ownership warnings only)
        #[arg(long, env = "CORPUSYNC_ACCOUNT", value_name = "EMAIL")]
        account: Option<String>,

        /// Discard the tracking record and re-sync every file
        #[arg(long)]
        force_rebuild: bool,

        /// Bridge command used to reach the remote corpus
        #[arg(
            long,
            env = "CORPUSYNC_BRIDGE",
            value_name = "CMD",
            default_value = "corpus-bridge"
        )]
        bridge: String,
    },

    /// Show what a sync would do, without touching anything
    Status {
        /// Folder to inspect
        folder: PathBuf,
    },
}
