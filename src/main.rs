mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Sync {
            folder,
            collection,
            account,
            force_rebuild,
            bridge,
        } => {
            let report = commands::sync::execute(
                folder,
                collection,
                account.as_deref(),
                bridge,
                cli.dry_run,
                *force_rebuild,
                cli.verbose,
            )?;
            if !report.is_success() {
                // The sync completed but some items failed remotely
                std::process::exit(1);
            }
        }
        Commands::Status { folder } => {
            commands::status::execute(folder)?;
        }
    }

    Ok(())
}
