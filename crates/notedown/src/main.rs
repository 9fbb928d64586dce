//! notedown CLI - Notion to Markdown mirror.
//!
//! Provides commands for:
//! - `sync`: Run one fetch → render → write pass
//! - `watch`: Run sync passes on a poll interval

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{SyncArgs, WatchArgs};
use output::Output;

/// notedown - Notion workspace mirror.
#[derive(Parser)]
#[command(name = "notedown", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one sync pass.
    Sync(SyncArgs),
    /// Sync repeatedly on an interval.
    Watch(WatchArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Sync(args) => args.verbose,
        Commands::Watch(args) => args.verbose,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Sync(args) => args.execute(),
        Commands::Watch(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
