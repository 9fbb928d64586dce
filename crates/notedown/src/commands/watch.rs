//! `notedown watch` command implementation.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::Args;

use nd_config::{CliSettings, Config};

use crate::commands::sync::run_sync_pass;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the watch command.
#[derive(Args)]
pub(crate) struct WatchArgs {
    /// Poll interval in minutes (overrides config).
    #[arg(long)]
    interval: Option<u64>,

    /// Root page id (overrides config).
    #[arg(long)]
    root_page: Option<String>,

    /// Sync-state file path (overrides config).
    #[arg(long)]
    state_file: Option<String>,

    /// Mirror into a local directory instead of a repository (overrides config).
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover notedown.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable info-level logging.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl WatchArgs {
    /// Execute the watch loop.
    ///
    /// Runs sync passes until the process is killed. A failed pass is
    /// reported and the loop keeps going; only configuration errors are
    /// fatal.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            root_page: self.root_page.clone(),
            state_file: self.state_file.clone(),
            interval_minutes: self.interval,
            base_dir: self.out_dir.clone(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        // Fail fast on broken config rather than on the first tick.
        config.require_notion()?;

        let interval = Duration::from_secs(config.sync.interval_minutes * 60);
        output.highlight(&format!(
            "Watching; syncing every {} minute(s). Ctrl-C to stop.",
            config.sync.interval_minutes
        ));

        loop {
            if let Err(err) = run_sync_pass(&config, false, &output) {
                output.warning(&format!("Sync pass failed: {err}"));
            }
            output.info(&format!(
                "Next sync in {} minute(s).",
                config.sync.interval_minutes
            ));
            thread::sleep(interval);
        }
    }
}
