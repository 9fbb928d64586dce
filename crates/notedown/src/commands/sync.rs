//! `notedown sync` command implementation.

use std::path::PathBuf;

use clap::Args;

use nd_config::{CliSettings, Config};
use nd_github::GithubSink;
use nd_notion::{NotionClient, TreeFetcher};
use nd_storage::{FsSink, Sink};
use nd_sync::{DryRunOutcome, ImageFetcher, SyncOptions, SyncOutcome, SyncState, Syncer};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the sync command.
#[derive(Args)]
pub(crate) struct SyncArgs {
    /// Preview changes without writing to the sink.
    #[arg(long)]
    dry_run: bool,

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

impl SyncArgs {
    /// Execute the sync command.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync pass fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            root_page: self.root_page.clone(),
            state_file: self.state_file.clone(),
            base_dir: self.out_dir.clone(),
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        run_sync_pass(&config, self.dry_run, &output)
    }
}

/// One fetch → render → write pass, shared with `notedown watch`.
pub(crate) fn run_sync_pass(
    config: &Config,
    dry_run: bool,
    output: &Output,
) -> Result<(), CliError> {
    let notion = config.require_notion()?;
    let client = NotionClient::new(notion.token.clone(), notion.api_version.as_deref());

    output.info(&format!("Fetching workspace {}...", notion.root_page));
    let page = TreeFetcher::new(&client).fetch_workspace(&notion.root_page)?;

    let sink = build_sink(config, output)?;
    let state = SyncState::load(&config.sync.state_file);
    let options = SyncOptions {
        posts_dir: config.output.posts_dir.clone(),
        images_dir: config.output.images_dir.clone(),
    };

    if dry_run {
        let syncer = Syncer::new(sink.as_ref(), state, options);
        let outcome = syncer.dry_run(&page, &config.render);
        print_dry_run(output, &outcome);
    } else {
        let mut syncer =
            Syncer::new(sink.as_ref(), state, options).with_image_fetcher(ImageFetcher::new());
        let outcome = syncer.sync_workspace(&page, &config.render)?;
        print_outcome(output, &outcome);
    }

    Ok(())
}

/// Pick the configured sink: GitHub when `[github]` is present, otherwise a
/// local directory.
fn build_sink(config: &Config, output: &Output) -> Result<Box<dyn Sink>, CliError> {
    if let Some(github) = config.github_validated()? {
        return Ok(Box::new(GithubSink::new(
            github.repo.clone(),
            github.branch.clone(),
            github.token.clone(),
        )));
    }
    if let Some(base) = &config.base_dir_resolved {
        return Ok(Box::new(FsSink::new(base.clone())));
    }

    output.error("Error: no sink configured in notedown.toml");
    output.info("\nAdd one of the following to your notedown.toml:");
    output.info("\n[github]");
    output.info(r#"repo = "owner/name""#);
    output.info(r#"token = "${GITHUB_TOKEN}""#);
    output.info("\n# or\n\n[output]");
    output.info(r#"base_dir = "mirror""#);
    Err(CliError::Validation(
        "either [github] or output.base_dir must be configured".to_owned(),
    ))
}

fn print_dry_run(output: &Output, outcome: &DryRunOutcome) {
    output.highlight("\n[DRY RUN] No changes made.");

    if outcome.pending.is_empty() {
        output.success("\nEverything is up to date.");
    } else {
        output.info(&format!("\nWould write ({}):", outcome.pending.len()));
        for path in &outcome.pending {
            output.info(&format!("  -> {path}"));
        }
    }
    if outcome.skipped > 0 {
        output.info(&format!("Unchanged: {}", outcome.skipped));
    }
    print_warnings(output, &outcome.warnings);
}

fn print_outcome(output: &Output, outcome: &SyncOutcome) {
    if outcome.written.is_empty() {
        output.success("\nEverything is up to date.");
    } else {
        output.success(&format!("\nSynced {} document(s):", outcome.written.len()));
        for path in &outcome.written {
            output.info(&format!("  -> {path}"));
        }
    }
    if outcome.skipped > 0 {
        output.info(&format!("Unchanged: {}", outcome.skipped));
    }
    if outcome.images_rehosted > 0 {
        output.info(&format!("Images re-hosted: {}", outcome.images_rehosted));
    }
    print_warnings(output, &outcome.warnings);
}

fn print_warnings(output: &Output, warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    output.warning(&format!("\nWarnings ({}):", warnings.len()));
    for warning in warnings {
        output.info(&format!("  - {warning}"));
    }
}
