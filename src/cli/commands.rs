use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use chrono::{DateTime, FixedOffset};
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, info, warn};

use crate::cli::Cli;
use crate::config::{resolve_path, Config};
use crate::error::{Error, Result};
use crate::progress::ProgressSummary;
use crate::readme::{self, PatchOutcome};
use crate::render::{self, status_cell};
use crate::status::{FolderState, StatusClassifier};

pub const DEFAULT_CONFIG_FILE: &str = "topics.json";
pub const DEFAULT_README_FILE: &str = "README.md";

/// Where a run reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub root: PathBuf,
    pub config: PathBuf,
    pub readme: PathBuf,
}

impl Paths {
    /// Relative config and README paths are taken relative to `root`.
    pub fn resolve(root: PathBuf, config: Option<PathBuf>, readme: Option<PathBuf>) -> Self {
        let config = resolve_path(&root, &config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)));
        let readme = resolve_path(&root, &readme.unwrap_or_else(|| PathBuf::from(DEFAULT_README_FILE)));
        Self { root, config, readme }
    }

    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        Self::resolve(root.into(), None, None)
    }
}

/// Everything computed for one run, before anything is written.
#[derive(Debug, Clone)]
pub struct Report {
    pub states: Vec<FolderState>,
    pub summary: ProgressSummary,
    pub block: String,
}

#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    pub report: Report,
    pub patch: PatchOutcome,
}

/// Classify every topic in config order, aggregate and render.
pub fn build_report(config: &Config, root: &Path, timestamp: &DateTime<FixedOffset>) -> Report {
    let classifier = StatusClassifier::new(root);

    let states: Vec<FolderState> = config
        .topics
        .iter()
        .map(|topic| classifier.classify(topic))
        .collect();

    let summary = ProgressSummary::aggregate(&states, config.settings.bar_width);
    let block = render::render(&config.topics, &states, &summary, timestamp);

    Report { states, summary, block }
}

fn current_timestamp(config: &Config) -> Result<DateTime<FixedOffset>> {
    let offset = render::utc_offset(config.settings.utc_offset_hours)?;
    Ok(render::now_in(offset))
}

/// Rewrite the README progress block from the current folder state.
pub fn update(paths: &Paths) -> Result<UpdateOutcome> {
    let config = Config::load(&paths.config)?;
    let timestamp = current_timestamp(&config)?;
    update_at(paths, &config, &timestamp)
}

/// [`update`] with an already loaded config and a fixed timestamp.
pub fn update_at(
    paths: &Paths,
    config: &Config,
    timestamp: &DateTime<FixedOffset>,
) -> Result<UpdateOutcome> {
    info!("Updating progress in {}", paths.readme.display());

    let existing = readme::read_readme(&paths.readme)?;
    let report = build_report(config, &paths.root, timestamp);

    let (patched, patch) = readme::patch(&existing, &report.block);
    if patch == PatchOutcome::Appended {
        warn!(
            "No progress markers found in {}, appending a new block",
            paths.readme.display()
        );
    }

    readme::write_atomic(&paths.readme, &patched)?;
    info!("README written ({})", patch.describe());

    print_summary(&paths.readme, patch, &report.summary);

    Ok(UpdateOutcome { report, patch })
}

fn print_summary(readme: &Path, patch: PatchOutcome, summary: &ProgressSummary) {
    println!("✅ README updated: {} ({})", readme.display(), patch.describe());
    println!("   {}: {}", status_cell(FolderState::Completed), summary.completed);
    println!("   {}: {}", status_cell(FolderState::InProgress), summary.in_progress);
    println!("   {}: {}", status_cell(FolderState::NotStarted), summary.not_started);
    println!(
        "   📈 Tiến độ: {}/{} ({}%)",
        summary.completed,
        summary.total,
        summary.percentage()
    );
}

/// Print the block that `update` would write.
pub fn show(paths: &Paths) -> Result<()> {
    let config = Config::load(&paths.config)?;
    let timestamp = current_timestamp(&config)?;
    let report = build_report(&config, &paths.root, &timestamp);
    println!("{}", report.block);
    Ok(())
}

/// Fail with [`Error::StaleReadme`] when the README block differs from a
/// fresh render. The timestamp line is not compared.
pub fn check(paths: &Paths) -> Result<()> {
    let config = Config::load(&paths.config)?;
    let timestamp = current_timestamp(&config)?;
    check_at(paths, &config, &timestamp)
}

pub fn check_at(paths: &Paths, config: &Config, timestamp: &DateTime<FixedOffset>) -> Result<()> {
    let existing = readme::read_readme(&paths.readme)?;
    let report = build_report(config, &paths.root, timestamp);

    let current = match readme::extract_block(&existing) {
        Some(block) => block,
        None => {
            debug!("No progress block in {}", paths.readme.display());
            return Err(Error::StaleReadme(paths.readme.clone()));
        }
    };

    if render::strip_timestamp(current) != render::strip_timestamp(&report.block) {
        return Err(Error::StaleReadme(paths.readme.clone()));
    }

    println!("✅ README progress is up to date: {}", paths.readme.display());
    Ok(())
}

/// Write a starter configuration file.
pub fn init(paths: &Paths, force: bool) -> Result<()> {
    if paths.config.exists() && !force {
        warn!("Configuration file already exists: {}", paths.config.display());
        println!("⚠️  Configuration already exists: {}", paths.config.display());
        println!("   Use --force to overwrite it");
        return Ok(());
    }

    if let Some(parent) = paths.config.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(&paths.config, default_config())?;
    info!("Created configuration: {}", paths.config.display());

    println!("✅ Configuration created: {}", paths.config.display());
    println!();
    println!("Next steps:");
    println!("   1. Edit the topics in {}", paths.config.display());
    println!("   2. Run: lesson-progress --root {} update", paths.root.display());

    Ok(())
}

fn default_config() -> &'static str {
    r#"{
  "topics": [
    { "id": 1, "week": "Week 1", "title": "Getting started", "folder": "week-01" },
    { "id": 2, "week": "Week 2", "title": "Core concepts", "folder": "week-02" }
  ],
  "settings": {
    "bar_width": 20,
    "utc_offset_hours": 7
  }
}
"#
}

/// Generate shell completions
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "lesson-progress", &mut io::stdout());
}

/// Initialize logging; `RUST_LOG` takes precedence over the flags.
pub fn init_logging(debug: bool, verbose: bool) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_file(debug)
        .with_line_number(debug)
        .try_init();

    debug!("Logging initialized");
    Ok(())
}
