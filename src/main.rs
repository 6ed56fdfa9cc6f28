//! QQQ Summary - hedge-fund holdings aggregator
//!
//! A CLI tool that folds the latest quarter's per-fund holdings CSVs
//! and the non-quarterly filings file into one JSON summary for a
//! watchlist of tickers.
//!
//! Exit codes:
//!   0 - Success, or nothing to do (no quarter directory found)
//!   1 - Runtime error (bad arguments, unreadable input, write failure)

mod analysis;
mod cli;
mod config;
mod models;
mod report;
mod scanner;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use models::{Summary, Watchlist};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration before logging so `general.verbose` can pick the level
    let (mut config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(args.log_level(config.general.verbose));

    info!("qqq-summary v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    source.log();

    match run(&config, args.dry_run) {
        Ok(RunOutcome::Written(path)) => {
            info!("Summary written to {}", path.display());
            Ok(())
        }
        Ok(outcome) => {
            debug!("Run finished without output: {:?}", outcome);
            Ok(())
        }
        Err(e) => {
            error!("Aggregation failed: {:#}", e);
            eprintln!("\nError: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .qqq-summary.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the data root, watchlist, and input files.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// What a run ended up doing.
#[derive(Debug)]
enum RunOutcome {
    /// Summary written to the given path.
    Written(PathBuf),
    /// No quarter directory under the root; nothing written.
    NoQuarter,
    /// Dry run; nothing written.
    DryRun,
}

/// Run the complete aggregation workflow.
fn run(config: &Config, dry_run: bool) -> Result<RunOutcome> {
    let root = &config.general.root;
    if !root.is_dir() {
        anyhow::bail!("Data root is not a directory: {}", root.display());
    }

    let watchlist = config.watchlist()?;
    debug!("Watchlist: {}", watchlist);

    // Step 1: Locate the quarter
    let Some(quarter) = scanner::find_latest_quarter(root)? else {
        println!("No quarterly data found.");
        warn!("No YYYYQn directory under {}", root.display());
        return Ok(RunOutcome::NoQuarter);
    };

    if dry_run {
        handle_dry_run(config, &quarter)?;
        return Ok(RunOutcome::DryRun);
    }

    println!("Aggregating data for quarter: {}", quarter);

    // Step 2-4: Aggregate
    let summary = build_summary(config, &watchlist, &quarter, Utc::now())?;

    // Step 5: Write the summary
    let output_path = config.output_path();
    report::write_json_summary(&summary, &output_path)?;

    for line in report::ticker_stats_lines(&summary, &watchlist) {
        println!("{}", line);
    }
    println!("\nOutput written to {}", output_path.display());

    Ok(RunOutcome::Written(output_path))
}

/// Load references, aggregate both data sets and assemble the summary.
fn build_summary(
    config: &Config,
    watchlist: &Watchlist,
    quarter: &str,
    generated_at: DateTime<Utc>,
) -> Result<Summary> {
    let managers = analysis::load_fund_managers(&config.managers_path())?;
    println!("Loaded {} fund managers", managers.len());

    let quarter_dir = config.general.root.join(quarter);
    let scan_config = scanner::ScanConfig::from(&config.input);
    let holdings = analysis::aggregate_quarter(&quarter_dir, &scan_config, &managers, watchlist)?;

    let non_quarterly = analysis::aggregate_non_quarterly(&config.non_quarterly_path(), watchlist)?;

    let positions: usize = holdings.values().map(|h| h.total_funds).sum();
    let filings: usize = non_quarterly.values().map(Vec::len).sum();
    info!(
        "Aggregated {} positions and {} non-quarterly filings across {} tickers",
        positions,
        filings,
        watchlist.len()
    );

    Ok(report::build_summary(
        quarter,
        generated_at,
        holdings,
        non_quarterly,
    ))
}

/// Handle --dry-run: show what would be read, write nothing.
fn handle_dry_run(config: &Config, quarter: &str) -> Result<()> {
    println!("\nDry run: inspecting inputs (nothing will be written)...\n");

    let quarters = scanner::list_quarters(&config.general.root)?;
    println!("   Quarters found: {}", quarters.join(", "));
    println!("   Latest quarter: {}", quarter);

    let quarter_dir = config.general.root.join(quarter);
    let file_scanner =
        scanner::FileScanner::new(quarter_dir, scanner::ScanConfig::from(&config.input));
    let files = file_scanner.scan()?;

    if files.is_empty() {
        println!("   No fund files found.");
    } else {
        println!("   Found {} fund files that would be aggregated:\n", files.len());
        for file in &files {
            println!("     {}", file.fund);
        }
    }

    for path in [config.managers_path(), config.non_quarterly_path()] {
        let status = if path.exists() { "found" } else { "missing" };
        println!("   {} ({})", path.display(), status);
    }

    println!("   Output would be written to {}", config.output_path().display());
    println!("\nDry run complete.");
    Ok(())
}

/// Where the configuration came from. Logged once the subscriber is up.
#[derive(Debug)]
enum ConfigSource {
    Explicit(PathBuf),
    DefaultFile,
    Builtin,
    Fallback(anyhow::Error),
}

impl ConfigSource {
    fn log(&self) {
        match self {
            ConfigSource::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigSource::DefaultFile => info!("Loaded default config from {}", CONFIG_FILE_NAME),
            ConfigSource::Builtin => debug!("No config file found, using defaults"),
            ConfigSource::Fallback(e) => warn!("Failed to load config: {:#}", e),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigSource::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigSource::DefaultFile)),
        Ok(None) => Ok((Config::default(), ConfigSource::Builtin)),
        Err(e) => Ok((Config::default(), ConfigSource::Fallback(e))),
    }
}
