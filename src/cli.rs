//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation. Every flag is optional: a bare invocation
//! aggregates `./database` with the default watchlist.

use clap::Parser;
use std::path::PathBuf;

/// QQQ Summary - hedge-fund holdings aggregator
///
/// Reads the latest quarter's per-fund holdings CSVs plus the
/// non-quarterly filings file and writes a JSON summary restricted
/// to a ticker watchlist.
///
/// Examples:
///   qqq-summary
///   qqq-summary --root ./database --output qqq-summary.json
///   qqq-summary --tickers NVDA,AAPL,MSFT --verbose
///   qqq-summary --dry-run
///   qqq-summary --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Data root holding the quarter directories and reference CSVs
    ///
    /// Defaults to `database` (or the value in .qqq-summary.toml).
    #[arg(short, long, value_name = "DIR", env = "QQQ_SUMMARY_ROOT")]
    pub root: Option<PathBuf>,

    /// Output file for the summary, relative to the data root
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .qqq-summary.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Tickers to track (comma-separated)
    ///
    /// Example: --tickers NVDA,AAPL,MSFT
    #[arg(long, value_name = "TICKERS", value_delimiter = ',')]
    pub tickers: Option<Vec<String>>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: locate the quarter and list the files that would be read
    ///
    /// Nothing is written.
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .qqq-summary.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref tickers) = self.tickers {
            if tickers.iter().all(|t| t.trim().is_empty()) {
                return Err("--tickers must name at least one ticker".to_string());
            }
        }

        if let Some(ref root) = self.root {
            if !root.exists() {
                return Err(format!("Data root does not exist: {}", root.display()));
            }
            if !root.is_dir() {
                return Err(format!("Data root is not a directory: {}", root.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `verbose_default` comes from the config file; `--quiet` overrides it.
    pub fn log_level(&self, verbose_default: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || verbose_default {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
