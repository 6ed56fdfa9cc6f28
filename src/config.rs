//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.qqq-summary.toml` files.

use crate::models::{Watchlist, DEFAULT_TICKERS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".qqq-summary.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Tracked tickers.
    #[serde(default)]
    pub watchlist: WatchlistConfig,

    /// Input file settings.
    #[serde(default)]
    pub input: InputConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data root holding the quarter directories and reference files.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Output file, relative to the data root.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("database")
}

fn default_output() -> PathBuf {
    PathBuf::from("qqq-summary.json")
}

/// Watchlist settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistConfig {
    /// Ticker symbols to keep; everything else is discarded.
    #[serde(default = "default_tickers")]
    pub tickers: Vec<String>,
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self {
            tickers: default_tickers(),
        }
    }
}

fn default_tickers() -> Vec<String> {
    DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect()
}

/// Input file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Fund -> manager reference file, relative to the data root.
    #[serde(default = "default_managers_file")]
    pub managers_file: String,

    /// Flat non-quarterly filings file, relative to the data root.
    #[serde(default = "default_non_quarterly_file")]
    pub non_quarterly_file: String,

    /// Extensions of per-fund files inside a quarter directory.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            managers_file: default_managers_file(),
            non_quarterly_file: default_non_quarterly_file(),
            extensions: default_extensions(),
        }
    }
}

fn default_managers_file() -> String {
    "hedge_funds.csv".to_string()
}

fn default_non_quarterly_file() -> String {
    "non_quarterly.csv".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["csv".to_string()]
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were actually given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref root) = args.root {
            self.general.root = root.clone();
        }
        if let Some(ref output) = args.output {
            self.general.output = output.clone();
        }
        if let Some(ref tickers) = args.tickers {
            // `--tickers NVDA,,AAPL` leaves blank entries behind
            self.watchlist.tickers = tickers
                .iter()
                .filter(|t| !t.trim().is_empty())
                .cloned()
                .collect();
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Build the watchlist from the configured tickers.
    pub fn watchlist(&self) -> Result<Watchlist> {
        Watchlist::new(&self.watchlist.tickers).context("Invalid watchlist configuration")
    }

    /// Path of the summary file to write.
    pub fn output_path(&self) -> PathBuf {
        self.general.root.join(&self.general.output)
    }

    /// Path of the fund -> manager reference file.
    pub fn managers_path(&self) -> PathBuf {
        self.general.root.join(&self.input.managers_file)
    }

    /// Path of the non-quarterly filings file.
    pub fn non_quarterly_path(&self) -> PathBuf {
        self.general.root.join(&self.input.non_quarterly_file)
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
