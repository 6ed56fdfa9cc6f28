//! Summary document generation.
//!
//! This module assembles the `Summary` from the aggregation results,
//! renders it as indented JSON, and formats the per-ticker stats
//! printed after a run.

use crate::models::{NonQuarterlyEntry, Summary, TickerHoldings, Watchlist};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Assemble the summary document.
pub fn build_summary(
    quarter: &str,
    generated_at: DateTime<Utc>,
    holdings: BTreeMap<String, TickerHoldings>,
    non_quarterly: BTreeMap<String, Vec<NonQuarterlyEntry>>,
) -> Summary {
    Summary {
        quarter: quarter.to_string(),
        generated_at,
        holdings,
        non_quarterly,
    }
}

/// Render the summary as JSON with 2-space indentation.
pub fn generate_json_summary(summary: &Summary) -> Result<String> {
    serde_json::to_string_pretty(summary).map_err(Into::into)
}

/// Write the summary to `path`, replacing any previous file.
pub fn write_json_summary(summary: &Summary, path: &Path) -> Result<()> {
    let content = generate_json_summary(summary)?;

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write summary to {}", path.display()))?;

    Ok(())
}

/// One line per watchlist ticker: fund count and non-quarterly filing count.
pub fn ticker_stats_lines(summary: &Summary, watchlist: &Watchlist) -> Vec<String> {
    watchlist
        .iter()
        .map(|ticker| {
            format!(
                "  {}: {} funds, {} non-quarterly filings",
                ticker,
                summary.fund_count(ticker),
                summary.non_quarterly_count(ticker)
            )
        })
        .collect()
}
