//! Quarterly holdings aggregation.
//!
//! This module folds every per-fund CSV of a quarter into per-ticker
//! holdings: positions sorted by market value plus change counters.

use super::value::{parse_count, parse_value};
use super::{csv_reader, Columns, ManagerDirectory};
use crate::models::{DeltaCategory, Position, TickerHoldings, Watchlist};
use crate::scanner::{FileScanner, FundFile, ScanConfig};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Aggregate all fund files of a quarter directory, filtered to the watchlist.
pub fn aggregate_quarter(
    quarter_dir: &Path,
    scan_config: &ScanConfig,
    managers: &ManagerDirectory,
    watchlist: &Watchlist,
) -> Result<BTreeMap<String, TickerHoldings>> {
    let scanner = FileScanner::new(quarter_dir.to_path_buf(), scan_config.clone());
    let files = scanner.scan()?;
    info!(
        "Found {} fund files in {}",
        files.len(),
        quarter_dir.display()
    );

    aggregate_fund_files(&files, managers, watchlist)
}

/// Aggregate an explicit list of fund files, processed in the given order.
pub fn aggregate_fund_files(
    files: &[FundFile],
    managers: &ManagerDirectory,
    watchlist: &Watchlist,
) -> Result<BTreeMap<String, TickerHoldings>> {
    let mut holdings: BTreeMap<String, TickerHoldings> = watchlist.empty_map();

    for file in files {
        let manager = managers.get(&file.fund).cloned().unwrap_or_default();
        let matched = collect_fund_positions(file, &manager, watchlist, &mut holdings)?;
        debug!("{}: {} watchlist positions", file.fund, matched);
    }

    for (ticker, ticker_holdings) in holdings.iter_mut() {
        sort_positions_by_value(&mut ticker_holdings.positions);
        ticker_holdings.total_funds = ticker_holdings.positions.len();
        debug!(
            "{}: {} funds, {} changed",
            ticker,
            ticker_holdings.total_funds,
            ticker_holdings.summary.total()
        );
    }

    Ok(holdings)
}

/// Read one fund file and append its watchlist positions. Returns the number matched.
fn collect_fund_positions(
    file: &FundFile,
    manager: &str,
    watchlist: &Watchlist,
    holdings: &mut BTreeMap<String, TickerHoldings>,
) -> Result<usize> {
    let path = &file.path;
    let mut reader = csv_reader(path)
        .with_context(|| format!("Failed to open fund file: {}", path.display()))?;
    let columns = Columns::new(
        reader
            .headers()
            .with_context(|| format!("Failed to read header of {}", path.display()))?,
    );

    let mut matched = 0;

    for (index, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping row {} of {}: {}", index + 1, path.display(), e);
                continue;
            }
        };

        let ticker = columns.get(&record, "Ticker").unwrap_or("");
        if !watchlist.contains(ticker) {
            continue;
        }

        // Watchlist tickers were seeded up front
        let Some(entry) = holdings.get_mut(ticker) else {
            continue;
        };

        let delta = columns.get(&record, "Delta").unwrap_or("");
        let category = DeltaCategory::classify(delta);

        let position = Position {
            fund: file.fund.clone(),
            manager: manager.to_string(),
            shares: parse_count(columns.get(&record, "Shares").unwrap_or("0")),
            value: columns.get(&record, "Value").unwrap_or("N/A").to_string(),
            portfolio_pct: columns.get(&record, "Portfolio%").unwrap_or("N/A").to_string(),
            delta: delta.to_string(),
            delta_shares: parse_count(columns.get(&record, "Delta_Shares").unwrap_or("0")),
        };

        entry.positions.push(position);
        entry.summary.record(category);
        matched += 1;
    }

    Ok(matched)
}

/// Sort positions by parsed market value, largest first. Ties keep file order.
pub fn sort_positions_by_value(positions: &mut [Position]) {
    positions.sort_by(|a, b| parse_value(&b.value).total_cmp(&parse_value(&a.value)));
}
