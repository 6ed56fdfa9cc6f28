//! Non-quarterly filing aggregation.

use super::value::{parse_count, parse_price};
use super::{csv_reader, Columns};
use crate::models::{NonQuarterlyEntry, Watchlist};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Parse the flat non-quarterly filings file, filtered to the watchlist.
///
/// Every watchlist ticker is present in the result; a missing file yields
/// empty lists. Each list is ordered by filing date, newest first.
pub fn aggregate_non_quarterly(
    path: &Path,
    watchlist: &Watchlist,
) -> Result<BTreeMap<String, Vec<NonQuarterlyEntry>>> {
    let mut result: BTreeMap<String, Vec<NonQuarterlyEntry>> = watchlist.empty_map();

    if !path.exists() {
        debug!("No non-quarterly filings at {}", path.display());
        return Ok(result);
    }

    let mut reader = csv_reader(path)
        .with_context(|| format!("Failed to open non-quarterly file: {}", path.display()))?;
    let columns = Columns::new(
        reader
            .headers()
            .with_context(|| format!("Failed to read header of {}", path.display()))?,
    );

    for (index, row) in reader.records().enumerate() {
        let record = match row {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping row {} of {}: {}", index + 1, path.display(), e);
                continue;
            }
        };

        let ticker = columns.get(&record, "Ticker").unwrap_or("");
        let Some(entries) = result.get_mut(ticker) else {
            continue;
        };

        entries.push(NonQuarterlyEntry {
            fund: columns.get(&record, "Fund").unwrap_or("").to_string(),
            shares: parse_count(columns.get(&record, "Shares").unwrap_or("0")),
            value: columns.get(&record, "Value").unwrap_or("N/A").to_string(),
            avg_price: parse_price(columns.get(&record, "Avg_Price").unwrap_or("0")),
            date: columns.get(&record, "Date").unwrap_or("").to_string(),
            filing_date: columns.get(&record, "Filing_Date").unwrap_or("").to_string(),
        });
    }

    // Plain string order; only chronological for sortable formats like YYYY-MM-DD
    for entries in result.values_mut() {
        entries.sort_by(|a, b| b.filing_date.cmp(&a.filing_date));
    }

    Ok(result)
}
