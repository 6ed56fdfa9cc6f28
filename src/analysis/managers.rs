//! Fund to manager reference table.

use super::{csv_reader, Columns};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Lookup from fund name to manager name.
pub type ManagerDirectory = HashMap<String, String>;

/// Load the fund -> manager mapping.
///
/// A missing file yields an empty directory. Rows without a fund name are
/// skipped and later rows override earlier ones for the same fund.
pub fn load_fund_managers(path: &Path) -> Result<ManagerDirectory> {
    let mut managers = ManagerDirectory::new();

    if !path.exists() {
        debug!("No manager reference at {}", path.display());
        return Ok(managers);
    }

    let mut reader = csv_reader(path)
        .with_context(|| format!("Failed to open manager reference: {}", path.display()))?;
    let columns = Columns::new(
        reader
            .headers()
            .with_context(|| format!("Failed to read header of {}", path.display()))?,
    );

    for (index, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping row {} of {}: {}", index + 1, path.display(), e);
                continue;
            }
        };

        let fund = columns.get(&record, "Fund").unwrap_or("");
        if fund.is_empty() {
            continue;
        }

        let manager = columns.get(&record, "Manager").unwrap_or("");
        managers.insert(fund.to_string(), manager.to_string());
    }

    Ok(managers)
}
