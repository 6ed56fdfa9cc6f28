//! Aggregation of raw filing CSVs.
//!
//! Quarterly per-fund files are folded into per-ticker holdings, and the
//! flat non-quarterly file into per-ticker filing lists. Both are keyed by
//! the watchlist so every tracked ticker is always present.

pub mod aggregator;
pub mod managers;
pub mod non_quarterly;
pub mod value;

pub use aggregator::*;
pub use managers::*;
pub use non_quarterly::*;

use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Open a header-keyed CSV reader with trimmed cells.
///
/// Rows may be shorter or longer than the header. `.tsv` files are read
/// tab-delimited.
pub(crate) fn csv_reader(path: &Path) -> csv::Result<Reader<File>> {
    let delimiter = match path.extension().and_then(|e| e.to_str()) {
        Some("tsv") => b'\t',
        _ => b',',
    };

    ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .delimiter(delimiter)
        .from_path(path)
}

/// Column lookup by header name.
pub(crate) struct Columns {
    index: HashMap<String, usize>,
}

impl Columns {
    pub(crate) fn new(headers: &StringRecord) -> Self {
        let mut index = HashMap::new();
        for (i, name) in headers.iter().enumerate() {
            // Last occurrence wins for duplicated headers
            index.insert(name.to_string(), i);
        }
        Self { index }
    }

    /// Cell for `column` in `record`.
    ///
    /// `None` when the header has no such column; an empty string when the
    /// column exists but the row is too short.
    pub(crate) fn get<'r>(&self, record: &'r StringRecord, column: &str) -> Option<&'r str> {
        self.index
            .get(column)
            .map(|&i| record.get(i).unwrap_or(""))
    }
}
