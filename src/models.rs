//! Data models for the holdings summary.
//!
//! This module contains the core data structures used throughout
//! the application for representing the watchlist, fund positions,
//! non-quarterly filings, and the final summary document.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

/// Tickers tracked when no watchlist is configured (the QQQ top holdings).
pub const DEFAULT_TICKERS: [&str; 11] = [
    "NVDA", "AAPL", "MSFT", "META", "AMZN", "GOOGL", "AVGO", "TSLA", "AMD", "NFLX", "CRM",
];

/// Errors raised when building a watchlist.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WatchlistError {
    #[error("Watchlist must contain at least one ticker")]
    Empty,
    #[error("Invalid ticker symbol: {0:?}")]
    InvalidTicker(String),
}

/// The set of ticker symbols the pipeline restricts all output to.
///
/// Matching is case-sensitive and exact. Iteration order is sorted by
/// symbol, which keeps every ticker-keyed map in the output stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watchlist {
    tickers: BTreeSet<String>,
}

impl Watchlist {
    /// Build a watchlist from symbols. Symbols are trimmed; blank ones are rejected.
    pub fn new<I, S>(tickers: I) -> Result<Self, WatchlistError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for ticker in tickers {
            let raw = ticker.as_ref();
            let symbol = raw.trim();
            if symbol.is_empty() {
                return Err(WatchlistError::InvalidTicker(raw.to_string()));
            }
            set.insert(symbol.to_string());
        }

        if set.is_empty() {
            return Err(WatchlistError::Empty);
        }

        Ok(Self { tickers: set })
    }

    /// Returns true if `ticker` is on the watchlist.
    pub fn contains(&self, ticker: &str) -> bool {
        self.tickers.contains(ticker)
    }

    /// Iterate over the symbols in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tickers.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    /// Build an empty per-ticker map with one entry for every symbol.
    pub fn empty_map<T: Default>(&self) -> BTreeMap<String, T> {
        self.tickers
            .iter()
            .map(|t| (t.clone(), T::default()))
            .collect()
    }
}

impl Default for Watchlist {
    fn default() -> Self {
        Self {
            tickers: DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl fmt::Display for Watchlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols: Vec<&str> = self.iter().collect();
        write!(f, "{}", symbols.join(","))
    }
}

/// Classification of a fund's change in a holding for the filing period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeltaCategory {
    /// Position opened this period
    New,
    /// Position fully exited
    Closed,
    /// Share count went up
    Increased,
    /// Share count went down
    Decreased,
    /// Anything else, including blank deltas
    Unchanged,
}

impl DeltaCategory {
    /// Classify a raw delta descriptor such as `"NEW"`, `"CLOSE"`, `"+12.5%"` or `"-3%"`.
    pub fn classify(delta: &str) -> Self {
        let d = delta.trim().to_uppercase();
        if d == "NEW" {
            DeltaCategory::New
        } else if d == "CLOSE" {
            DeltaCategory::Closed
        } else if d.starts_with('+') {
            DeltaCategory::Increased
        } else if d.starts_with('-') {
            DeltaCategory::Decreased
        } else {
            DeltaCategory::Unchanged
        }
    }
}

impl fmt::Display for DeltaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeltaCategory::New => write!(f, "new"),
            DeltaCategory::Closed => write!(f, "closed"),
            DeltaCategory::Increased => write!(f, "increased"),
            DeltaCategory::Decreased => write!(f, "decreased"),
            DeltaCategory::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// A single fund's position in one ticker for the quarter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Fund name, taken from the CSV file stem.
    pub fund: String,
    /// Manager name, empty when the fund is not in the reference list.
    pub manager: String,
    pub shares: i64,
    /// Market value as reported, e.g. `"71.3M"`.
    pub value: String,
    /// Portfolio weight as reported, e.g. `"4.2%"`.
    pub portfolio_pct: String,
    /// Raw delta descriptor.
    pub delta: String,
    pub delta_shares: i64,
}

/// Per-ticker change counters.
///
/// Unchanged positions are not counted, so the counters may sum to
/// less than the number of funds holding the ticker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub increased: usize,
    pub decreased: usize,
    pub new: usize,
    pub closed: usize,
}

impl ChangeSummary {
    /// Count one position under its category.
    pub fn record(&mut self, category: DeltaCategory) {
        match category {
            DeltaCategory::Increased => self.increased += 1,
            DeltaCategory::Decreased => self.decreased += 1,
            DeltaCategory::New => self.new += 1,
            DeltaCategory::Closed => self.closed += 1,
            DeltaCategory::Unchanged => {}
        }
    }

    /// Sum of all tracked counters.
    pub fn total(&self) -> usize {
        self.increased + self.decreased + self.new + self.closed
    }
}

/// All fund positions in one ticker for the quarter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerHoldings {
    /// Positions sorted by market value, largest first.
    pub positions: Vec<Position>,
    pub summary: ChangeSummary,
    pub total_funds: usize,
}

/// An ad-hoc filing outside the quarterly cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonQuarterlyEntry {
    pub fund: String,
    pub shares: i64,
    pub value: String,
    pub avg_price: f64,
    /// Date of the transaction.
    pub date: String,
    /// Date the filing was published. Entries are ordered on this string.
    pub filing_date: String,
}

/// The complete summary document written to disk.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Quarter label, e.g. `"2025Q4"`.
    pub quarter: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub generated_at: DateTime<Utc>,
    pub holdings: BTreeMap<String, TickerHoldings>,
    pub non_quarterly: BTreeMap<String, Vec<NonQuarterlyEntry>>,
}

impl Summary {
    /// Number of funds holding `ticker`, zero if the ticker is unknown.
    pub fn fund_count(&self, ticker: &str) -> usize {
        self.holdings.get(ticker).map_or(0, |h| h.total_funds)
    }

    /// Number of non-quarterly filings for `ticker`.
    pub fn non_quarterly_count(&self, ticker: &str) -> usize {
        self.non_quarterly.get(ticker).map_or(0, Vec::len)
    }
}

/// ISO-8601 with an explicit `+00:00` offset.
///
/// Sub-second precision is truncated to microseconds, and the fraction is
/// left out entirely when the microsecond part is zero.
fn serialize_timestamp<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_timestamp(ts))
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    let precision = if ts.timestamp_subsec_micros() == 0 {
        SecondsFormat::Secs
    } else {
        SecondsFormat::Micros
    };
    ts.to_rfc3339_opts(precision, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_watchlist() {
        let watchlist = Watchlist::default();
        assert_eq!(watchlist.len(), 11);
        assert!(watchlist.contains("NVDA"));
        assert!(watchlist.contains("CRM"));
        assert!(!watchlist.contains("nvda"));
        assert!(!watchlist.contains("IBM"));
    }

    #[test]
    fn test_watchlist_sorted_iteration() {
        let watchlist = Watchlist::new(["MSFT", "AAPL", " NVDA "]).unwrap();
        let symbols: Vec<&str> = watchlist.iter().collect();
        assert_eq!(symbols, vec!["AAPL", "MSFT", "NVDA"]);
        assert_eq!(watchlist.to_string(), "AAPL,MSFT,NVDA");
    }

    #[test]
    fn test_watchlist_rejects_blank_and_empty() {
        assert_eq!(
            Watchlist::new(["AAPL", "  "]),
            Err(WatchlistError::InvalidTicker("  ".to_string()))
        );
        assert_eq!(
            Watchlist::new(Vec::<String>::new()),
            Err(WatchlistError::Empty)
        );
    }

    #[test]
    fn test_watchlist_empty_map_has_every_ticker() {
        let watchlist = Watchlist::new(["AAPL", "TSLA"]).unwrap();
        let map: BTreeMap<String, Vec<NonQuarterlyEntry>> = watchlist.empty_map();
        assert_eq!(map.len(), 2);
        assert!(map["AAPL"].is_empty());
        assert!(map["TSLA"].is_empty());
    }

    #[test]
    fn test_delta_classification() {
        assert_eq!(DeltaCategory::classify("NEW"), DeltaCategory::New);
        assert_eq!(DeltaCategory::classify(" new "), DeltaCategory::New);
        assert_eq!(DeltaCategory::classify("Close"), DeltaCategory::Closed);
        assert_eq!(DeltaCategory::classify("+12.5%"), DeltaCategory::Increased);
        assert_eq!(DeltaCategory::classify("-3%"), DeltaCategory::Decreased);
        assert_eq!(DeltaCategory::classify(""), DeltaCategory::Unchanged);
        assert_eq!(DeltaCategory::classify("NEWER"), DeltaCategory::Unchanged);
        assert_eq!(DeltaCategory::classify("CLOSED"), DeltaCategory::Unchanged);
    }

    #[test]
    fn test_change_summary_ignores_unchanged() {
        let mut summary = ChangeSummary::default();
        for delta in ["+5%", "+1%", "-2%", "NEW", "CLOSE", "0%", ""] {
            summary.record(DeltaCategory::classify(delta));
        }
        assert_eq!(summary.increased, 2);
        assert_eq!(summary.decreased, 1);
        assert_eq!(summary.new, 1);
        assert_eq!(summary.closed, 1);
        assert_eq!(summary.total(), 5);
    }

    #[test]
    fn test_position_serializes_camel_case() {
        let position = Position {
            fund: "Fund A".to_string(),
            manager: "Jane Doe".to_string(),
            shares: 100,
            value: "1.2M".to_string(),
            portfolio_pct: "3.1%".to_string(),
            delta: "+4%".to_string(),
            delta_shares: 4,
        };
        let json = serde_json::to_string(&position).unwrap();
        assert_eq!(
            json,
            r#"{"fund":"Fund A","manager":"Jane Doe","shares":100,"value":"1.2M","portfolioPct":"3.1%","delta":"+4%","deltaShares":4}"#
        );
    }

    #[test]
    fn test_format_timestamp_precision() {
        let whole = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(format_timestamp(&whole), "2026-01-02T03:04:05+00:00");

        let micros = whole + chrono::Duration::microseconds(120);
        assert_eq!(format_timestamp(&micros), "2026-01-02T03:04:05.000120+00:00");

        // Nanoseconds below one microsecond are dropped along with the fraction
        let nanos = whole + chrono::Duration::nanoseconds(999);
        assert_eq!(format_timestamp(&nanos), "2026-01-02T03:04:05+00:00");

        let truncated = whole + chrono::Duration::nanoseconds(1_500);
        assert_eq!(format_timestamp(&truncated), "2026-01-02T03:04:05.000001+00:00");
    }

    #[test]
    fn test_summary_timestamp_format() {
        let summary = Summary {
            quarter: "2025Q4".to_string(),
            generated_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
            holdings: BTreeMap::new(),
            non_quarterly: BTreeMap::new(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["generatedAt"], "2026-01-02T03:04:05+00:00");
        assert_eq!(json["quarter"], "2025Q4");
        assert!(json.get("nonQuarterly").is_some());
    }
}
