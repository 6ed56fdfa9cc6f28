//! Directory scanner for quarter folders and per-fund data files.
//!
//! This module locates `YYYYQn` quarter directories under the data root
//! and lists the tabular files inside a quarter in a deterministic order.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Configuration for file scanning.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// File extensions treated as tabular data (e.g., ["csv"])
    pub extensions: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["csv".to_string()],
        }
    }
}

impl From<&crate::config::InputConfig> for ScanConfig {
    fn from(config: &crate::config::InputConfig) -> Self {
        Self {
            extensions: config.extensions.clone(),
        }
    }
}

/// A per-fund data file found in a quarter directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundFile {
    /// Fund name (file stem)
    pub fund: String,
    /// Full path to the file
    pub path: PathBuf,
}

/// Returns true for names of the form `YYYYQn` with `n` in 1..=4.
pub fn is_quarter_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() == 6
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'Q'
        && (b'1'..=b'4').contains(&bytes[5])
}

/// List all quarter directory names under `root`, sorted ascending.
pub fn list_quarters(root: &Path) -> Result<Vec<String>> {
    let mut quarters = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(e)
                    .with_context(|| format!("Failed to read directory {}", root.display()));
            }
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", root.display(), e);
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if is_quarter_name(&name) {
            quarters.push(name.into_owned());
        } else {
            debug!("Skipping non-quarter directory: {}", name);
        }
    }

    quarters.sort();
    Ok(quarters)
}

/// Find the most recent quarter directory name under `root`.
///
/// The pattern is fixed-width, so the greatest name by string comparison is
/// also the latest quarter. Returns `Ok(None)` if no directory matches.
pub fn find_latest_quarter(root: &Path) -> Result<Option<String>> {
    Ok(list_quarters(root)?.pop())
}

/// File scanner for the per-fund files of one quarter.
pub struct FileScanner {
    config: ScanConfig,
    quarter_dir: PathBuf,
}

impl FileScanner {
    /// Create a new file scanner.
    pub fn new(quarter_dir: PathBuf, config: ScanConfig) -> Self {
        Self {
            config,
            quarter_dir,
        }
    }

    /// Scan for all matching files, sorted by file name.
    pub fn scan(&self) -> Result<Vec<FundFile>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.quarter_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(e).with_context(|| {
                        format!("Failed to read directory {}", self.quarter_dir.display())
                    });
                }
                Err(e) => {
                    warn!(
                        "Skipping unreadable entry in {}: {}",
                        self.quarter_dir.display(),
                        e
                    );
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !self.matches(path) {
                continue;
            }

            let fund = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();

            files.push(FundFile {
                fund,
                path: path.to_path_buf(),
            });
        }

        Ok(files)
    }

    /// Check if a file name ends in one of the configured extensions.
    ///
    /// Dotfiles are included, so `.hidden.csv` and even `.csv` match `csv`.
    pub fn matches(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };

        self.config
            .extensions
            .iter()
            .any(|ext| name.ends_with(&format!(".{}", ext)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_quarter_name() {
        assert!(is_quarter_name("2025Q1"));
        assert!(is_quarter_name("1999Q4"));
        assert!(!is_quarter_name("2025Q0"));
        assert!(!is_quarter_name("2025Q5"));
        assert!(!is_quarter_name("2025q1"));
        assert!(!is_quarter_name("25Q1"));
        assert!(!is_quarter_name("2025Q12"));
        assert!(!is_quarter_name("2025Q1\n"));
        assert!(!is_quarter_name("notaquarter"));
    }

    #[test]
    fn test_find_latest_quarter() {
        let root = TempDir::new().unwrap();
        for name in ["2024Q3", "2025Q1", "2025Q4", "notaquarter"] {
            fs::create_dir(root.path().join(name)).unwrap();
        }
        // A file with a quarter-like name is not a quarter directory
        fs::write(root.path().join("2026Q1"), "").unwrap();

        let latest = find_latest_quarter(root.path()).unwrap();
        assert_eq!(latest.as_deref(), Some("2025Q4"));

        let all = list_quarters(root.path()).unwrap();
        assert_eq!(all, vec!["2024Q3", "2025Q1", "2025Q4"]);
    }

    #[test]
    fn test_find_latest_quarter_none() {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("archive")).unwrap();
        fs::write(root.path().join("hedge_funds.csv"), "Fund,Manager\n").unwrap();

        assert_eq!(find_latest_quarter(root.path()).unwrap(), None);
    }

    #[test]
    fn test_scan_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        for name in ["Zeta Capital.csv", "Alpha Fund.csv", "notes.txt", ".hidden.csv"] {
            fs::write(dir.path().join(name), "Ticker\n").unwrap();
        }
        fs::create_dir(dir.path().join("nested.csv")).unwrap();

        let scanner = FileScanner::new(dir.path().to_path_buf(), ScanConfig::default());
        let files = scanner.scan().unwrap();
        let funds: Vec<&str> = files.iter().map(|f| f.fund.as_str()).collect();

        assert_eq!(funds, vec![".hidden", "Alpha Fund", "Zeta Capital"]);
        assert_eq!(files[1].path, dir.path().join("Alpha Fund.csv"));
    }

    #[test]
    fn test_scan_bare_extension_name() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".csv"), "").unwrap();
        fs::write(dir.path().join("csv"), "").unwrap();

        let files = FileScanner::new(dir.path().to_path_buf(), ScanConfig::default())
            .scan()
            .unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].fund, ".csv");
    }

    #[cfg(unix)]
    #[test]
    fn test_find_latest_quarter_ignores_broken_entries() {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("2025Q4")).unwrap();
        std::os::unix::fs::symlink("/nonexistent/target", root.path().join("stale_link"))
            .unwrap();
        std::os::unix::fs::symlink("/nonexistent/quarter", root.path().join("2026Q1")).unwrap();

        let latest = find_latest_quarter(root.path()).unwrap();
        assert_eq!(latest.as_deref(), Some("2025Q4"));
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_ignores_broken_entries() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Alpha Fund.csv"), "Ticker\n").unwrap();
        std::os::unix::fs::symlink("/nonexistent/fund.csv", dir.path().join("Gone.csv")).unwrap();

        let files = FileScanner::new(dir.path().to_path_buf(), ScanConfig::default())
            .scan()
            .unwrap();
        let funds: Vec<&str> = files.iter().map(|f| f.fund.as_str()).collect();
        assert_eq!(funds, vec!["Alpha Fund"]);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let root = TempDir::new().unwrap();
        assert!(list_quarters(&root.path().join("missing")).is_err());
    }

    #[test]
    fn test_scan_custom_extensions() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.csv"), "").unwrap();
        fs::write(dir.path().join("b.tsv"), "").unwrap();

        let config = ScanConfig {
            extensions: vec!["tsv".to_string()],
        };
        let files = FileScanner::new(dir.path().to_path_buf(), config)
            .scan()
            .unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].fund, "b");
    }
}
