//! Lenient parsing of the numeric cells found in filing CSVs.
//!
//! None of these functions fail: unparseable input maps to zero so that a
//! single malformed cell never aborts a run.

/// Parse a market value such as `"$71.3M"`, `"1.2B"`, `"450K"` or `"1,234"`.
///
/// Only used to order positions; the stored value keeps its raw text.
/// `"inf"` parses to infinity and sorts first; `"nan"` counts as 0.0.
pub fn parse_value(value: &str) -> f64 {
    let s = value.trim().replace(['$', ','], "");

    let (number, multiplier) = match s.chars().last().map(|c| c.to_ascii_uppercase()) {
        Some('B') => (&s[..s.len() - 1], 1_000_000_000.0),
        Some('M') => (&s[..s.len() - 1], 1_000_000.0),
        Some('K') => (&s[..s.len() - 1], 1_000.0),
        _ => (s.as_str(), 1.0),
    };

    match number.trim().parse::<f64>() {
        Ok(n) if !n.is_nan() => n * multiplier,
        _ => 0.0,
    }
}

/// Parse a share count, ignoring thousands separators. Returns 0 on failure.
pub fn parse_count(value: &str) -> i64 {
    value.trim().replace(',', "").parse().unwrap_or(0)
}

/// Parse an average price. Returns 0.0 on failure.
///
/// Non-finite prices also map to 0.0 since they are written into the JSON.
pub fn parse_price(value: &str) -> f64 {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}
