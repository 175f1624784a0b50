//! Date normalization for birth and expiry dates.

use chrono::{Datelike, NaiveDate};

use super::patterns::TRAILING_PUNCTUATION;
use super::text::collapse_whitespace;

/// Parse `value` with the first matching format and render it as `YYYY-MM-DD`.
///
/// Formats are chrono `strftime` strings tried in order. A parse that yields
/// a year outside 1000-9999 (e.g. `%Y` reading "90") counts as a miss so a
/// later two-digit-year format can pick the value up.
pub fn normalize_date(value: &str, formats: &[String]) -> Option<String> {
    parse_date(value, formats).map(|d| d.format("%Y-%m-%d").to_string())
}

/// Parse `value` with the first matching format.
pub fn parse_date(value: &str, formats: &[String]) -> Option<NaiveDate> {
    let cleaned = collapse_whitespace(value);
    let cleaned = TRAILING_PUNCTUATION.replace(&cleaned, "");

    formats
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(&cleaned, fmt).ok())
        .find(|d| (1000..=9999).contains(&d.year()))
}
