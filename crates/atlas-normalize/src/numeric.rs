//! Plain numeric parsing shared by the unit-aware parsers.

use std::sync::LazyLock;

use atlas_model::is_missing_token;
use regex::Regex;

static NUMBER_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d[\d,]*(?:\.\d+)?").expect("number regex"));

/// Parse a string value to `f64`.
///
/// Handles common numeric formats:
/// - Standard numbers: "123", "-45.67"
/// - Thousands separators: "1,234,567"
/// - Whitespace: "  123  "
/// - Scientific notation: "1.23e5"
///
/// Placeholder tokens ("n/a", "-", ...) and unparseable text yield `None`.
pub fn parse_numeric(value: &str) -> Option<f64> {
    if is_missing_token(value) {
        return None;
    }

    let cleaned = value
        .trim()
        .replace(',', "")
        .replace(' ', "")
        .replace('\u{a0}', "");

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// The first number embedded in free text, e.g. `43` in "43 (2015 est.)".
pub fn leading_number(value: &str) -> Option<f64> {
    let found = NUMBER_RUN.find(value)?;
    found.as_str().replace(',', "").parse::<f64>().ok()
}

/// Number of separate numeric runs in a value.
pub(crate) fn number_runs(value: &str) -> usize {
    NUMBER_RUN.find_iter(value).count()
}

/// Parses a plain number, falling back to the first embedded number.
pub fn parse_numeric_lenient(value: &str) -> Option<f64> {
    if is_missing_token(value) {
        return None;
    }
    parse_numeric(value).or_else(|| leading_number(value))
}
