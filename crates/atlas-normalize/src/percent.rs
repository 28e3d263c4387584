//! Percentage values such as "12.3%" or "43% (2015 est.)".

use atlas_model::is_missing_token;

use crate::numeric::leading_number;

/// Parses a percent-bearing value into its numeric percentage.
///
/// `%` and thousands separators are stripped. A remainder that is not a
/// number on its own falls back to its leading number; no number at all
/// yields `None`.
pub fn parse_percent_value(raw: &str) -> Option<f64> {
    if is_missing_token(raw) {
        return None;
    }
    let stripped = raw.trim().replace(['%', ','], "");
    let stripped = stripped.trim();
    if stripped.is_empty() {
        return None;
    }
    match stripped.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => leading_number(stripped),
    }
}
