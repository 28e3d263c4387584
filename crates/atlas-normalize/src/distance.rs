//! Distance and area values such as "652,230 sq km" or "14.2 million sq km".

use atlas_model::is_missing_token;

use crate::numeric::{leading_number, number_runs};

fn scale_multiplier(lower: &str) -> f64 {
    let mut multiplier = 1.0;
    for token in lower.split(|ch: char| !ch.is_ascii_alphabetic()) {
        match token {
            "million" => multiplier = 1_000_000.0,
            "billion" => multiplier = 1_000_000_000.0,
            _ => {}
        }
    }
    multiplier
}

/// Parses a distance or area value into a plain number of kilometres
/// (square kilometres for areas).
///
/// A "million" token multiplies the value by 1,000,000. Every character
/// except digits, `.` and `-` is then stripped. When the value holds more
/// than one number, or the stripped remainder does not parse, the first
/// embedded number is used instead.
pub fn parse_km_value(raw: &str) -> Option<f64> {
    if is_missing_token(raw) {
        return None;
    }
    let lower = raw.trim().to_lowercase();
    let multiplier = scale_multiplier(&lower);

    let value = if number_runs(&lower) > 1 {
        leading_number(&lower)?
    } else {
        let stripped: String = lower
            .chars()
            .filter(|ch| ch.is_ascii_digit() || *ch == '.' || *ch == '-')
            .collect();
        match stripped.parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => leading_number(&lower)?,
        }
    };
    Some(value * multiplier)
}
