//! Fiscal-year ranges such as "1 July - 30 June" or "calendar year".

use chrono::{Month, NaiveDate};
use serde::{Deserialize, Serialize};

use atlas_model::is_missing_token;

/// Start and end of a fiscal year as `MM-DD` strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FiscalYear {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl FiscalYear {
    fn unknown() -> Self {
        Self::default()
    }
}

/// Converts "1 July" or "July 1" into "07-01". Day/month combinations that
/// never occur (such as 31 February) are rejected; 29 February is accepted.
fn day_month(raw: &str) -> Option<String> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let (day, month) = match tokens.as_slice() {
        [a, b] => match (a.parse::<u32>(), b.parse::<u32>()) {
            (Ok(day), Err(_)) => (day, b.parse::<Month>().ok()?),
            (Err(_), Ok(day)) => (day, a.parse::<Month>().ok()?),
            _ => return None,
        },
        _ => return None,
    };
    let month = month.number_from_month();
    // 2000 is a leap year, so 29 February validates.
    NaiveDate::from_ymd_opt(2000, month, day)?;
    Some(format!("{month:02}-{day:02}"))
}

/// Parses a fiscal-year description.
///
/// "calendar year" anywhere in the value means `01-01` to `12-31`; otherwise
/// the value must be a `"<start> - <end>"` day-month range. Anything else
/// yields an unknown start and end, never an error.
pub fn parse_fiscal_year(raw: &str) -> FiscalYear {
    if is_missing_token(raw) {
        return FiscalYear::unknown();
    }
    let lower = raw.trim().to_lowercase();
    if lower.contains("calendar year") {
        return FiscalYear {
            start: Some("01-01".to_string()),
            end: Some("12-31".to_string()),
        };
    }
    let sides: Vec<&str> = lower.split(['-', '\u{2013}']).collect();
    let [start, end] = sides.as_slice() else {
        return FiscalYear::unknown();
    };
    match (day_month(start), day_month(end)) {
        (Some(start), Some(end)) => FiscalYear {
            start: Some(start),
            end: Some(end),
        },
        _ => FiscalYear::unknown(),
    }
}
