//! Cell values and column kinds.

use serde::{Deserialize, Serialize};

/// A single table value.
///
/// Missing is explicit: a blank or placeholder source value never becomes zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Cell {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Number from an optional value, mapping `None` and NaN to `Missing`.
    pub fn from_f64(value: Option<f64>) -> Self {
        match value {
            Some(v) if !v.is_nan() => Self::Number(v),
            _ => Self::Missing,
        }
    }

    /// Text from an optional value, mapping `None` and blank strings to `Missing`.
    pub fn from_text(value: Option<String>) -> Self {
        match value {
            Some(v) if !v.trim().is_empty() => Self::Text(v),
            _ => Self::Missing,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Renders the value for display and CSV output; `Missing` renders empty.
    pub fn render(&self) -> String {
        match self {
            Self::Number(v) => format_numeric(*v),
            Self::Text(v) => v.clone(),
            Self::Missing => String::new(),
        }
    }
}

/// Column storage type, inferred from the cells it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Text,
}

/// Source tokens that mean "no value" (compared trimmed, case-insensitive).
pub const MISSING_TOKENS: &[&str] = &["", "na", "n/a", "-", "none", "null", "nan"];

/// Returns true when a raw source value is a missing/placeholder token.
pub fn is_missing_token(raw: &str) -> bool {
    let trimmed = raw.trim();
    MISSING_TOKENS
        .iter()
        .any(|token| trimmed.eq_ignore_ascii_case(token))
}

/// Formats a floating-point number without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
