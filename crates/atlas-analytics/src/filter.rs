use atlas_model::{ISO3_COLUMN, Table};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};

/// Inclusive numeric bounds on one column; an absent bound is open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeFilter {
    pub column: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RangeFilter {
    pub fn new(column: impl Into<String>, min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            column: column.into(),
            min,
            max,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// ISO3 codes of the rows that satisfy every filter, in table order.
///
/// Rows missing a filtered value or an ISO3 code never match.
pub fn apply_filters(table: &Table, filters: &[RangeFilter]) -> Result<Vec<String>> {
    let mut columns = Vec::with_capacity(filters.len());
    for filter in filters {
        let column = table
            .column(&filter.column)
            .ok_or_else(|| AnalyticsError::UnknownColumn(filter.column.clone()))?;
        if !column.is_numeric() {
            return Err(AnalyticsError::NonNumeric(filter.column.clone()));
        }
        columns.push((filter, column));
    }
    let codes = table
        .column(ISO3_COLUMN)
        .ok_or_else(|| AnalyticsError::UnknownColumn(ISO3_COLUMN.to_string()))?;

    let matches = (0..table.height())
        .filter(|&row| {
            columns.iter().all(|(filter, column)| {
                column
                    .get(row)
                    .as_f64()
                    .is_some_and(|value| filter.contains(value))
            })
        })
        .filter_map(|row| codes.get(row).as_text().map(str::to_string))
        .collect();
    Ok(matches)
}
