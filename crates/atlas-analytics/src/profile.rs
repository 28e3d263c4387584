//! Per-column distribution summaries.

use std::collections::BTreeMap;

use atlas_model::{Column, ColumnKind, Table};
use serde::Serialize;

/// Count, moments and quartiles of the present values of a numeric column.
///
/// `std` is the sample standard deviation; quartiles use linear
/// interpolation between order statistics. All statistics are `None` when
/// the column has no present values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub count: usize,
    pub missing: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueCount {
    /// `None` counts missing cells.
    pub value: Option<String>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Distribution {
    Numeric(NumericSummary),
    Categorical { value_counts: Vec<ValueCount> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub column: String,
    pub distribution: Distribution,
}

fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

pub fn summarize_numeric(values: &[Option<f64>]) -> NumericSummary {
    let mut present: Vec<f64> = values.iter().flatten().copied().collect();
    present.sort_by(f64::total_cmp);
    let n = present.len();
    let mean = (n > 0).then(|| present.iter().sum::<f64>() / n as f64);
    let std = mean.filter(|_| n > 1).map(|m| {
        let ss: f64 = present.iter().map(|v| (v - m).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    });
    NumericSummary {
        count: n,
        missing: values.len() - n,
        mean,
        std,
        min: present.first().copied(),
        q25: quantile(&present, 0.25),
        median: quantile(&present, 0.5),
        q75: quantile(&present, 0.75),
        max: present.last().copied(),
    }
}

fn value_counts(column: &Column) -> Vec<ValueCount> {
    let mut counts: BTreeMap<Option<String>, usize> = BTreeMap::new();
    for cell in &column.cells {
        let value = (!cell.is_missing()).then(|| cell.render());
        *counts.entry(value).or_default() += 1;
    }
    let mut counts: Vec<ValueCount> = counts
        .into_iter()
        .map(|(value, count)| ValueCount { value, count })
        .collect();
    // Most frequent first; ties keep value order.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

pub fn profile_column(column: &Column) -> ColumnProfile {
    let distribution = match column.kind {
        ColumnKind::Numeric => Distribution::Numeric(summarize_numeric(&column.f64_values())),
        ColumnKind::Text => Distribution::Categorical {
            value_counts: value_counts(column),
        },
    };
    ColumnProfile {
        column: column.name.clone(),
        distribution,
    }
}

/// Profiles every column, in table order.
pub fn profile(table: &Table) -> Vec<ColumnProfile> {
    table.columns().iter().map(profile_column).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_numeric_columns() {
        let summary = summarize_numeric(&[Some(1.0), Some(2.0), Some(3.0), Some(4.0), None]);
        assert_eq!(summary.count, 4);
        assert_eq!(summary.missing, 1);
        assert_eq!(summary.mean, Some(2.5));
        assert_eq!(summary.min, Some(1.0));
        assert_eq!(summary.q25, Some(1.75));
        assert_eq!(summary.median, Some(2.5));
        assert_eq!(summary.q75, Some(3.25));
        assert_eq!(summary.max, Some(4.0));
        let std = summary.std.unwrap();
        assert!((std - 1.2909944487358056).abs() < 1e-12);
    }

    #[test]
    fn single_value_has_no_std() {
        let summary = summarize_numeric(&[Some(5.0)]);
        assert_eq!(summary.std, None);
        assert_eq!(summary.median, Some(5.0));
    }

    #[test]
    fn empty_numeric_column() {
        let summary = summarize_numeric(&[None, None]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean, None);
        assert_eq!(summary.q25, None);
    }

    #[test]
    fn counts_text_values_including_missing() {
        let column = Column::text(
            "Region",
            vec![Some("Africa".into()), None, Some("Africa".into()), Some("Asia".into())],
        );
        let ColumnProfile { distribution, .. } = profile_column(&column);
        let Distribution::Categorical { value_counts } = distribution else {
            panic!("expected categorical");
        };
        assert_eq!(value_counts[0], ValueCount { value: Some("Africa".into()), count: 2 });
        assert_eq!(value_counts.len(), 3);
        assert!(value_counts.contains(&ValueCount { value: None, count: 1 }));
    }
}
