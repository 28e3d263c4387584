//! Over- and under-performers against a linear fit of one indicator on another.

use atlas_model::{COUNTRY_COLUMN, ISO3_COLUMN, Table};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};

/// Indicators where a smaller value is the better outcome.
pub const LOWER_IS_BETTER: &[&str] = &[
    "Population_Below_Poverty_Line_percent",
    "Infant_Mortality_Rate",
    "Unemployment_Rate_percent",
    "Youth_Unemployment_Rate_percent",
    "Youth_Unemployment_Rate [%]",
    "Adolescent_Birth_Rate_(births_per_1,000_women_ages_15-19)",
    "Death_Rate",
];

pub fn is_lower_better(column: &str) -> bool {
    LOWER_IS_BETTER.contains(&column)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceOptions {
    /// Fit against the natural log of `x`; rows with `x <= 0` are dropped.
    pub log_x: bool,
    pub top_n: usize,
    /// Overrides the built-in lower-is-better list for `y`.
    pub lower_is_better: Option<bool>,
}

impl Default for PerformanceOptions {
    fn default() -> Self {
        Self {
            log_x: true,
            top_n: 5,
            lower_is_better: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformancePoint {
    pub country: String,
    pub iso3: Option<String>,
    pub x: f64,
    pub y: f64,
    pub expected: f64,
    /// Positive means better than expected.
    pub residual: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Performance {
    pub x: String,
    pub y: String,
    pub log_x: bool,
    pub intercept: f64,
    pub slope: f64,
    /// All fitted rows, by ascending residual.
    pub points: Vec<PerformancePoint>,
    /// Worst first.
    pub under: Vec<PerformancePoint>,
    /// Best first.
    pub over: Vec<PerformancePoint>,
}

/// Ordinary least squares `y = a + b * x`.
pub fn fit_line(xs: &[f64], ys: &[f64]) -> Option<(f64, f64)> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let mean_x = xs[..n].iter().sum::<f64>() / n as f64;
    let mean_y = ys[..n].iter().sum::<f64>() / n as f64;
    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        sxy += (x - mean_x) * (y - mean_y);
        sxx += (x - mean_x).powi(2);
    }
    if sxx == 0.0 {
        return None;
    }
    let slope = sxy / sxx;
    Some((mean_y - slope * mean_x, slope))
}

fn numeric_values(table: &Table, column: &str) -> Result<Vec<Option<f64>>> {
    let column = table
        .column(column)
        .ok_or_else(|| AnalyticsError::UnknownColumn(column.to_string()))?;
    if !column.is_numeric() {
        return Err(AnalyticsError::NonNumeric(column.name.clone()));
    }
    Ok(column.f64_values())
}

/// Fits `y` on `x` across countries and ranks them by residual.
pub fn performance(
    table: &Table,
    x: &str,
    y: &str,
    options: &PerformanceOptions,
) -> Result<Performance> {
    let xs = numeric_values(table, x)?;
    let ys = numeric_values(table, y)?;
    let countries = table.column(COUNTRY_COLUMN);
    let codes = table.column(ISO3_COLUMN);

    let mut rows = Vec::new();
    for (row, (xv, yv)) in xs.iter().zip(&ys).enumerate() {
        let (Some(xv), Some(yv)) = (xv, yv) else {
            continue;
        };
        if options.log_x && *xv <= 0.0 {
            continue;
        }
        let model_x = if options.log_x { xv.ln() } else { *xv };
        rows.push((row, *xv, *yv, model_x));
    }
    if rows.len() < 2 {
        return Err(AnalyticsError::TooFewPoints {
            x: x.to_string(),
            y: y.to_string(),
            count: rows.len(),
        });
    }

    let model_xs: Vec<f64> = rows.iter().map(|r| r.3).collect();
    let model_ys: Vec<f64> = rows.iter().map(|r| r.2).collect();
    let (intercept, slope) = fit_line(&model_xs, &model_ys)
        .ok_or_else(|| AnalyticsError::ConstantPredictor(x.to_string()))?;
    let flip = options.lower_is_better.unwrap_or_else(|| is_lower_better(y));

    let mut points: Vec<PerformancePoint> = rows
        .into_iter()
        .map(|(row, xv, yv, model_x)| {
            let expected = intercept + slope * model_x;
            let residual = if flip { expected - yv } else { yv - expected };
            PerformancePoint {
                country: countries
                    .and_then(|c| c.get(row).as_text())
                    .unwrap_or_default()
                    .to_string(),
                iso3: codes.and_then(|c| c.get(row).as_text()).map(str::to_string),
                x: xv,
                y: yv,
                expected,
                residual,
            }
        })
        .collect();
    points.sort_by(|a, b| a.residual.total_cmp(&b.residual));

    let top = options.top_n.min(points.len());
    let under = points[..top].to_vec();
    let over = points[points.len() - top..].iter().rev().cloned().collect();
    tracing::debug!(x, y, slope, intercept, points = points.len(), "fitted performance line");

    Ok(Performance {
        x: x.to_string(),
        y: y.to_string(),
        log_x: options.log_x,
        intercept,
        slope,
        points,
        under,
        over,
    })
}
