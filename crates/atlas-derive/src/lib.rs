//! Derived metrics over the merged country table.
//!
//! Derivation only appends columns (and drops columns a metric explicitly
//! supersedes). An output name that already exists is an error, so running
//! the stage twice fails instead of silently recomputing a column.

mod error;
mod metric;

use std::collections::HashSet;

use atlas_model::{COUNTRY_COLUMN, Column, ISO3_COLUMN, Table};

pub use error::{DeriveError, Result};
pub use metric::{DerivedMetric, Formula, builtin_metrics};

fn check_collisions(table: &Table, metrics: &[DerivedMetric]) -> Result<()> {
    let mut outputs = HashSet::new();
    for metric in metrics {
        if table.has_column(&metric.name) || !outputs.insert(metric.name.as_str()) {
            return Err(DeriveError::ColumnCollision {
                column: metric.name.clone(),
            });
        }
        if metric.inputs.len() != metric.formula.arity() {
            return Err(DeriveError::Arity {
                metric: metric.name.clone(),
                expected: metric.formula.arity(),
                actual: metric.inputs.len(),
            });
        }
    }
    Ok(())
}

/// Computes one metric, or `None` when an input column is absent.
fn compute(table: &Table, metric: &DerivedMetric) -> Result<Option<Column>> {
    let mut inputs = Vec::with_capacity(metric.inputs.len());
    for name in &metric.inputs {
        let Some(column) = table.column(name) else {
            tracing::debug!(metric = %metric.name, column = %name, "input absent, metric skipped");
            return Ok(None);
        };
        if !column.is_numeric() {
            return Err(DeriveError::NonNumericInput {
                metric: metric.name.clone(),
                column: name.clone(),
            });
        }
        inputs.push(column.f64_values());
    }

    let values = (0..table.height())
        .map(|row| {
            let args: Vec<Option<f64>> = inputs.iter().map(|input| input[row]).collect();
            metric.formula.apply(&args)
        })
        .collect();
    Ok(Some(Column::numeric(metric.name.clone(), values)))
}

/// Returns a new table with the metrics appended in order.
///
/// Fails before computing anything when an output name already exists in
/// the table or is repeated among `metrics`.
pub fn derive(table: &Table, metrics: &[DerivedMetric]) -> Result<Table> {
    check_collisions(table, metrics)?;

    let mut out = table.clone();
    let mut computed = 0usize;
    for metric in metrics {
        let Some(column) = compute(&out, metric)? else {
            continue;
        };
        out.push_column(column)?;
        computed += 1;
        for superseded in &metric.supersedes {
            if superseded == COUNTRY_COLUMN || superseded == ISO3_COLUMN {
                continue;
            }
            if out.remove_column(superseded).is_some() {
                tracing::debug!(metric = %metric.name, column = %superseded, "superseded column dropped");
            }
        }
    }
    tracing::info!(computed, skipped = metrics.len() - computed, "derived metrics");
    Ok(out)
}
