//! Collapsing rows that share an identity into one row.

use std::collections::HashMap;

use atlas_model::{Cell, Column, ColumnKind, Table};

use crate::error::Result;

/// Arithmetic mean of the present numbers; missing when there are none.
fn mean(cells: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = cells.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

fn aggregate_cells(column: &Column, rows: &[usize]) -> Cell {
    match column.kind {
        ColumnKind::Numeric => {
            Cell::from_f64(mean(rows.iter().filter_map(|&r| column.get(r).as_f64())))
        }
        ColumnKind::Text => rows
            .iter()
            .map(|&r| column.get(r))
            .find(|cell| !cell.is_missing())
            .cloned()
            .unwrap_or(Cell::Missing),
    }
}

/// Builds one output row per group of input rows.
///
/// Numeric columns take the mean of present values, text columns the first
/// non-missing value in group order.
pub(crate) fn aggregate(table: &Table, groups: &[Vec<usize>]) -> Result<Table> {
    let columns = table
        .columns()
        .iter()
        .map(|column| Column {
            name: column.name.clone(),
            kind: column.kind,
            cells: groups
                .iter()
                .map(|rows| aggregate_cells(column, rows))
                .collect(),
        })
        .collect();
    Ok(Table::with_columns(table.name.clone(), columns)?)
}

/// Groups row indices by key in first-appearance order. Rows without a key
/// each form their own group.
pub(crate) fn group_by_key(keys: &[Option<String>]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for (row, key) in keys.iter().enumerate() {
        match key {
            Some(key) => match positions.get(key.as_str()) {
                Some(&group) => groups[group].push(row),
                None => {
                    positions.insert(key.as_str(), groups.len());
                    groups.push(vec![row]);
                }
            },
            None => groups.push(vec![row]),
        }
    }
    groups
}
