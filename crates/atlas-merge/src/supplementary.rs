//! Join of tables keyed directly by ISO3, after identity resolution.

use std::collections::BTreeMap;

use atlas_model::{COUNTRY_COLUMN, Cell, Column, ColumnKind, ISO3_COLUMN, NormalizedTable, Table};
use atlas_resolve::Registry;

use crate::dedupe::{aggregate, group_by_key};
use crate::error::{MergeError, Result};
use crate::identity::sort_by_country;
use crate::join::{key_of, outer_join};

/// Upper-cases the ISO3 key, drops rows without one and collapses repeated
/// codes with the usual aggregation rules.
fn keyed_by_iso3(name: &str, table: &Table) -> Result<Table> {
    let codes: Vec<Option<String>> = table
        .require_column(ISO3_COLUMN)
        .map_err(|_| MergeError::MissingKey {
            table: name.to_string(),
            column: ISO3_COLUMN.to_string(),
        })?
        .cells
        .iter()
        .map(|cell| key_of(cell).map(|code| code.to_ascii_uppercase()))
        .collect();

    let keep: Vec<usize> = (0..codes.len()).filter(|&row| codes[row].is_some()).collect();
    let dropped = codes.len() - keep.len();
    if dropped > 0 {
        tracing::warn!(table = name, dropped, "rows without an ISO3 code cannot be joined");
    }

    let mut keyed = table.take_rows(&keep);
    keyed.name = name.to_string();
    let kept_codes: Vec<Option<String>> = keep.iter().map(|&row| codes[row].clone()).collect();
    keyed.replace_column(ISO3_COLUMN, Column::text(ISO3_COLUMN, kept_codes.clone()))?;
    aggregate(&keyed, &group_by_key(&kept_codes))
}

/// Outer-joins ISO3-keyed tables onto a merged table, in table-name order.
///
/// Codes absent from the merged table are appended, named after the
/// registry entry when there is one and after the code otherwise.
pub fn merge_supplementary(
    merged: Table,
    tables: &BTreeMap<String, NormalizedTable>,
    registry: &Registry,
) -> Result<Table> {
    let mut out = merged;
    for (name, table) in tables {
        let right = keyed_by_iso3(name, table.table())?;
        let before = out.height();
        out = outer_join(&out, &right, ISO3_COLUMN)?;
        tracing::info!(
            table = %name,
            rows = right.height(),
            appended = out.height() - before,
            "joined supplementary table"
        );
    }

    let codes: Vec<Option<String>> = out
        .require_column(ISO3_COLUMN)?
        .cells
        .iter()
        .map(key_of)
        .collect();
    if let Some(country) = out.column(COUNTRY_COLUMN) {
        let cells: Vec<Cell> = country
            .cells
            .iter()
            .zip(&codes)
            .map(|(cell, code)| match (cell, code) {
                (Cell::Missing, Some(code)) => Cell::text(
                    registry
                        .by_code(code)
                        .map_or_else(|| code.clone(), |record| record.name.clone()),
                ),
                (cell, _) => cell.clone(),
            })
            .collect();
        out.replace_column(
            COUNTRY_COLUMN,
            Column {
                name: COUNTRY_COLUMN.to_string(),
                kind: ColumnKind::Text,
                cells,
            },
        )?;
    }
    Ok(sort_by_country(&out))
}
