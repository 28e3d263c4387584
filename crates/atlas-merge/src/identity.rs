//! Per-row identity resolution and the canonical row order.

use std::cmp::Ordering;
use std::collections::HashSet;

use atlas_model::{COUNTRY_COLUMN, Cell, Column, ISO3_COLUMN, Table};
use atlas_resolve::{CountryResolver, ResolutionMethod, ResolutionReport, normalize_name};

use crate::error::Result;
use crate::join::key_of;

/// Suffix for source columns that would shadow the identity columns.
const SHADOWED_SUFFIX: &str = "source";

/// Replaces the key column by canonical `Country` and `ISO3` columns, placed
/// first. Rows with a blank key get a missing `Country`.
pub(crate) fn resolve_identity(
    table: Table,
    key: &str,
    resolver: &CountryResolver,
) -> Result<(Table, ResolutionReport)> {
    let key_cells = &table.require_column(key)?.cells;
    let mut report = ResolutionReport::default();
    let mut countries = Vec::with_capacity(key_cells.len());
    let mut codes = Vec::with_capacity(key_cells.len());

    for cell in key_cells {
        let raw = key_of(cell).unwrap_or_default();
        let resolution = resolver.resolve(&raw);
        report.record(&raw, &resolution);
        countries.push(match resolution.method {
            ResolutionMethod::Empty => None,
            _ => Some(resolution.canonical.trim().to_string()),
        });
        codes.push(resolution.iso3.map(|code| code.to_string()));
    }

    let name = table.name.clone();
    let mut columns = vec![
        Column::text(COUNTRY_COLUMN, countries),
        Column::text(ISO3_COLUMN, codes),
    ];
    for mut column in table.into_columns() {
        if column.name == key {
            continue;
        }
        if column.name == COUNTRY_COLUMN || column.name == ISO3_COLUMN {
            let renamed = format!("{}_{SHADOWED_SUFFIX}", column.name);
            tracing::warn!(column = %column.name, renamed = %renamed, "identity column shadowed, renamed");
            column.name = renamed;
        }
        columns.push(column);
    }
    Ok((Table::with_columns(name, columns)?, report))
}

/// Sorts rows by canonical name (accent-insensitive), rows without a
/// country last.
pub(crate) fn sort_by_country(table: &Table) -> Table {
    let Some(country) = table.column(COUNTRY_COLUMN) else {
        return table.clone();
    };
    let mut order: Vec<(Option<(String, String)>, usize)> = country
        .cells
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let key = cell
                .as_text()
                .map(|name| (normalize_name(name), name.to_string()));
            (key, idx)
        })
        .collect();
    order.sort_by(|(a, ai), (b, bi)| match (a, b) {
        (Some(a), Some(b)) => a.cmp(b).then(ai.cmp(bi)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => ai.cmp(bi),
    });
    let indices: Vec<usize> = order.into_iter().map(|(_, idx)| idx).collect();
    table.take_rows(&indices)
}

/// Appends a row for every registry country whose ISO3 is absent, with all
/// indicator columns missing.
pub(crate) fn backfill(table: Table, resolver: &CountryResolver) -> Result<(Table, usize)> {
    let present: HashSet<String> = table
        .require_column(ISO3_COLUMN)?
        .cells
        .iter()
        .filter_map(|cell| cell.as_text().map(str::to_string))
        .collect();
    let absent: Vec<_> = resolver
        .registry()
        .records()
        .iter()
        .filter(|record| !present.contains(record.iso3.as_str()))
        .collect();
    if absent.is_empty() {
        return Ok((table, 0));
    }

    let name = table.name.clone();
    let mut columns = table.into_columns();
    for column in &mut columns {
        for record in &absent {
            let cell = match column.name.as_str() {
                COUNTRY_COLUMN => Cell::text(record.name.clone()),
                ISO3_COLUMN => Cell::text(record.iso3.as_str()),
                _ => Cell::Missing,
            };
            column.cells.push(cell);
        }
    }
    let count = absent.len();
    Ok((Table::with_columns(name, columns)?, count))
}
