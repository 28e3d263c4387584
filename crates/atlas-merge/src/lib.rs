//! Table merge engine.
//!
//! Joins every normalized table on the country key, resolves each row to a
//! canonical country, collapses rows that land on the same country and
//! backfills registry countries without data, so consumers always find
//! exactly one row per known country.

mod dedupe;
mod error;
mod identity;
mod join;
mod supplementary;

use std::collections::BTreeMap;

use atlas_model::{COUNTRY_COLUMN, NormalizedTable, Table};
use atlas_resolve::{CountryResolver, ResolutionReport};

pub use error::{MergeError, Result};
pub use supplementary::merge_supplementary;

/// Name given to the merged table.
pub const MERGED_TABLE_NAME: &str = "merged";

/// The merged table plus how its country names were resolved.
#[derive(Debug, Clone)]
pub struct MergedTable {
    pub table: Table,
    pub report: ResolutionReport,
}

/// Merges tables on `key` (usually `Country`).
///
/// Tables are outer-joined left to right in name order. Every table must
/// carry `key`; a missing key column fails the merge rather than skipping
/// the table.
pub fn merge(
    tables: &BTreeMap<String, NormalizedTable>,
    key: &str,
    resolver: &CountryResolver,
) -> Result<MergedTable> {
    if tables.is_empty() {
        return Err(MergeError::NoTables);
    }
    for (name, table) in tables {
        if !table.table().has_column(key) {
            return Err(MergeError::MissingKey {
                table: name.clone(),
                column: key.to_string(),
            });
        }
    }

    let mut joined: Option<Table> = None;
    for (name, table) in tables {
        let mut next = table.table().clone();
        next.name = name.clone();
        joined = Some(match joined {
            None => next,
            Some(left) => join::outer_join(&left, &next, key)?,
        });
    }
    let mut joined = joined.ok_or(MergeError::NoTables)?;
    joined.name = MERGED_TABLE_NAME.to_string();
    tracing::info!(tables = tables.len(), rows = joined.height(), "joined tables");

    let (resolved, report) = identity::resolve_identity(joined, key, resolver)?;
    report.log_misses();

    let keys: Vec<Option<String>> = resolved
        .require_column(COUNTRY_COLUMN)?
        .cells
        .iter()
        .map(|cell| cell.as_text().map(str::to_string))
        .collect();
    let groups = dedupe::group_by_key(&keys);
    let deduped = dedupe::aggregate(&resolved, &groups)?;
    tracing::info!(
        rows = resolved.height(),
        countries = deduped.height(),
        "deduplicated by canonical country"
    );

    let (filled, backfilled) = identity::backfill(deduped, resolver)?;
    tracing::info!(backfilled, rows = filled.height(), "backfilled registry countries");

    Ok(MergedTable {
        table: identity::sort_by_country(&filled),
        report,
    })
}
