//! Field normalizers for raw country tables.
//!
//! Source tables carry unit-bearing strings ("652,230 sq km", "12.3%",
//! "34 00 N, 65 00 E", "1 July - 30 June"). The parsers here turn them into
//! numbers or month-day strings; anything unparseable becomes missing and
//! never aborts a row or table.

mod coordinates;
mod distance;
mod error;
mod fiscal;
mod numeric;
mod percent;
mod profile;

use std::collections::BTreeMap;

use atlas_model::{NormalizedTable, Table};

pub use coordinates::{parse_coordinates, parse_one_coord};
pub use distance::parse_km_value;
pub use error::{NormalizeError, Result};
pub use fiscal::{FiscalYear, parse_fiscal_year};
pub use numeric::{leading_number, parse_numeric, parse_numeric_lenient};
pub use percent::parse_percent_value;
pub use profile::{ColumnRule, FieldKind, ProfileSet, TableProfile, normalize};

/// Normalizes every table that has a profile; the rest pass through.
pub fn normalize_all(
    tables: BTreeMap<String, Table>,
    profiles: &ProfileSet,
) -> Result<BTreeMap<String, NormalizedTable>> {
    let mut out = BTreeMap::new();
    for (name, table) in tables {
        let normalized = match profiles.get(&name) {
            Some(profile) => normalize(table, profile)?,
            None => {
                tracing::debug!(table = %name, "no normalization profile");
                NormalizedTable::passthrough(table)
            }
        };
        if normalized.total_parse_misses() > 0 {
            tracing::info!(
                table = %name,
                parse_misses = normalized.total_parse_misses(),
                "values could not be parsed and were left missing"
            );
        }
        out.insert(name, normalized);
    }
    Ok(out)
}
