//! Raw table loading for the country atlas.
//!
//! Reads a directory of comma-separated files into named, loosely typed
//! tables. No domain transformation happens here: columns are only typed as
//! numeric or text, and placeholder tokens become explicit missing values.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use atlas_ingest::load_tables;
//!
//! let tables = load_tables(Path::new("data"))?;
//! let economy = &tables["economy_data"];
//! ```

mod csv_file;
mod discovery;
mod error;

use std::collections::BTreeMap;
use std::path::Path;

use atlas_model::Table;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv_file::{infer_column, normalize_headers, read_table};

// === File Discovery ===
pub use discovery::{list_csv_files, table_name};

/// Loads every CSV file in `dir`, keyed by file stem.
///
/// Fails on the first unreadable or malformed file.
pub fn load_tables(dir: &Path) -> Result<BTreeMap<String, Table>> {
    let files = list_csv_files(dir)?;
    let mut tables = BTreeMap::new();
    for path in files {
        let table = read_table(&path)?;
        if tables.contains_key(&table.name) {
            tracing::warn!(
                path = %path.display(),
                table = %table.name,
                "Skipping CSV file whose name collides with an already loaded table"
            );
            continue;
        }
        tables.insert(table.name.clone(), table);
    }
    tracing::info!(dir = %dir.display(), tables = tables.len(), "Loaded source tables");
    Ok(tables)
}
