//! CSV file reading into loosely typed tables.

use std::path::Path;

use atlas_model::{Cell, Column, Table, is_missing_token};

use crate::discovery::table_name;
use crate::error::{IngestError, Result};

use super::header::normalize_headers;

/// Builds a column from raw strings.
///
/// A column is numeric when every present value parses as a plain number;
/// otherwise every present value is kept as trimmed text. Placeholder tokens
/// become `Missing` either way.
pub fn infer_column(name: impl Into<String>, raw: &[String]) -> Column {
    let numeric = raw
        .iter()
        .filter(|value| !is_missing_token(value))
        .all(|value| value.trim().parse::<f64>().is_ok());

    let cells = raw
        .iter()
        .map(|value| {
            if is_missing_token(value) {
                Cell::Missing
            } else if numeric {
                Cell::from_f64(value.trim().parse::<f64>().ok())
            } else {
                Cell::text(value.trim())
            }
        })
        .collect();
    Column::new(name, cells)
}

/// Reads a CSV file into a table named after the file stem.
///
/// The first record is the header. Rows whose cells are all blank are
/// skipped; rows with a different number of fields than the header are a
/// parse error.
pub fn read_table(path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_path(path)
        .map_err(|e| IngestError::from_csv(path, e))?;

    let raw_headers = reader
        .headers()
        .map_err(|e| IngestError::from_csv(path, e))?
        .clone();
    if raw_headers.is_empty() || raw_headers.iter().all(|h| h.trim().is_empty()) {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    let headers = normalize_headers(raw_headers.iter());

    let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::from_csv(path, e))?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        for (idx, value) in record.iter().enumerate() {
            raw_columns[idx].push(value.trim_matches('\u{feff}').trim().to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw_columns.iter())
        .map(|(name, raw)| infer_column(name, raw))
        .collect();

    let table = Table::with_columns(table_name(path), columns).map_err(|source| {
        IngestError::Table {
            path: path.to_path_buf(),
            source,
        }
    })?;

    tracing::debug!(
        path = %path.display(),
        rows = table.height(),
        columns = table.width(),
        "Loaded CSV table"
    );
    Ok(table)
}
