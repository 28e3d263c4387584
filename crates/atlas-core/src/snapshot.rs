//! Immutable result of one pipeline run.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use atlas_model::{CaseInsensitiveSet, Cell, ISO3_COLUMN, Table};
use atlas_resolve::ResolutionReport;
use polars::prelude::{DataFrame, PolarsResult};

use crate::frame::to_dataframe;

#[derive(Debug)]
struct SnapshotInner {
    table: Table,
    report: ResolutionReport,
    registry_version: String,
    rows_by_iso3: HashMap<String, usize>,
    column_names: CaseInsensitiveSet,
}

/// Read-only country table shared between consumers.
///
/// Cloning is cheap; all clones point at the same data. A new run produces
/// a new snapshot rather than mutating this one.
#[derive(Debug, Clone)]
pub struct CountrySnapshot {
    inner: Arc<SnapshotInner>,
}

impl CountrySnapshot {
    pub fn new(table: Table, report: ResolutionReport, registry_version: impl Into<String>) -> Self {
        let mut rows_by_iso3 = HashMap::new();
        if let Some(codes) = table.column(ISO3_COLUMN) {
            for (row, cell) in codes.cells.iter().enumerate() {
                if let Some(code) = cell.as_text() {
                    rows_by_iso3.entry(code.to_ascii_uppercase()).or_insert(row);
                }
            }
        }
        let column_names = CaseInsensitiveSet::new(table.column_names());
        Self {
            inner: Arc::new(SnapshotInner {
                table,
                report,
                registry_version: registry_version.into(),
                rows_by_iso3,
                column_names,
            }),
        }
    }

    pub fn table(&self) -> &Table {
        &self.inner.table
    }

    pub fn report(&self) -> &ResolutionReport {
        &self.inner.report
    }

    /// Version tag of the country registry the names were resolved against.
    pub fn registry_version(&self) -> &str {
        &self.inner.registry_version
    }

    pub fn height(&self) -> usize {
        self.inner.table.height()
    }

    pub fn columns(&self) -> Vec<&str> {
        self.inner.table.column_names()
    }

    /// Exact column name for a case-insensitive spelling.
    pub fn find_column(&self, name: &str) -> Option<&str> {
        self.inner.column_names.get(name)
    }

    pub fn row_by_iso3(&self, iso3: &str) -> Option<usize> {
        self.inner
            .rows_by_iso3
            .get(&iso3.trim().to_ascii_uppercase())
            .copied()
    }

    /// Cell for a country and column; `None` when either is unknown.
    pub fn value(&self, iso3: &str, column: &str) -> Option<&Cell> {
        let row = self.row_by_iso3(iso3)?;
        self.inner.table.cell(row, column)
    }

    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        to_dataframe(&self.inner.table)
    }

    /// Writes the table as CSV with a header row; missing cells are empty.
    pub fn write_csv(&self, path: &Path) -> csv::Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        self.write_records(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_records<W: std::io::Write>(&self, writer: &mut csv::Writer<W>) -> csv::Result<()> {
        let table = &self.inner.table;
        writer.write_record(table.column_names())?;
        for row in 0..table.height() {
            writer.write_record(table.row(row).into_iter().map(Cell::render))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_model::Column;

    fn snapshot() -> CountrySnapshot {
        let table = Table::with_columns(
            "merged",
            vec![
                Column::text("Country", vec![Some("Chad".into()), Some("Kosovo".into())]),
                Column::text("ISO3", vec![Some("TCD".into()), None]),
                Column::numeric("Total_Population", vec![Some(18_000_000.0), Some(1_800_000.0)]),
            ],
        )
        .unwrap();
        CountrySnapshot::new(table, ResolutionReport::default(), "test")
    }

    #[test]
    fn looks_up_by_iso3() {
        let snapshot = snapshot();
        assert_eq!(snapshot.row_by_iso3("tcd"), Some(0));
        assert_eq!(
            snapshot.value("TCD", "Total_Population"),
            Some(&Cell::Number(18_000_000.0))
        );
        assert_eq!(snapshot.value("XKX", "Total_Population"), None);
        assert_eq!(snapshot.value("TCD", "Nope"), None);
    }

    #[test]
    fn clones_share_data() {
        let a = snapshot();
        let b = a.clone();
        assert!(std::ptr::eq(a.table(), b.table()));
    }

    #[test]
    fn finds_columns_ignoring_case() {
        let snapshot = snapshot();
        assert_eq!(snapshot.find_column("total_population"), Some("Total_Population"));
        assert_eq!(snapshot.find_column("gdp"), None);
    }

    #[test]
    fn writes_csv_with_empty_missing() {
        let mut writer = csv::Writer::from_writer(Vec::new());
        snapshot().write_records(&mut writer).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(
            text,
            "Country,ISO3,Total_Population\nChad,TCD,18000000\nKosovo,,1800000\n"
        );
    }
}
