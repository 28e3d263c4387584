//! Conversion of tables into polars frames for downstream consumers.

use atlas_model::{ColumnKind, Table};
use polars::prelude::{Column, DataFrame, NamedFrom, PlSmallStr, PolarsResult, Series};

/// Builds a `DataFrame` with one `Float64` or `String` column per table
/// column, preserving order. Missing cells become nulls.
pub fn to_dataframe(table: &Table) -> PolarsResult<DataFrame> {
    let columns: Vec<Column> = table
        .columns()
        .iter()
        .map(|column| {
            let name: PlSmallStr = column.name.as_str().into();
            let series = match column.kind {
                ColumnKind::Numeric => Series::new(name, column.f64_values()),
                ColumnKind::Text => {
                    let values: Vec<Option<String>> = column
                        .cells
                        .iter()
                        .map(|cell| cell.as_text().map(str::to_string))
                        .collect();
                    Series::new(name, values)
                }
            };
            series.into()
        })
        .collect();
    DataFrame::new(columns)
}
