use atlas_model::{COUNTRY_COLUMN, ISO3_COLUMN, Table};

/// ISO3 codes of rows with no indicator values at all ("no data").
pub fn empty_countries(table: &Table) -> Vec<String> {
    let Some(codes) = table.column(ISO3_COLUMN) else {
        return Vec::new();
    };
    let indicators: Vec<_> = table
        .columns()
        .iter()
        .filter(|c| c.name != COUNTRY_COLUMN && c.name != ISO3_COLUMN)
        .collect();
    (0..table.height())
        .filter(|&row| indicators.iter().all(|c| c.get(row).is_missing()))
        .filter_map(|row| codes.get(row).as_text().map(str::to_string))
        .collect()
}
