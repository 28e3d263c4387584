//! Per-table normalization profiles and the column rewrite driven by them.

use std::collections::BTreeMap;

use atlas_model::{Cell, Column, NormalizedTable, Table, is_missing_token};
use serde::{Deserialize, Serialize};

use crate::coordinates::parse_coordinates;
use crate::distance::parse_km_value;
use crate::error::{NormalizeError, Result};
use crate::fiscal::parse_fiscal_year;
use crate::numeric::parse_numeric_lenient;
use crate::percent::parse_percent_value;

/// How a raw column is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// "34 00 N, 65 00 E" -> `<col>_Latitude`, `<col>_Longitude`
    Coordinates,
    /// "652,230 sq km" -> `<col>_km`
    Distance,
    /// "12.3%" -> `<col> [%]`
    Percent,
    /// "1 July - 30 June" -> `<col>_Start`, `<col>_End`
    FiscalYear,
    /// "1,234" -> `<col>`
    Numeric,
}

impl FieldKind {
    /// Output column names produced for a source column.
    pub fn output_names(self, column: &str) -> Vec<String> {
        match self {
            Self::Coordinates => vec![format!("{column}_Latitude"), format!("{column}_Longitude")],
            Self::Distance => vec![format!("{column}_km")],
            Self::Percent => vec![format!("{column} [%]")],
            Self::FiscalYear => vec![format!("{column}_Start"), format!("{column}_End")],
            Self::Numeric => vec![column.to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRule {
    pub column: String,
    pub kind: FieldKind,
}

impl ColumnRule {
    pub fn new(column: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            column: column.into(),
            kind,
        }
    }
}

/// Ordered column rules for one table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableProfile {
    pub rules: Vec<ColumnRule>,
}

impl TableProfile {
    pub fn new(rules: Vec<ColumnRule>) -> Self {
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn rule_for(&self, column: &str) -> Option<&ColumnRule> {
        let column = column.trim();
        self.rules
            .iter()
            .find(|rule| rule.column.trim().eq_ignore_ascii_case(column))
    }
}

impl FromIterator<(String, FieldKind)> for TableProfile {
    fn from_iter<I: IntoIterator<Item = (String, FieldKind)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(column, kind)| ColumnRule { column, kind })
                .collect(),
        )
    }
}

fn rules(entries: &[(&str, FieldKind)]) -> TableProfile {
    TableProfile::new(
        entries
            .iter()
            .map(|(column, kind)| ColumnRule::new(*column, *kind))
            .collect(),
    )
}

/// Profiles keyed by topical table name.
///
/// Lookups accept both `geography` and the `geography_data` file stem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileSet {
    profiles: BTreeMap<String, TableProfile>,
}

impl ProfileSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Profiles for the standard topical tables.
    pub fn builtin() -> Self {
        use FieldKind::{Coordinates, Distance, FiscalYear, Numeric, Percent};

        let mut set = Self::empty();
        set.insert(
            "geography",
            rules(&[
                ("Geographic_Coordinates", Coordinates),
                ("Total_Area", Distance),
                ("Land_Area", Distance),
                ("Water_Area", Distance),
                ("Coastline", Distance),
                ("Land_Boundaries", Distance),
                ("Irrigated_Land", Distance),
                ("Arable_Land", Percent),
                ("Forest_Land", Percent),
            ]),
        );
        set.insert(
            "demographics",
            rules(&[
                ("Total_Population", Numeric),
                ("Median_Age", Numeric),
                ("Total_Literacy_Rate", Percent),
                ("Male_Literacy_Rate", Percent),
                ("Female_Literacy_Rate", Percent),
                ("Youth_Unemployment_Rate", Percent),
            ]),
        );
        set.insert(
            "economy",
            rules(&[
                ("Real_GDP_PPP_billion_USD", Numeric),
                ("Real_GDP_per_Capita_USD", Numeric),
                ("Exports_billion_USD", Numeric),
                ("Imports_billion_USD", Numeric),
                ("Budget_billion_USD", Numeric),
                ("Exchange_Rate_per_USD", Numeric),
            ]),
        );
        set.insert(
            "government_and_civics",
            rules(&[("Fiscal_Year", FiscalYear)]),
        );
        set.insert(
            "transportation",
            rules(&[
                ("Roadways", Distance),
                ("Railways", Distance),
                ("Waterways", Distance),
                ("Pipelines", Distance),
            ]),
        );
        set.insert(
            "communications",
            rules(&[
                ("Internet_Users_Total", Numeric),
                ("Broadband_Fixed_Subscriptions_Total", Numeric),
                ("Mobile_Subscriptions_Total", Numeric),
            ]),
        );
        set.insert(
            "energy",
            rules(&[
                ("Electricity_Access", Percent),
                ("Electricity_Generating_Capacity", Numeric),
            ]),
        );
        set
    }

    /// Adds or replaces the profile for a table.
    pub fn insert(&mut self, table: impl Into<String>, profile: TableProfile) {
        self.profiles.insert(table.into(), profile);
    }

    pub fn get(&self, table: &str) -> Option<&TableProfile> {
        self.profiles.get(table).or_else(|| {
            table
                .strip_suffix("_data")
                .and_then(|base| self.profiles.get(base))
        })
    }
}

/// Raw text of a cell for re-parsing, or `None` when missing.
fn raw_value(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Missing => None,
        other => Some(other.render()),
    }
}

fn scalar_column(
    source: &Column,
    name: String,
    parse: fn(&str) -> Option<f64>,
    misses: &mut BTreeMap<String, usize>,
) -> Column {
    let mut missed = 0;
    let values = source
        .cells
        .iter()
        .map(|cell| match cell {
            Cell::Number(v) => Some(*v),
            Cell::Missing => None,
            Cell::Text(raw) => {
                let parsed = parse(raw);
                if parsed.is_none() && !is_missing_token(raw) {
                    missed += 1;
                }
                parsed
            }
        })
        .collect();
    misses.insert(name.clone(), missed);
    Column::numeric(name, values)
}

fn coordinate_columns(
    source: &Column,
    names: [String; 2],
    misses: &mut BTreeMap<String, usize>,
) -> Vec<Column> {
    let mut lat = Vec::with_capacity(source.len());
    let mut lon = Vec::with_capacity(source.len());
    let (mut lat_missed, mut lon_missed) = (0, 0);
    for cell in &source.cells {
        let (a, b) = match raw_value(cell) {
            Some(raw) if !is_missing_token(&raw) => {
                let (a, b) = parse_coordinates(&raw);
                lat_missed += usize::from(a.is_none());
                lon_missed += usize::from(b.is_none());
                (a, b)
            }
            _ => (None, None),
        };
        lat.push(a);
        lon.push(b);
    }
    let [lat_name, lon_name] = names;
    misses.insert(lat_name.clone(), lat_missed);
    misses.insert(lon_name.clone(), lon_missed);
    vec![Column::numeric(lat_name, lat), Column::numeric(lon_name, lon)]
}

fn fiscal_columns(
    source: &Column,
    names: [String; 2],
    misses: &mut BTreeMap<String, usize>,
) -> Vec<Column> {
    let mut starts = Vec::with_capacity(source.len());
    let mut ends = Vec::with_capacity(source.len());
    let mut missed = 0;
    for cell in &source.cells {
        match raw_value(cell) {
            Some(raw) if !is_missing_token(&raw) => {
                let parsed = parse_fiscal_year(&raw);
                missed += usize::from(parsed.start.is_none());
                starts.push(parsed.start);
                ends.push(parsed.end);
            }
            _ => {
                starts.push(None);
                ends.push(None);
            }
        }
    }
    let [start_name, end_name] = names;
    misses.insert(start_name.clone(), missed);
    misses.insert(end_name.clone(), missed);
    vec![Column::text(start_name, starts), Column::text(end_name, ends)]
}

fn apply_rule(
    source: &Column,
    kind: FieldKind,
    misses: &mut BTreeMap<String, usize>,
) -> Vec<Column> {
    let mut names = kind.output_names(&source.name).into_iter();
    let mut next = || names.next().unwrap_or_default();
    match kind {
        FieldKind::Coordinates => coordinate_columns(source, [next(), next()], misses),
        FieldKind::FiscalYear => fiscal_columns(source, [next(), next()], misses),
        FieldKind::Distance => vec![scalar_column(source, next(), parse_km_value, misses)],
        FieldKind::Percent => vec![scalar_column(source, next(), parse_percent_value, misses)],
        FieldKind::Numeric => vec![scalar_column(source, next(), parse_numeric_lenient, misses)],
    }
}

/// Rewrites the profiled columns of a table into typed, unit-named columns.
///
/// Rule columns match case-insensitively. Each source column is replaced in
/// place by its output column(s); unprofiled columns pass through untouched.
/// Rules naming an absent column are skipped. Values that cannot be parsed
/// become missing and are counted per output column.
pub fn normalize(table: Table, profile: &TableProfile) -> Result<NormalizedTable> {
    if profile.is_empty() {
        return Ok(NormalizedTable::passthrough(table));
    }

    for rule in &profile.rules {
        let present = table
            .column_names()
            .iter()
            .any(|name| name.trim().eq_ignore_ascii_case(rule.column.trim()));
        if !present {
            tracing::debug!(
                table = %table.name,
                column = %rule.column,
                "profiled column absent, rule skipped"
            );
        }
    }

    let name = table.name.clone();
    let mut misses = BTreeMap::new();
    let mut produced: Vec<Column> = Vec::with_capacity(table.width());
    let mut converted = 0usize;
    let source_names: Vec<String> = table
        .column_names()
        .into_iter()
        .map(ToString::to_string)
        .collect();

    for column in table.into_columns() {
        let Some(rule) = profile.rule_for(&column.name) else {
            produced.push(column);
            continue;
        };
        let outputs = apply_rule(&column, rule.kind, &mut misses);
        for output in &outputs {
            if output.name != column.name && source_names.iter().any(|n| *n == output.name) {
                return Err(NormalizeError::OutputCollision {
                    table: name,
                    column: output.name.clone(),
                });
            }
        }
        converted += 1;
        produced.extend(outputs);
    }

    misses.retain(|_, count| *count > 0);
    let table = Table::with_columns(name, produced)?;
    tracing::debug!(
        table = %table.name,
        converted,
        parse_misses = misses.values().sum::<usize>(),
        "normalized table"
    );
    Ok(NormalizedTable::new(table, misses))
}
