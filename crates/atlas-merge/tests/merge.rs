use std::collections::{BTreeMap, HashSet};

use atlas_merge::{MergeError, merge, merge_supplementary};
use atlas_model::{Cell, Column, NormalizedTable, Table};
use atlas_resolve::CountryResolver;
use proptest::prelude::*;

fn table(name: &str, countries: &[&str], column: &str, values: &[Option<f64>]) -> NormalizedTable {
    NormalizedTable::passthrough(
        Table::with_columns(
            name,
            vec![
                Column::text("Country", countries.iter().map(|c| Some(c.to_string())).collect()),
                Column::numeric(column, values.to_vec()),
            ],
        )
        .unwrap(),
    )
}

fn tables(items: Vec<NormalizedTable>) -> BTreeMap<String, NormalizedTable> {
    items
        .into_iter()
        .map(|t| (t.name().to_string(), t))
        .collect()
}

fn row_of(table: &Table, country: &str) -> Vec<usize> {
    let column = table.column("Country").unwrap();
    (0..table.height())
        .filter(|&i| column.get(i).as_text() == Some(country))
        .collect()
}

#[test]
fn congo_spellings_average_not_sum() {
    let resolver = CountryResolver::with_defaults().unwrap();
    let input = tables(vec![table(
        "economy",
        &["Congo, Dem. Rep.", "DR Congo"],
        "gdp",
        &[Some(5.0), Some(7.0)],
    )]);
    let merged = merge(&input, "Country", &resolver).unwrap();
    let rows = row_of(&merged.table, "Congo, The Democratic Republic of the");
    assert_eq!(rows.len(), 1);
    assert_eq!(merged.table.cell(rows[0], "gdp"), Some(&Cell::Number(6.0)));
    assert_eq!(merged.table.cell(rows[0], "ISO3"), Some(&Cell::text("COD")));
}

#[test]
fn palestine_appears_once() {
    let resolver = CountryResolver::with_defaults().unwrap();
    let input = tables(vec![
        table("demographics", &["Gaza Strip"], "pop", &[Some(2.0)]),
        table("economy", &["West Bank"], "gdp", &[Some(4.0)]),
    ]);
    let merged = merge(&input, "Country", &resolver).unwrap();
    let rows = row_of(&merged.table, "Palestine, State of");
    assert_eq!(rows.len(), 1);
    assert_eq!(merged.table.cell(rows[0], "pop"), Some(&Cell::Number(2.0)));
    assert_eq!(merged.table.cell(rows[0], "gdp"), Some(&Cell::Number(4.0)));
}

#[test]
fn every_registry_country_exactly_once() {
    let resolver = CountryResolver::with_defaults().unwrap();
    let input = tables(vec![
        table("economy", &["Chad", "Peru", "Burma"], "gdp", &[Some(1.0), Some(2.0), None]),
        table("geography", &["Peru", "Fiji"], "area", &[Some(3.0), Some(4.0)]),
    ]);
    let merged = merge(&input, "Country", &resolver).unwrap();
    let table = &merged.table;
    assert_eq!(table.height(), resolver.registry().len());
    assert_eq!(&table.column_names()[..2], &["Country", "ISO3"]);

    let mut seen = HashSet::new();
    for record in resolver.registry().records() {
        let rows = row_of(table, &record.name);
        assert_eq!(rows.len(), 1, "{}", record.name);
        assert_eq!(table.cell(rows[0], "ISO3"), Some(&Cell::text(record.iso3.as_str())));
        seen.insert(record.iso3.clone());
    }
    assert_eq!(seen.len(), resolver.registry().len());
}

#[test]
fn backfilled_rows_have_iso3_and_null_indicators() {
    let resolver = CountryResolver::with_defaults().unwrap();
    let input = tables(vec![table("economy", &["Chad"], "gdp", &[Some(1.0)])]);
    let merged = merge(&input, "Country", &resolver).unwrap();
    let rows = row_of(&merged.table, "Tuvalu");
    assert_eq!(merged.table.cell(rows[0], "ISO3"), Some(&Cell::text("TUV")));
    assert_eq!(merged.table.cell(rows[0], "gdp"), Some(&Cell::Missing));
}

#[test]
fn unresolved_names_are_kept_without_iso3() {
    let resolver = CountryResolver::with_defaults().unwrap();
    let input = tables(vec![table("economy", &["Kosovo", "Chad"], "gdp", &[Some(9.0), Some(1.0)])]);
    let merged = merge(&input, "Country", &resolver).unwrap();
    let rows = row_of(&merged.table, "Kosovo");
    assert_eq!(rows.len(), 1);
    assert_eq!(merged.table.cell(rows[0], "ISO3"), Some(&Cell::Missing));
    assert_eq!(merged.table.cell(rows[0], "gdp"), Some(&Cell::Number(9.0)));
    assert_eq!(merged.table.height(), resolver.registry().len() + 1);
    assert!(merged.report.misses.contains_key("Kosovo"));
}

#[test]
fn non_country_rows_are_not_folded_into_countries() {
    let resolver = CountryResolver::with_defaults().unwrap();
    let input = tables(vec![table(
        "economy",
        &["United States", "United States Pacific Island Wildlife Refuges", "Indian Ocean"],
        "gdp",
        &[Some(10.0), Some(2.0), Some(3.0)],
    )]);
    let merged = merge(&input, "Country", &resolver).unwrap();
    let table = &merged.table;

    let usa = row_of(table, "United States");
    assert_eq!(usa.len(), 1);
    assert_eq!(table.cell(usa[0], "gdp"), Some(&Cell::Number(10.0)));
    let iot = row_of(table, "British Indian Ocean Territory");
    assert_eq!(table.cell(iot[0], "gdp"), Some(&Cell::Missing));

    for name in ["United States Pacific Island Wildlife Refuges", "Indian Ocean"] {
        let rows = row_of(table, name);
        assert_eq!(rows.len(), 1, "{name}");
        assert_eq!(table.cell(rows[0], "ISO3"), Some(&Cell::Missing));
        assert!(!merged.report.misses.contains_key(name));
    }
    assert_eq!(merged.report.count("excluded"), 2);
}

#[test]
fn rows_are_sorted_by_country() {
    let resolver = CountryResolver::with_defaults().unwrap();
    let input = tables(vec![table("economy", &["Zambia", "Chad"], "gdp", &[None, None])]);
    let merged = merge(&input, "Country", &resolver).unwrap();
    let country = merged.table.column("Country").unwrap();
    assert_eq!(country.get(0).as_text(), Some("Afghanistan"));
    assert_eq!(country.get(1).as_text(), Some("Åland Islands"));
    assert_eq!(country.get(merged.table.height() - 1).as_text(), Some("Zimbabwe"));
}

#[test]
fn missing_key_names_table_and_column() {
    let resolver = CountryResolver::with_defaults().unwrap();
    let bad = NormalizedTable::passthrough(
        Table::with_columns("energy", vec![Column::text("Nation", vec![Some("Chad".into())])])
            .unwrap(),
    );
    let input = tables(vec![table("economy", &["Chad"], "gdp", &[Some(1.0)]), bad]);
    let err = merge(&input, "Country", &resolver).unwrap_err();
    assert!(matches!(
        err,
        MergeError::MissingKey { ref table, ref column } if table == "energy" && column == "Country"
    ));
    assert!(err.to_string().contains("energy"));
}

#[test]
fn empty_input_is_an_error() {
    let resolver = CountryResolver::with_defaults().unwrap();
    let err = merge(&BTreeMap::new(), "Country", &resolver).unwrap_err();
    assert!(matches!(err, MergeError::NoTables));
}

#[test]
fn supplementary_tables_join_on_iso3() {
    let resolver = CountryResolver::with_defaults().unwrap();
    let input = tables(vec![table("economy", &["Chad"], "gdp", &[Some(1.0)])]);
    let merged = merge(&input, "Country", &resolver).unwrap();

    let hdi = NormalizedTable::passthrough(
        Table::with_columns(
            "hdi",
            vec![
                Column::text("ISO3", vec![Some("tcd".into()), Some("TCD".into()), Some("XKX".into()), None]),
                Column::numeric("hdi", vec![Some(0.3), Some(0.5), Some(0.7), Some(0.9)]),
            ],
        )
        .unwrap(),
    );
    let supplementary: BTreeMap<_, _> = [("hdi".to_string(), hdi)].into();
    let out = merge_supplementary(merged.table, &supplementary, resolver.registry()).unwrap();

    assert_eq!(out.height(), resolver.registry().len() + 1);
    let chad = row_of(&out, "Chad");
    assert_eq!(out.cell(chad[0], "hdi"), Some(&Cell::Number(0.4)));
    let kosovo = row_of(&out, "XKX");
    assert_eq!(out.cell(kosovo[0], "ISO3"), Some(&Cell::text("XKX")));
    assert_eq!(out.cell(kosovo[0], "hdi"), Some(&Cell::Number(0.7)));
}

#[test]
fn supplementary_without_iso3_is_a_schema_error() {
    let resolver = CountryResolver::with_defaults().unwrap();
    let merged = merge(
        &tables(vec![table("economy", &["Chad"], "gdp", &[Some(1.0)])]),
        "Country",
        &resolver,
    )
    .unwrap();
    let bad: BTreeMap<_, _> = [("wdi".to_string(), table("wdi", &["Chad"], "x", &[None]))].into();
    let err = merge_supplementary(merged.table, &bad, resolver.registry()).unwrap_err();
    assert!(matches!(err, MergeError::MissingKey { ref table, .. } if table == "wdi"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn merge_is_deterministic_and_complete(
        picks in proptest::collection::vec((0usize..6, proptest::option::of(0.0f64..100.0)), 0..12)
    ) {
        const NAMES: [&str; 6] = ["Chad", "DR Congo", "Congo, Dem. Rep.", "Gaza Strip", "West Bank", "Peru"];
        let resolver = CountryResolver::with_defaults().unwrap();
        let countries: Vec<&str> = picks.iter().map(|(i, _)| NAMES[*i]).collect();
        let values: Vec<Option<f64>> = picks.iter().map(|(_, v)| *v).collect();
        let input = tables(vec![table("economy", &countries, "gdp", &values)]);

        let first = merge(&input, "Country", &resolver).unwrap();
        let second = merge(&input, "Country", &resolver).unwrap();
        prop_assert_eq!(&first.table, &second.table);
        prop_assert_eq!(first.table.height(), resolver.registry().len());
    }
}
