use atlas_derive::{DeriveError, DerivedMetric, Formula, builtin_metrics, derive};
use atlas_model::{Cell, Column, Table};
use proptest::prelude::*;

fn merged() -> Table {
    Table::with_columns(
        "merged",
        vec![
            Column::text("Country", vec![Some("Chad".into()), Some("Tuvalu".into())]),
            Column::text("ISO3", vec![Some("TCD".into()), Some("TUV".into())]),
            Column::numeric("Total_Population", vec![Some(1000.0), None]),
            Column::numeric("Total_Area_km", vec![Some(10.0), Some(26.0)]),
            Column::numeric("Roadways_km", vec![Some(100.0), Some(8.0)]),
            Column::numeric("Electricity_Access [%]", vec![Some(11.1), None]),
        ],
    )
    .unwrap()
}

#[test]
fn builtin_names_are_the_dashboard_columns() {
    let names: Vec<String> = builtin_metrics().into_iter().map(|m| m.name).collect();
    for expected in ["population_density", "road_density", "internet_penetration_rate"] {
        assert!(names.iter().any(|n| n == expected), "{expected}");
    }
    assert!(!names.iter().any(|n| n.ends_with("_log")));
}

#[test]
fn builtins_append_and_supersede() {
    let out = derive(&merged(), &builtin_metrics()).unwrap();
    assert_eq!(out.cell(0, "population_density"), Some(&Cell::Number(100.0)));
    assert_eq!(out.cell(1, "population_density"), Some(&Cell::Missing));
    assert_eq!(out.cell(0, "road_density"), Some(&Cell::Number(1.0)));
    assert_eq!(out.cell(0, "electricity_access_percent"), Some(&Cell::Number(11.1)));
    assert!(!out.has_column("Electricity_Access [%]"));
    // Inputs absent from the table skip the metric.
    assert!(!out.has_column("internet_penetration_rate"));
    assert!(out.has_column("Total_Population"));
}

#[test]
fn deriving_twice_fails_loudly() {
    let once = derive(&merged(), &builtin_metrics()).unwrap();
    let err = derive(&once, &builtin_metrics()).unwrap_err();
    assert!(matches!(err, DeriveError::ColumnCollision { ref column } if column == "population_density"));
}

#[test]
fn repeated_output_names_collide() {
    let metrics = vec![
        DerivedMetric::new("x", &["Total_Population", "Total_Area_km"], Formula::Ratio),
        DerivedMetric::new("x", &["Roadways_km"], Formula::Log10),
    ];
    assert!(matches!(
        derive(&merged(), &metrics),
        Err(DeriveError::ColumnCollision { .. })
    ));
}

#[test]
fn text_inputs_are_rejected() {
    let metrics = vec![DerivedMetric::new("bad", &["Country"], Formula::Log10)];
    let err = derive(&merged(), &metrics).unwrap_err();
    assert!(err.to_string().contains("Country"));
}

#[test]
fn wrong_input_count_is_rejected() {
    let metrics = vec![DerivedMetric::new("bad", &["Total_Population"], Formula::Ratio)];
    assert!(matches!(
        derive(&merged(), &metrics),
        Err(DeriveError::Arity { expected: 2, actual: 1, .. })
    ));
}

#[test]
fn identity_columns_cannot_be_superseded() {
    let metrics = vec![
        DerivedMetric::new("pop", &["Total_Population"], Formula::Copy).superseding(&["Country"]),
    ];
    let out = derive(&merged(), &metrics).unwrap();
    assert!(out.has_column("Country"));
}

proptest! {
    #[test]
    fn derive_never_silently_diverges(
        pops in proptest::collection::vec(proptest::option::of(0.0f64..1e9), 2),
        areas in proptest::collection::vec(proptest::option::of(0.0f64..1e7), 2),
    ) {
        let table = Table::with_columns(
            "merged",
            vec![
                Column::text("Country", vec![Some("A".into()), Some("B".into())]),
                Column::numeric("Total_Population", pops),
                Column::numeric("Total_Area_km", areas),
            ],
        )
        .unwrap();
        let once = derive(&table, &builtin_metrics()).unwrap();
        prop_assert!(derive(&once, &builtin_metrics()).is_err());
    }
}
