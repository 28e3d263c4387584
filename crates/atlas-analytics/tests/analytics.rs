use atlas_analytics::{
    AnalyticsError, Distribution, PerformanceOptions, RangeFilter, apply_filters, empty_countries,
    performance, profile,
};
use atlas_model::{Column, Table};
use proptest::prelude::*;

fn countries() -> Table {
    Table::with_columns(
        "merged",
        vec![
            Column::text(
                "Country",
                ["Chad", "Fiji", "Peru", "Tuvalu"].iter().map(|s| Some(s.to_string())).collect(),
            ),
            Column::text(
                "ISO3",
                ["TCD", "FJI", "PER", "TUV"].iter().map(|s| Some(s.to_string())).collect(),
            ),
            Column::numeric("gdp", vec![Some(1.0), Some(2.0), Some(3.0), None]),
            Column::numeric("life", vec![Some(50.0), Some(70.0), Some(60.0), None]),
            Column::numeric("Infant_Mortality_Rate", vec![Some(80.0), Some(20.0), Some(40.0), None]),
        ],
    )
    .unwrap()
}

#[test]
fn ranks_over_and_under_performers() {
    let options = PerformanceOptions {
        log_x: false,
        top_n: 1,
        lower_is_better: None,
    };
    let result = performance(&countries(), "gdp", "life", &options).unwrap();
    // Fit through (1,50) (2,70) (3,60): slope 5, intercept 50.
    assert!((result.slope - 5.0).abs() < 1e-9);
    assert!((result.intercept - 50.0).abs() < 1e-9);
    assert_eq!(result.points.len(), 3);
    assert_eq!(result.over[0].country, "Fiji");
    assert_eq!(result.under[0].iso3.as_deref(), Some("TCD"));
}

#[test]
fn lower_is_better_flips_residuals() {
    let options = PerformanceOptions {
        log_x: false,
        top_n: 1,
        lower_is_better: None,
    };
    let result = performance(&countries(), "gdp", "Infant_Mortality_Rate", &options).unwrap();
    // Fiji's mortality is far below the line, which is good.
    assert_eq!(result.over[0].country, "Fiji");
    assert!(result.over[0].residual > 0.0);
}

#[test]
fn performance_errors() {
    let table = countries();
    let options = PerformanceOptions::default();
    assert_eq!(
        performance(&table, "nope", "life", &options).unwrap_err(),
        AnalyticsError::UnknownColumn("nope".into())
    );
    assert_eq!(
        performance(&table, "Country", "life", &options).unwrap_err(),
        AnalyticsError::NonNumeric("Country".into())
    );

    let sparse = table.take_rows(&[0, 3]);
    assert!(matches!(
        performance(&sparse, "gdp", "life", &options),
        Err(AnalyticsError::TooFewPoints { count: 1, .. })
    ));
}

#[test]
fn range_filters_are_inclusive_and_skip_missing() {
    let table = countries();
    let filters = [RangeFilter::new("gdp", Some(2.0), None)];
    assert_eq!(apply_filters(&table, &filters).unwrap(), vec!["FJI", "PER"]);

    let both = [
        RangeFilter::new("gdp", None, Some(3.0)),
        RangeFilter::new("life", Some(55.0), Some(60.0)),
    ];
    assert_eq!(apply_filters(&table, &both).unwrap(), vec!["PER"]);
    assert_eq!(apply_filters(&table, &[]).unwrap().len(), 4);
}

#[test]
fn empty_rows_are_reported() {
    assert_eq!(empty_countries(&countries()), vec!["TUV"]);
}

#[test]
fn profile_covers_every_column() {
    let profiles = profile(&countries());
    assert_eq!(profiles.len(), 5);
    assert!(matches!(profiles[0].distribution, Distribution::Categorical { .. }));
    let Distribution::Numeric(gdp) = &profiles[2].distribution else {
        panic!("gdp should be numeric");
    };
    assert_eq!(gdp.count, 3);
    assert_eq!(gdp.missing, 1);
}

proptest! {
    #[test]
    fn ols_recovers_collinear_data(
        intercept in -100.0f64..100.0,
        slope in -10.0f64..10.0,
        xs in proptest::collection::btree_set(0i32..1000, 2..20),
    ) {
        let xs: Vec<f64> = xs.into_iter().map(f64::from).collect();
        let ys: Vec<f64> = xs.iter().map(|x| intercept + slope * x).collect();
        let (a, b) = atlas_analytics::fit_line(&xs, &ys).unwrap();
        prop_assert!((a - intercept).abs() < 1e-6);
        prop_assert!((b - slope).abs() < 1e-8);
    }
}
