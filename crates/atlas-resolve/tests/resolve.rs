use std::collections::BTreeMap;
use std::io::Write;

use atlas_resolve::{AliasMap, CountryResolver, Registry, ResolutionMethod};
use proptest::prelude::*;

#[test]
fn congo_spellings_share_one_identity() {
    let resolver = CountryResolver::with_defaults().unwrap();
    let a = resolver.resolve("Congo, Dem. Rep.");
    let b = resolver.resolve("DR Congo");
    assert_eq!(a.canonical, "Congo, The Democratic Republic of the");
    assert_eq!(a, b);
    assert_eq!(a.iso3.unwrap().as_str(), "COD");
}

#[test]
fn factbook_spellings_resolve() {
    let resolver = CountryResolver::with_defaults().unwrap();
    let cases = [
        ("Bahamas, The", "Bahamas"),
        ("Korea, South", "Korea, Republic of"),
        ("Korea, North", "Korea, Democratic People's Republic of"),
        ("Congo, Republic of the", "Congo"),
        ("Turkey (Turkiye)", "Türkiye"),
        ("Cote d'Ivoire", "Côte d'Ivoire"),
        ("Bolivia", "Bolivia, Plurinational State of"),
        ("Holy See (Vatican City)", "Holy See (Vatican City State)"),
    ];
    for (raw, expected) in cases {
        let resolution = resolver.resolve(raw);
        assert_eq!(resolution.canonical, expected, "{raw}");
        assert!(resolution.is_match());
    }
}

#[test]
fn configured_aliases_extend_builtins() {
    let registry = Registry::embedded().unwrap();
    let mut aliases = AliasMap::builtin(&registry).unwrap();
    let extra: BTreeMap<String, String> =
        [("Republic of Chad".to_string(), "chad".to_string())].into();
    aliases.extend(&registry, &extra).unwrap();
    let resolver = CountryResolver::new(registry, aliases, 88.0).unwrap();
    let resolution = resolver.resolve("REPUBLIC OF CHAD");
    assert_eq!(resolution.canonical, "Chad");
    assert_eq!(resolution.method, ResolutionMethod::Alias);
}

#[test]
fn configured_alias_wins_over_builtin_exclusion() {
    let registry = Registry::embedded().unwrap();
    let mut aliases = AliasMap::builtin(&registry).unwrap();
    let extra: BTreeMap<String, String> =
        [("Wake Island".to_string(), "United States Minor Outlying Islands".to_string())].into();
    aliases.extend(&registry, &extra).unwrap();
    let resolver = CountryResolver::new(registry, aliases, 88.0).unwrap();

    assert_eq!(resolver.resolve("Wake Island").iso3.unwrap().as_str(), "UMI");
    let ocean = resolver.resolve("Pacific Ocean");
    assert_eq!(ocean.method, ResolutionMethod::Excluded);
    assert!(!ocean.is_match());
}

#[test]
fn registry_override_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "name,alpha_3\nAtlantis,ATL\n\"Palestine, State of\",PSE").unwrap();

    let registry = Registry::from_path(file.path()).unwrap();
    let resolver = CountryResolver::new(registry, AliasMap::default(), 88.0).unwrap();
    assert_eq!(resolver.resolve("atlantis").iso3.unwrap().as_str(), "ATL");
    assert_eq!(resolver.resolve("Peru").method.label(), "miss");
}

#[test]
fn ragged_registry_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "name,alpha_3\nPalestine, State of,PSE").unwrap();
    let err = Registry::from_path(file.path()).unwrap_err();
    assert!(err.to_string().starts_with("failed to parse registry"));
}

#[test]
fn missing_registry_file_names_the_path() {
    let err = Registry::from_path(std::path::Path::new("no/such/registry.csv")).unwrap_err();
    assert!(err.to_string().contains("no/such/registry.csv"));
}

proptest! {
    #[test]
    fn resolution_is_deterministic(raw in "[A-Za-z ,.'()-]{0,30}") {
        let resolver = CountryResolver::with_defaults().unwrap();
        prop_assert_eq!(resolver.resolve(&raw), resolver.resolve(&raw));
    }

    #[test]
    fn matches_always_carry_a_registry_iso3(raw in "[A-Za-z ]{1,20}") {
        let resolver = CountryResolver::with_defaults().unwrap();
        let resolution = resolver.resolve(&raw);
        if let Some(iso3) = &resolution.iso3 {
            let record = resolver.resolve_iso3(iso3.as_str()).unwrap();
            prop_assert_eq!(&record.name, &resolution.canonical);
        }
    }
}
