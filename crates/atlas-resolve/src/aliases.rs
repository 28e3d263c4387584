//! Manual alias table from historic or alternate spellings to registry names,
//! plus names that must never resolve to a country.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{ResolveError, Result};
use crate::registry::Registry;

/// Built-in aliases, keyed by upper-cased spelling.
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("BAHAMAS, THE", "Bahamas"),
    ("BOLIVIA", "Bolivia, Plurinational State of"),
    ("BRITISH VIRGIN ISLANDS", "Virgin Islands, British"),
    ("BRUNEI", "Brunei Darussalam"),
    ("BURMA", "Myanmar"),
    ("CAPE VERDE", "Cabo Verde"),
    ("CONGO, DEM. REP.", "Congo, The Democratic Republic of the"),
    ("CONGO, DEMOCRATIC REPUBLIC OF THE", "Congo, The Democratic Republic of the"),
    ("CONGO, REP.", "Congo"),
    ("CONGO, REPUBLIC OF THE", "Congo"),
    ("CZECH REPUBLIC", "Czechia"),
    ("DEMOCRATIC REPUBLIC OF THE CONGO", "Congo, The Democratic Republic of the"),
    ("DR CONGO", "Congo, The Democratic Republic of the"),
    ("EAST TIMOR", "Timor-Leste"),
    ("EGYPT, ARAB REP.", "Egypt"),
    ("GAMBIA, THE", "Gambia"),
    ("HONG KONG SAR, CHINA", "Hong Kong"),
    ("IRAN", "Iran, Islamic Republic of"),
    ("IRAN, ISLAMIC REP.", "Iran, Islamic Republic of"),
    ("IVORY COAST", "Côte d'Ivoire"),
    ("KOREA, DEM. PEOPLE'S REP.", "Korea, Democratic People's Republic of"),
    ("KOREA, NORTH", "Korea, Democratic People's Republic of"),
    ("KOREA, REP.", "Korea, Republic of"),
    ("KOREA, SOUTH", "Korea, Republic of"),
    ("KYRGYZ REPUBLIC", "Kyrgyzstan"),
    ("LAO PDR", "Lao People's Democratic Republic"),
    ("LAOS", "Lao People's Democratic Republic"),
    ("MACAO SAR, CHINA", "Macao"),
    ("MACAU", "Macao"),
    ("MACEDONIA", "North Macedonia"),
    ("MICRONESIA, FED. STS.", "Micronesia, Federated States of"),
    ("MOLDOVA", "Moldova, Republic of"),
    ("RUSSIA", "Russian Federation"),
    ("SLOVAK REPUBLIC", "Slovakia"),
    ("ST. KITTS AND NEVIS", "Saint Kitts and Nevis"),
    ("ST. LUCIA", "Saint Lucia"),
    ("ST. VINCENT AND THE GRENADINES", "Saint Vincent and the Grenadines"),
    ("SWAZILAND", "Eswatini"),
    ("SYRIA", "Syrian Arab Republic"),
    ("TAIWAN", "Taiwan, Province of China"),
    ("TANZANIA", "Tanzania, United Republic of"),
    ("TURKEY", "Türkiye"),
    ("TURKEY (TURKIYE)", "Türkiye"),
    ("TURKIYE", "Türkiye"),
    ("UNITED STATES", "United States"),
    ("VENEZUELA", "Venezuela, Bolivarian Republic of"),
    ("VENEZUELA, RB", "Venezuela, Bolivarian Republic of"),
    ("VIETNAM", "Viet Nam"),
    ("VIRGIN ISLANDS", "Virgin Islands, U.S."),
    ("WEST BANK AND GAZA", "Palestine, State of"),
    ("YEMEN, REP.", "Yemen"),
];

/// Factbook entries that are not ISO 3166-1 countries. Several of them
/// contain a registry name ("Indian Ocean", "United States Pacific Island
/// Wildlife Refuges") and would otherwise fuzzy-match it.
const NON_COUNTRIES: &[&str] = &[
    "AKROTIRI",
    "ARCTIC OCEAN",
    "ASHMORE AND CARTIER ISLANDS",
    "ATLANTIC OCEAN",
    "BAKER ISLAND",
    "CLIPPERTON ISLAND",
    "CORAL SEA ISLANDS",
    "DHEKELIA",
    "EUROPEAN UNION",
    "HOWLAND ISLAND",
    "INDIAN OCEAN",
    "JAN MAYEN",
    "JARVIS ISLAND",
    "JOHNSTON ATOLL",
    "KINGMAN REEF",
    "MIDWAY ISLANDS",
    "NAVASSA ISLAND",
    "PACIFIC OCEAN",
    "PALMYRA ATOLL",
    "PARACEL ISLANDS",
    "SOUTHERN OCEAN",
    "SPRATLY ISLANDS",
    "UNITED STATES PACIFIC ISLAND WILDLIFE REFUGES",
    "WAKE ISLAND",
    "WORLD",
];

fn alias_key(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Alias lookup keyed by upper-cased, trimmed spelling.
///
/// Every target is a registry name; construction fails otherwise. Excluded
/// names map to nothing and are never matched.
#[derive(Debug, Clone, Default)]
pub struct AliasMap {
    entries: BTreeMap<String, String>,
    excluded: BTreeSet<String>,
}

impl AliasMap {
    /// Built-in aliases, validated against `registry`.
    pub fn builtin(registry: &Registry) -> Result<Self> {
        let mut map = Self::default();
        for (alias, canonical) in BUILTIN_ALIASES {
            map.insert(registry, alias, canonical)?;
        }
        for name in NON_COUNTRIES {
            map.exclude(name);
        }
        Ok(map)
    }

    /// Adds or replaces an alias. The canonical side is stored with the
    /// registry's spelling.
    pub fn insert(&mut self, registry: &Registry, alias: &str, canonical: &str) -> Result<()> {
        let record = registry
            .by_name(canonical)
            .ok_or_else(|| ResolveError::UnknownCanonical {
                alias: alias.to_string(),
                canonical: canonical.to_string(),
            })?;
        let key = alias_key(alias);
        self.excluded.remove(&key);
        self.entries.insert(key, record.name.clone());
        Ok(())
    }

    /// Marks a spelling as never resolving to a country. Replaces any alias
    /// with the same spelling.
    pub fn exclude(&mut self, name: &str) {
        let key = alias_key(name);
        self.entries.remove(&key);
        self.excluded.insert(key);
    }

    pub fn is_excluded(&self, raw: &str) -> bool {
        self.excluded.contains(&alias_key(raw))
    }

    /// Adds configured aliases on top of the current table.
    pub fn extend<'a, I>(&mut self, registry: &Registry, extra: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (alias, canonical) in extra {
            self.insert(registry, alias, canonical)?;
        }
        Ok(())
    }

    pub fn get(&self, raw: &str) -> Option<&str> {
        self.entries.get(&alias_key(raw)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_aliases_all_target_registry_names() {
        let registry = Registry::embedded().unwrap();
        let aliases = AliasMap::builtin(&registry).unwrap();
        assert_eq!(aliases.len(), BUILTIN_ALIASES.len());
    }

    #[test]
    fn lookup_ignores_case_and_padding() {
        let registry = Registry::embedded().unwrap();
        let aliases = AliasMap::builtin(&registry).unwrap();
        assert_eq!(aliases.get("  burma "), Some("Myanmar"));
        assert_eq!(aliases.get("Korea, South"), Some("Korea, Republic of"));
        assert_eq!(aliases.get("Atlantis"), None);
    }

    #[test]
    fn exclusions_and_aliases_replace_each_other() {
        let registry = Registry::embedded().unwrap();
        let mut aliases = AliasMap::builtin(&registry).unwrap();
        assert!(aliases.is_excluded(" indian ocean"));
        assert_eq!(aliases.get("Indian Ocean"), None);

        aliases.insert(&registry, "World", "Chad").unwrap();
        assert!(!aliases.is_excluded("World"));
        assert_eq!(aliases.get("World"), Some("Chad"));

        aliases.exclude("burma");
        assert!(aliases.is_excluded("Burma"));
        assert_eq!(aliases.get("Burma"), None);
    }

    #[test]
    fn unknown_canonical_is_rejected() {
        let registry = Registry::embedded().unwrap();
        let mut aliases = AliasMap::default();
        let err = aliases.insert(&registry, "Kosovo", "Kosovo").unwrap_err();
        assert!(matches!(err, ResolveError::UnknownCanonical { .. }));
        assert!(aliases.is_empty());
    }
}
