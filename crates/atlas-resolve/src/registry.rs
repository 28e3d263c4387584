//! The canonical country registry (ISO 3166-1 names and alpha-3 codes).

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use atlas_model::{CountryRecord, Iso3};
use csv::ReaderBuilder;

use crate::error::{ResolveError, Result};
use crate::score::normalize_name;

/// Registry compiled into the binary.
const EMBEDDED_REGISTRY: &str = include_str!("../data/iso3166.csv");

/// Version label of the embedded registry.
pub const EMBEDDED_REGISTRY_VERSION: &str = "iso3166-1/2024";

/// Read-only list of canonical countries, in file order.
///
/// Names and codes are unique; every name maps to exactly one ISO3.
#[derive(Debug, Clone)]
pub struct Registry {
    version: String,
    records: Vec<CountryRecord>,
    by_name: HashMap<String, usize>,
    by_code: HashMap<String, usize>,
    /// Names prepared for fuzzy scoring, parallel to `records`.
    normalized: Vec<String>,
}

impl Registry {
    /// Loads the embedded ISO 3166-1 registry.
    pub fn embedded() -> Result<Self> {
        Self::from_reader(EMBEDDED_REGISTRY_VERSION, EMBEDDED_REGISTRY.as_bytes())
    }

    /// Loads a registry CSV with `name` and `alpha_3` columns.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| ResolveError::io(path, e))?;
        let registry = Self::from_reader(&path.display().to_string(), file)?;
        tracing::debug!(
            path = %path.display(),
            countries = registry.len(),
            "loaded registry override"
        );
        Ok(registry)
    }

    pub fn from_reader<R: Read>(source_name: &str, reader: R) -> Result<Self> {
        let csv_err = |e: csv::Error| ResolveError::Csv {
            source_name: source_name.to_string(),
            message: e.to_string(),
        };
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers = reader.headers().map_err(csv_err)?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_matches('\u{feff}').trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| ResolveError::MissingColumn {
                    source_name: source_name.to_string(),
                    column: name.to_string(),
                })
        };
        let name_idx = column("name")?;
        let code_idx = column("alpha_3")?;

        let mut records = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            let name = record.get(name_idx).unwrap_or("").trim();
            let code = record.get(code_idx).unwrap_or("").trim();
            if name.is_empty() && code.is_empty() {
                continue;
            }
            let iso3 = Iso3::new(code).map_err(|_| ResolveError::InvalidCode {
                source_name: source_name.to_string(),
                line: record.position().map_or(0, csv::Position::line),
                code: code.to_string(),
            })?;
            records.push(CountryRecord {
                name: name.to_string(),
                iso3,
            });
        }
        Self::new(source_name, records)
    }

    /// Builds a registry, rejecting duplicate names or codes.
    pub fn new(version: &str, records: Vec<CountryRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(ResolveError::EmptyRegistry {
                source_name: version.to_string(),
            });
        }
        let mut by_name = HashMap::with_capacity(records.len());
        let mut by_code = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            let duplicate = |value: &str| ResolveError::DuplicateEntry {
                source_name: version.to_string(),
                value: value.to_string(),
            };
            if by_name.insert(record.name.to_lowercase(), idx).is_some() {
                return Err(duplicate(&record.name));
            }
            if by_code.insert(record.iso3.as_str().to_string(), idx).is_some() {
                return Err(duplicate(record.iso3.as_str()));
            }
        }
        let normalized = records.iter().map(|r| normalize_name(&r.name)).collect();
        Ok(Self {
            version: version.to_string(),
            records,
            by_name,
            by_code,
            normalized,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[CountryRecord] {
        &self.records
    }

    /// Case-insensitive lookup of a canonical name.
    pub fn by_name(&self, name: &str) -> Option<&CountryRecord> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .map(|&idx| &self.records[idx])
    }

    /// Looks up an alpha-3 code, case-insensitively.
    pub fn by_code(&self, code: &str) -> Option<&CountryRecord> {
        self.by_code
            .get(&code.trim().to_ascii_uppercase())
            .map(|&idx| &self.records[idx])
    }

    pub(crate) fn scored_names(&self) -> impl Iterator<Item = (&CountryRecord, &str)> {
        self.records
            .iter()
            .zip(self.normalized.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_registry_loads() {
        let registry = Registry::embedded().unwrap();
        assert_eq!(registry.len(), 249);
        assert_eq!(registry.version(), EMBEDDED_REGISTRY_VERSION);
        assert_eq!(registry.by_code("pse").unwrap().name, "Palestine, State of");
        assert_eq!(registry.by_name("czechia").unwrap().iso3.as_str(), "CZE");
        assert_eq!(registry.by_name("Côte d'Ivoire").unwrap().iso3.as_str(), "CIV");
    }

    #[test]
    fn rejects_duplicate_codes() {
        let csv = "name,alpha_3\nChad,TCD\nTchad,TCD\n";
        let err = Registry::from_reader("test", csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ResolveError::DuplicateEntry { ref value, .. } if value == "TCD"));
    }

    #[test]
    fn rejects_bad_codes_and_missing_columns() {
        let bad = Registry::from_reader("test", "name,alpha_3\nChad,TC\n".as_bytes()).unwrap_err();
        assert!(matches!(bad, ResolveError::InvalidCode { line: 2, .. }));
        let missing = Registry::from_reader("test", "name,code\nChad,TCD\n".as_bytes()).unwrap_err();
        assert!(missing.to_string().contains("alpha_3"));
    }

    #[test]
    fn empty_registry_is_an_error() {
        let err = Registry::from_reader("test", "name,alpha_3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ResolveError::EmptyRegistry { .. }));
    }
}
