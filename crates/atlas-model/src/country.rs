#![deny(unsafe_code)]

use std::fmt;

use crate::error::ModelError;

/// Name of the join/identity column in every topical source table.
pub const COUNTRY_COLUMN: &str = "Country";

/// Name of the ISO 3166-1 alpha-3 column in the merged table.
pub const ISO3_COLUMN: &str = "ISO3";

/// An ISO 3166-1 alpha-3 code, stored upper-case.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Iso3(String);

impl Iso3 {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(ModelError::InvalidIso3(value));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iso3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the canonical country registry.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CountryRecord {
    pub name: String,
    pub iso3: Iso3,
}
