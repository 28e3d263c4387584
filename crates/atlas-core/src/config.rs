//! Pipeline configuration, read from TOML.
//!
//! ```toml
//! data_dir = "data"
//! supplementary_dir = "data/external"
//! key_column = "Country"
//! derive = true
//!
//! [resolver]
//! threshold = 88.0
//! registry = "reference/iso3166.csv"
//! exclude = ["Antarctica"]
//!
//! [resolver.aliases]
//! "Republic of Chad" = "Chad"
//!
//! [normalize.energy]
//! Electricity_Access = "percent"
//!
//! [[metrics]]
//! name = "gdp_per_km"
//! inputs = ["Real_GDP_PPP_billion_USD", "Total_Area_km"]
//! formula = { kind = "ratio" }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use atlas_derive::DerivedMetric;
use atlas_model::COUNTRY_COLUMN;
use atlas_normalize::{FieldKind, ProfileSet, TableProfile};
use atlas_resolve::DEFAULT_THRESHOLD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("resolver threshold {0} is outside 0..=100")]
    InvalidThreshold(f64),

    #[error("key_column must not be empty")]
    EmptyKeyColumn,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Minimum fuzzy score (0-100) for accepting a registry match.
    pub threshold: f64,
    /// Registry CSV replacing the embedded ISO 3166-1 list.
    pub registry: Option<PathBuf>,
    /// Extra aliases, raw spelling to registry name.
    pub aliases: BTreeMap<String, String>,
    /// Extra names that never resolve to a country.
    pub exclude: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            registry: None,
            aliases: BTreeMap::new(),
            exclude: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub supplementary_dir: Option<PathBuf>,
    pub key_column: String,
    pub resolver: ResolverConfig,
    /// Per-table profile replacements: table -> column -> kind.
    pub normalize: BTreeMap<String, BTreeMap<String, FieldKind>>,
    pub derive: bool,
    /// Metrics computed after the built-ins.
    pub metrics: Vec<DerivedMetric>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            supplementary_dir: None,
            key_column: COUNTRY_COLUMN.to_string(),
            resolver: ResolverConfig::default(),
            normalize: BTreeMap::new(),
            derive: true,
            metrics: Vec::new(),
        }
    }
}

impl PipelineConfig {
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Reads a config file. Relative paths inside it are taken relative to
    /// the file's directory.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&text).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(base) = path.parent() {
            config.rebase(base);
        }
        config.validate()?;
        Ok(config)
    }

    fn rebase(&mut self, base: &Path) {
        let rebase = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        rebase(&mut self.data_dir);
        if let Some(dir) = self.supplementary_dir.as_mut() {
            rebase(dir);
        }
        if let Some(registry) = self.resolver.registry.as_mut() {
            rebase(registry);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.resolver.threshold;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        if self.key_column.trim().is_empty() {
            return Err(ConfigError::EmptyKeyColumn);
        }
        Ok(())
    }

    /// Built-in profiles with configured tables replaced.
    pub fn profiles(&self) -> ProfileSet {
        let mut profiles = ProfileSet::builtin();
        for (table, columns) in &self.normalize {
            let profile: TableProfile = columns
                .iter()
                .map(|(column, kind)| (column.clone(), *kind))
                .collect();
            profiles.insert(table.clone(), profile);
        }
        profiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.key_column, "Country");
        assert_eq!(config.resolver.threshold, 88.0);
        assert!(config.derive);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_full_config() {
        let config: PipelineConfig = toml::from_str(
            r#"
            data_dir = "input"
            derive = false

            [resolver]
            threshold = 92.5
            exclude = ["Antarctica"]

            [resolver.aliases]
            "Republic of Chad" = "Chad"

            [normalize.energy]
            Electricity_Access = "percent"

            [[metrics]]
            name = "gdp_per_km"
            inputs = ["gdp", "Total_Area_km"]
            formula = { kind = "ratio" }
            "#,
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("input"));
        assert_eq!(config.resolver.threshold, 92.5);
        assert_eq!(config.resolver.aliases["Republic of Chad"], "Chad");
        assert_eq!(config.resolver.exclude, ["Antarctica"]);
        assert!(!config.derive);
        assert_eq!(config.metrics[0].name, "gdp_per_km");
        let profiles = config.profiles();
        assert_eq!(profiles.get("energy").unwrap().rules.len(), 1);
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let mut config = PipelineConfig::default();
        config.resolver.threshold = 101.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidThreshold(_))));
        config.resolver.threshold = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = toml::from_str::<PipelineConfig>("thresold = 80").unwrap_err();
        assert!(err.to_string().contains("thresold"));
    }
}
