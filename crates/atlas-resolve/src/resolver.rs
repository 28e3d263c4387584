//! Raw country name to canonical name and ISO3.

use std::collections::BTreeMap;

use atlas_model::{CountryRecord, Iso3};
use serde::{Deserialize, Serialize};

use crate::aliases::AliasMap;
use crate::error::{ResolveError, Result};
use crate::registry::Registry;
use crate::score::{normalize_name, similarity};

/// Default minimum fuzzy score for accepting a registry match.
pub const DEFAULT_THRESHOLD: f64 = 88.0;

/// Territories that are always folded into one canonical country.
const OVERRIDES: &[(&str, &str)] = &[
    ("Gaza Strip", "Palestine, State of"),
    ("West Bank", "Palestine, State of"),
];

/// How a name was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ResolutionMethod {
    Empty,
    Override,
    /// A known non-country name; never matched.
    Excluded,
    Alias,
    Exact,
    Fuzzy { score: f64 },
    Miss { best_score: f64 },
}

impl ResolutionMethod {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Override => "override",
            Self::Excluded => "excluded",
            Self::Alias => "alias",
            Self::Exact => "exact",
            Self::Fuzzy { .. } => "fuzzy",
            Self::Miss { .. } => "miss",
        }
    }
}

/// Outcome of resolving one raw name.
///
/// `iso3` is present exactly when `canonical` is a registry name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub canonical: String,
    pub iso3: Option<Iso3>,
    pub method: ResolutionMethod,
}

impl Resolution {
    fn matched(record: &CountryRecord, method: ResolutionMethod) -> Self {
        Self {
            canonical: record.name.clone(),
            iso3: Some(record.iso3.clone()),
            method,
        }
    }

    fn unmatched(raw: &str, method: ResolutionMethod) -> Self {
        Self {
            canonical: raw.to_string(),
            iso3: None,
            method,
        }
    }

    pub fn is_match(&self) -> bool {
        self.iso3.is_some()
    }
}

/// Resolves country names against a registry.
///
/// Resolution order: empty, manual override, excluded name, alias, exact
/// registry name, fuzzy match at or above the threshold. Anything else is a
/// miss that keeps the raw name. Fuzzy ties go to the earlier registry entry.
#[derive(Debug, Clone)]
pub struct CountryResolver {
    registry: Registry,
    aliases: AliasMap,
    overrides: BTreeMap<String, String>,
    threshold: f64,
}

impl CountryResolver {
    /// Embedded registry, built-in aliases, default threshold.
    pub fn with_defaults() -> Result<Self> {
        let registry = Registry::embedded()?;
        let aliases = AliasMap::builtin(&registry)?;
        Self::new(registry, aliases, DEFAULT_THRESHOLD)
    }

    pub fn new(registry: Registry, aliases: AliasMap, threshold: f64) -> Result<Self> {
        if !(0.0..=100.0).contains(&threshold) {
            return Err(ResolveError::InvalidThreshold(threshold));
        }
        let mut overrides = BTreeMap::new();
        for (raw, canonical) in OVERRIDES {
            let record =
                registry
                    .by_name(canonical)
                    .ok_or_else(|| ResolveError::UnknownCanonical {
                        alias: (*raw).to_string(),
                        canonical: (*canonical).to_string(),
                    })?;
            overrides.insert(raw.to_lowercase(), record.name.clone());
        }
        tracing::debug!(
            registry = registry.version(),
            countries = registry.len(),
            aliases = aliases.len(),
            threshold,
            "built country resolver"
        );
        Ok(Self {
            registry,
            aliases,
            overrides,
            threshold,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn resolve(&self, raw: &str) -> Resolution {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Resolution::unmatched(raw, ResolutionMethod::Empty);
        }

        if let Some(record) = self
            .overrides
            .get(&trimmed.to_lowercase())
            .and_then(|name| self.registry.by_name(name))
        {
            return Resolution::matched(record, ResolutionMethod::Override);
        }

        if self.aliases.is_excluded(trimmed) {
            return Resolution::unmatched(trimmed, ResolutionMethod::Excluded);
        }

        if let Some(record) = self
            .aliases
            .get(trimmed)
            .and_then(|name| self.registry.by_name(name))
        {
            return Resolution::matched(record, ResolutionMethod::Alias);
        }

        if let Some(record) = self.registry.by_name(trimmed) {
            return Resolution::matched(record, ResolutionMethod::Exact);
        }

        let query = normalize_name(trimmed);
        let mut best: Option<(&CountryRecord, f64)> = None;
        for (record, candidate) in self.registry.scored_names() {
            let score = similarity(&query, candidate);
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((record, score));
            }
        }

        match best {
            Some((record, score)) if score >= self.threshold => {
                tracing::trace!(raw = trimmed, canonical = %record.name, score, "fuzzy match");
                Resolution::matched(record, ResolutionMethod::Fuzzy { score })
            }
            best => {
                let best_score = best.map_or(0.0, |(_, score)| score);
                Resolution::unmatched(trimmed, ResolutionMethod::Miss { best_score })
            }
        }
    }

    /// Reverse lookup of an alpha-3 code.
    pub fn resolve_iso3(&self, code: &str) -> Option<&CountryRecord> {
        self.registry.by_code(code)
    }
}
