//! Country snapshot pipeline with explicit stages.
//!
//! 1. **Resolver**: load the registry and alias table
//! 2. **Load**: read every CSV in the data directory
//! 3. **Normalize**: apply field profiles per table
//! 4. **Merge**: outer join, resolve names, dedupe, backfill
//! 5. **Supplementary**: join ISO3-keyed tables, when configured
//! 6. **Derive**: add computed metrics
//!
//! Each stage runs in its own span and returns typed results.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span};

use atlas_derive::{DerivedMetric, builtin_metrics, derive};
use atlas_ingest::load_tables;
use atlas_merge::{MergedTable, merge, merge_supplementary};
use atlas_model::{NormalizedTable, Table};
use atlas_normalize::{ProfileSet, normalize_all};
use atlas_resolve::{AliasMap, CountryResolver, Registry};

use crate::config::{PipelineConfig, ResolverConfig};
use crate::snapshot::CountrySnapshot;

/// Builds the country resolver from configuration.
pub fn build_resolver(config: &ResolverConfig) -> Result<CountryResolver> {
    let registry = match &config.registry {
        Some(path) => Registry::from_path(path)
            .with_context(|| format!("load country registry {}", path.display()))?,
        None => Registry::embedded().context("load embedded country registry")?,
    };
    let mut aliases = AliasMap::builtin(&registry).context("build alias table")?;
    aliases
        .extend(&registry, &config.aliases)
        .context("apply configured aliases")?;
    for name in &config.exclude {
        aliases.exclude(name);
    }
    debug!(
        registry = registry.version(),
        countries = registry.len(),
        aliases = aliases.len(),
        "resolver ready"
    );
    CountryResolver::new(registry, aliases, config.threshold).context("configure resolver")
}

/// Loads and normalizes every table in `dir`.
pub fn load_normalized(
    dir: &Path,
    profiles: &ProfileSet,
) -> Result<BTreeMap<String, NormalizedTable>> {
    let tables = info_span!("load", dir = %dir.display()).in_scope(|| -> Result<_> {
        let start = Instant::now();
        let tables =
            load_tables(dir).with_context(|| format!("load tables from {}", dir.display()))?;
        info!(
            tables = tables.len(),
            duration_ms = start.elapsed().as_millis(),
            "load complete"
        );
        Ok(tables)
    })?;
    info_span!("normalize").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let normalized = normalize_all(tables, profiles).context("normalize tables")?;
        info!(
            tables = normalized.len(),
            duration_ms = start.elapsed().as_millis(),
            "normalize complete"
        );
        Ok(normalized)
    })
}

/// Columns gained and lost between two versions of a table.
fn column_delta(before: &Table, after: &Table) -> (usize, usize) {
    let added = after
        .column_names()
        .iter()
        .filter(|name| !before.has_column(name))
        .count();
    let removed = before
        .column_names()
        .iter()
        .filter(|name| !after.has_column(name))
        .count();
    (added, removed)
}

/// Runs all stages for one configuration.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Built-in metrics followed by configured ones; empty when deriving is
    /// switched off.
    pub fn metrics(&self) -> Vec<DerivedMetric> {
        if !self.config.derive {
            return Vec::new();
        }
        let mut metrics = builtin_metrics();
        metrics.extend(self.config.metrics.iter().cloned());
        metrics
    }

    pub fn run(&self) -> Result<CountrySnapshot> {
        let start = Instant::now();
        self.config.validate().context("invalid configuration")?;
        let resolver = build_resolver(&self.config.resolver)?;
        let profiles = self.config.profiles();

        let tables = load_normalized(&self.config.data_dir, &profiles)?;

        let MergedTable { table, report } = info_span!("merge").in_scope(|| -> Result<_> {
            let start = Instant::now();
            let merged = merge(&tables, &self.config.key_column, &resolver)
                .with_context(|| format!("merge tables on {}", self.config.key_column))?;
            info!(
                countries = merged.table.height(),
                columns = merged.table.width(),
                fuzzy = merged.report.fuzzy.len(),
                unresolved = merged.report.misses.len(),
                duration_ms = start.elapsed().as_millis(),
                "merge complete"
            );
            Ok(merged)
        })?;

        let table = match &self.config.supplementary_dir {
            Some(dir) => self.join_supplementary(table, dir, &profiles, resolver.registry())?,
            None => table,
        };

        let metrics = self.metrics();
        let table = info_span!("derive").in_scope(|| -> Result<Table> {
            if metrics.is_empty() {
                debug!("derived metrics disabled");
                return Ok(table);
            }
            let derived = derive(&table, &metrics).context("derive metrics")?;
            let (added, removed) = column_delta(&table, &derived);
            info!(added, removed, "derive complete");
            Ok(derived)
        })?;

        info!(
            countries = table.height(),
            columns = table.width(),
            registry = resolver.registry().version(),
            duration_ms = start.elapsed().as_millis(),
            "snapshot built"
        );
        Ok(CountrySnapshot::new(
            table,
            report,
            resolver.registry().version(),
        ))
    }

    fn join_supplementary(
        &self,
        merged: Table,
        dir: &Path,
        profiles: &ProfileSet,
        registry: &Registry,
    ) -> Result<Table> {
        let extra = load_normalized(dir, profiles)?;
        if extra.is_empty() {
            debug!(dir = %dir.display(), "no supplementary tables");
            return Ok(merged);
        }
        info_span!("supplementary").in_scope(|| -> Result<_> {
            let start = Instant::now();
            let before = merged.width();
            let joined = merge_supplementary(merged, &extra, registry)
                .context("join supplementary tables")?;
            info!(
                tables = extra.len(),
                columns_added = joined.width().saturating_sub(before),
                duration_ms = start.elapsed().as_millis(),
                "supplementary join complete"
            );
            Ok(joined)
        })
    }
}
