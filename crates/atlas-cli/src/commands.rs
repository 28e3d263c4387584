use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use tracing::{debug, info_span};

use atlas_analytics::{
    ColumnProfile, Performance, PerformanceOptions, RangeFilter, apply_filters, empty_countries,
    performance, profile, profile_column,
};
use atlas_core::{CountrySnapshot, Pipeline, PipelineConfig, build_resolver};
use atlas_model::ISO3_COLUMN;
use atlas_resolve::{CountryResolver, ResolutionMethod};

use crate::cli::{BuildArgs, ProfileArgs, RankArgs, ResolveArgs, SourceArgs};

/// Outcome of `build`.
#[derive(Debug)]
pub struct BuildResult {
    pub snapshot: CountrySnapshot,
    /// ISO3 codes of countries without any indicator value.
    pub empty: Vec<String>,
    pub output: Option<PathBuf>,
}

/// One line of `resolve` output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolveRow {
    pub input: String,
    pub canonical: String,
    pub iso3: Option<String>,
    pub method: &'static str,
    pub score: Option<f64>,
}

/// Config file (if any) with command-line overrides applied.
pub fn load_config(config: Option<&PathBuf>) -> Result<PipelineConfig> {
    match config {
        Some(path) => PipelineConfig::from_path(path)
            .with_context(|| format!("load config {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

fn source_config(args: &SourceArgs) -> Result<PipelineConfig> {
    let mut config = load_config(args.config.as_ref())?;
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(dir) = &args.supplementary {
        config.supplementary_dir = Some(dir.clone());
    }
    if let Some(threshold) = args.threshold {
        config.resolver.threshold = threshold;
    }
    if args.no_derive {
        config.derive = false;
    }
    config.validate()?;
    Ok(config)
}

fn build_snapshot(args: &SourceArgs) -> Result<CountrySnapshot> {
    let config = source_config(args)?;
    let data_dir = config.data_dir.clone();
    Pipeline::new(config)
        .run()
        .with_context(|| format!("build country table from {}", data_dir.display()))
}

pub fn run_build(args: &BuildArgs) -> Result<BuildResult> {
    let snapshot = build_snapshot(&args.source)?;
    let empty = empty_countries(snapshot.table());
    if let Some(path) = &args.output {
        info_span!("write", path = %path.display()).in_scope(|| {
            snapshot
                .write_csv(path)
                .with_context(|| format!("write {}", path.display()))
        })?;
    }
    Ok(BuildResult {
        snapshot,
        empty,
        output: args.output.clone(),
    })
}

/// Resolves each name independently, in input order.
pub fn resolve_names(resolver: &CountryResolver, names: &[String]) -> Vec<ResolveRow> {
    names
        .iter()
        .map(|name| {
            let resolution = resolver.resolve(name);
            let score = match resolution.method {
                ResolutionMethod::Fuzzy { score } => Some(score),
                ResolutionMethod::Miss { best_score } => Some(best_score),
                _ => None,
            };
            ResolveRow {
                input: name.clone(),
                canonical: resolution.canonical,
                iso3: resolution.iso3.map(|code| code.as_str().to_string()),
                method: resolution.method.label(),
                score,
            }
        })
        .collect()
}

pub fn run_resolve(args: &ResolveArgs) -> Result<Vec<ResolveRow>> {
    let mut config = load_config(args.config.as_ref())?;
    if let Some(threshold) = args.threshold {
        config.resolver.threshold = threshold;
    }
    config.validate()?;
    let resolver = build_resolver(&config.resolver)?;
    debug!(names = args.names.len(), "resolving names");
    Ok(resolve_names(&resolver, &args.names))
}

pub fn run_profile(args: &ProfileArgs) -> Result<Vec<ColumnProfile>> {
    let snapshot = build_snapshot(&args.source)?;
    if args.columns.is_empty() {
        return Ok(profile(snapshot.table()));
    }
    args.columns
        .iter()
        .map(|name| {
            let column = lookup_column(&snapshot, name)?;
            let column = snapshot
                .table()
                .column(column)
                .ok_or_else(|| anyhow!("unknown column '{name}'"))?;
            Ok(profile_column(column))
        })
        .collect()
}

fn lookup_column<'a>(snapshot: &'a CountrySnapshot, name: &str) -> Result<&'a str> {
    snapshot.find_column(name).ok_or_else(|| {
        anyhow!(
            "unknown column '{name}'; available columns: {}",
            snapshot.columns().join(", ")
        )
    })
}

/// Parses `COLUMN=MIN..MAX`; either bound may be empty.
pub fn parse_range_filter(raw: &str) -> Result<RangeFilter> {
    let (column, range) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("filter '{raw}' is not COLUMN=MIN..MAX"))?;
    let (min, max) = range
        .split_once("..")
        .ok_or_else(|| anyhow!("filter '{raw}' is not COLUMN=MIN..MAX"))?;
    let bound = |text: &str| -> Result<Option<f64>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        text.parse::<f64>()
            .map(Some)
            .with_context(|| format!("invalid bound '{text}' in filter '{raw}'"))
    };
    let column = column.trim();
    if column.is_empty() {
        bail!("filter '{raw}' has no column");
    }
    Ok(RangeFilter::new(column, bound(min)?, bound(max)?))
}

pub fn run_rank(args: &RankArgs) -> Result<Performance> {
    let snapshot = build_snapshot(&args.source)?;
    let x = lookup_column(&snapshot, &args.x)?;
    let y = lookup_column(&snapshot, &args.y)?;

    let mut filters = Vec::with_capacity(args.filters.len());
    for raw in &args.filters {
        let mut filter = parse_range_filter(raw)?;
        filter.column = lookup_column(&snapshot, &filter.column)?.to_string();
        filters.push(filter);
    }

    let table = if filters.is_empty() {
        snapshot.table().clone()
    } else {
        let keep: HashSet<String> = apply_filters(snapshot.table(), &filters)?
            .into_iter()
            .collect();
        let codes = snapshot.table().require_column(ISO3_COLUMN)?;
        let rows: Vec<usize> = (0..snapshot.height())
            .filter(|&row| codes.get(row).as_text().is_some_and(|code| keep.contains(code)))
            .collect();
        debug!(kept = rows.len(), "range filters applied");
        snapshot.table().take_rows(&rows)
    };

    let options = PerformanceOptions {
        log_x: args.log_x,
        top_n: args.top,
        lower_is_better: args.lower_is_better.then_some(true),
    };
    performance(&table, x, y, &options).with_context(|| format!("rank {y} against {x}"))
}
