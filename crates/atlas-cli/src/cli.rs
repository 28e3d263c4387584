//! CLI argument definitions for `country-atlas`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "country-atlas",
    version,
    about = "Build a one-row-per-country table from heterogeneous country CSVs",
    long_about = "Load raw country tables, normalize their fields, resolve country names\n\
                  to ISO 3166-1 identities and merge everything into one table keyed by ISO3."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full pipeline and summarize the merged table.
    Build(BuildArgs),

    /// Show how country names resolve against the registry.
    Resolve(ResolveArgs),

    /// Profile the columns of the merged table.
    Profile(ProfileArgs),

    /// Rank countries by how far they sit above or below a fitted trend.
    Rank(RankArgs),
}

/// Inputs shared by every command that builds a snapshot.
#[derive(Parser)]
pub struct SourceArgs {
    /// Directory of country CSV files (overrides `data_dir` from the config).
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// TOML pipeline configuration.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory of ISO3-keyed tables joined after the merge.
    #[arg(long = "supplementary", value_name = "DIR")]
    pub supplementary: Option<PathBuf>,

    /// Minimum fuzzy score (0-100) for accepting a country match.
    #[arg(long = "threshold", value_name = "N")]
    pub threshold: Option<f64>,

    /// Skip derived metrics.
    #[arg(long = "no-derive")]
    pub no_derive: bool,
}

#[derive(Parser)]
pub struct BuildArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Write the merged table to this CSV file.
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ResolveArgs {
    /// Raw country names to resolve.
    #[arg(value_name = "NAME", required = true)]
    pub names: Vec<String>,

    /// Minimum fuzzy score (0-100) for accepting a country match.
    #[arg(long = "threshold", value_name = "N")]
    pub threshold: Option<f64>,

    /// TOML pipeline configuration (registry and alias settings).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct ProfileArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Only profile these columns (case-insensitive, repeatable).
    #[arg(long = "column", value_name = "COLUMN")]
    pub columns: Vec<String>,
}

#[derive(Parser)]
pub struct RankArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Predictor column.
    #[arg(long = "x", value_name = "COLUMN")]
    pub x: String,

    /// Outcome column.
    #[arg(long = "y", value_name = "COLUMN")]
    pub y: String,

    /// Fit against the natural log of x (non-positive x values are dropped).
    #[arg(long = "log-x")]
    pub log_x: bool,

    /// Number of countries listed on each side.
    #[arg(long = "top", value_name = "N", default_value_t = 5)]
    pub top: usize,

    /// Treat lower outcome values as better.
    #[arg(long = "lower-is-better")]
    pub lower_is_better: bool,

    /// Restrict to countries inside a range, as COLUMN=MIN..MAX (either
    /// bound may be omitted). Repeatable.
    #[arg(long = "filter", value_name = "COLUMN=MIN..MAX")]
    pub filters: Vec<String>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
