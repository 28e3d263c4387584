//! Pipeline orchestration for the country atlas.
//!
//! [`Pipeline`] turns a directory of raw CSV tables into a
//! [`CountrySnapshot`]: one row per country, keyed by ISO3, with normalized
//! fields and derived metrics.

pub mod config;
pub mod frame;
pub mod pipeline;
pub mod snapshot;

pub use config::{ConfigError, PipelineConfig, ResolverConfig};
pub use frame::to_dataframe;
pub use pipeline::{Pipeline, build_resolver, load_normalized};
pub use snapshot::CountrySnapshot;
