//! Read-only analytics over the finalized country table: column profiles,
//! regression-based performer rankings, range filters and "no data" rows.

mod empty;
mod error;
mod filter;
mod performance;
mod profile;

pub use empty::empty_countries;
pub use error::{AnalyticsError, Result};
pub use filter::{RangeFilter, apply_filters};
pub use performance::{
    LOWER_IS_BETTER, Performance, PerformanceOptions, PerformancePoint, fit_line, is_lower_better,
    performance,
};
pub use profile::{
    ColumnProfile, Distribution, NumericSummary, ValueCount, profile, profile_column,
    summarize_numeric,
};
