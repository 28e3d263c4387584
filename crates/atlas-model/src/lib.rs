//! Shared data model for the country atlas.
//!
//! Tables are column-oriented and loosely typed: every cell is a number, a
//! text value, or an explicit missing marker.

pub mod cell;
pub mod country;
pub mod error;
pub mod lookup;
pub mod normalized;
pub mod table;

pub use cell::{Cell, ColumnKind, MISSING_TOKENS, format_numeric, is_missing_token};
pub use country::{COUNTRY_COLUMN, CountryRecord, ISO3_COLUMN, Iso3};
pub use error::{ModelError, Result};
pub use lookup::CaseInsensitiveSet;
pub use normalized::NormalizedTable;
pub use table::{Column, Table};
