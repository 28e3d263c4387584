//! Country identity resolution.
//!
//! Maps arbitrary country-name strings to a canonical registry name and its
//! ISO 3166-1 alpha-3 code. A [`CountryResolver`] owns its registry and alias
//! table; build one per pipeline run.

mod aliases;
mod error;
mod registry;
mod report;
mod resolver;
mod score;

pub use aliases::AliasMap;
pub use error::{ResolveError, Result};
pub use registry::{EMBEDDED_REGISTRY_VERSION, Registry};
pub use report::{FuzzyMatch, ResolutionReport};
pub use resolver::{CountryResolver, DEFAULT_THRESHOLD, Resolution, ResolutionMethod};
pub use score::{normalize_name, similarity};
