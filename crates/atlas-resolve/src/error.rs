#![deny(unsafe_code)]

use std::path::PathBuf;

/// Errors raised while building a resolver.
///
/// Resolution itself never fails: unmatched names are reported as misses.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("failed to read registry {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse registry {source_name}: {message}")]
    Csv { source_name: String, message: String },

    #[error("registry {source_name} is missing required column '{column}'")]
    MissingColumn { source_name: String, column: String },

    #[error("registry {source_name}, line {line}: invalid ISO3 code '{code}'")]
    InvalidCode {
        source_name: String,
        line: u64,
        code: String,
    },

    #[error("registry {source_name}: duplicate entry '{value}'")]
    DuplicateEntry { source_name: String, value: String },

    #[error("registry {source_name} contains no countries")]
    EmptyRegistry { source_name: String },

    #[error("alias '{alias}' points to '{canonical}', which is not a registry country")]
    UnknownCanonical { alias: String, canonical: String },

    #[error("fuzzy threshold {0} is outside 0..=100")]
    InvalidThreshold(f64),
}

impl ResolveError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;
