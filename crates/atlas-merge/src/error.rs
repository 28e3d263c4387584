use atlas_model::ModelError;
use thiserror::Error;

/// Errors that abort a merge.
#[derive(Debug, Error)]
pub enum MergeError {
    /// A table lacks the join/identity column.
    #[error("table {table} has no '{column}' column to join on")]
    MissingKey { table: String, column: String },

    #[error("no tables to merge")]
    NoTables,

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, MergeError>;
