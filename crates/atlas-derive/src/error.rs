use atlas_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeriveError {
    /// The output column already exists; derived columns are never recomputed in place.
    #[error("derived column '{column}' already exists")]
    ColumnCollision { column: String },

    #[error("metric '{metric}' expects {expected} input column(s), got {actual}")]
    Arity {
        metric: String,
        expected: usize,
        actual: usize,
    },

    #[error("metric '{metric}': input column '{column}' is not numeric")]
    NonNumericInput { metric: String, column: String },

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, DeriveError>;
