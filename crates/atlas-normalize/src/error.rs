use atlas_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("table {table}: normalized column '{column}' would replace an existing column")]
    OutputCollision { table: String, column: String },

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
