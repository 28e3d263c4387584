use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("table {table}: duplicate column '{column}'")]
    DuplicateColumn { table: String, column: String },

    #[error("table {table}: column '{column}' has {actual} cells, expected {expected}")]
    LengthMismatch {
        table: String,
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("table {table}: column '{column}' not found")]
    ColumnNotFound { table: String, column: String },

    #[error("invalid ISO3 code: '{0}'")]
    InvalidIso3(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
