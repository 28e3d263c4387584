use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AnalyticsError {
    #[error("column '{0}' not found")]
    UnknownColumn(String),

    #[error("column '{0}' is not numeric")]
    NonNumeric(String),

    #[error("{x} vs {y}: need at least 2 complete rows to fit, found {count}")]
    TooFewPoints { x: String, y: String, count: usize },

    #[error("{0}: all values are equal, the fit is undefined")]
    ConstantPredictor(String),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
