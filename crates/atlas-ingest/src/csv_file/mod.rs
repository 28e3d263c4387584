//! CSV reading utilities.

mod header;
mod reader;

pub use header::normalize_headers;
pub use reader::{infer_column, read_table};
