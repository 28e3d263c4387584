//! Command implementations and rendering for the `country-atlas` binary.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
