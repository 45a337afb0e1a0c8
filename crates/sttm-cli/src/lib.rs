//! CLI library components for the STTM impact analyzer.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
