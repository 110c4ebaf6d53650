//! Application configuration and constants.
//!
//! This module provides:
//! - Default values (recency window, thresholds, crawler list, waste patterns)
//! - The library [`Config`] value passed to the analyzer
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{
    AnalyzeOpt, Cli, Command, CommonOpt, Config, LogFormat, LogLevel, OutputFormat, RobotsOpt,
    Thresholds,
};
