//! Error handling and skipped-line statistics.
//!
//! This module provides:
//! - Error type definitions (initialization, configuration, per-file scan)
//! - Skipped-line counters for the soft failures of a scan
//!
//! Failures are categorized into:
//! - **Hard**: invalid configuration, returned to the caller
//! - **Per-file**: I/O trouble with one log file, logged and dropped
//! - **Soft**: malformed lines, stale lines, undecodable paths, only counted

mod stats;
mod types;

// Re-export public API
pub use stats::SkipStats;
pub use types::{ConfigError, InitializationError, ScanError, SkipReason};
