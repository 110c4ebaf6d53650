//! Error type definitions.
//!
//! This module defines the error types used throughout the analyzer, and the
//! reasons a log line can be skipped without raising an error.

use std::path::PathBuf;

use log::SetLoggerError;
use serde::Serialize;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::classify::WasteTag;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Error types for invalid analyzer configuration.
///
/// These are the only errors surfaced by [`crate::analyze_logs`]; everything
/// that can go wrong with the log files themselves degrades to an empty result.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A waste pattern failed to compile.
    #[error("Invalid waste pattern for {tag}: {source}")]
    InvalidPattern {
        /// Tag the pattern was registered under
        tag: WasteTag,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// A numeric setting is out of range.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Name of the configuration field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Errors raised while scanning a single log file.
///
/// Caught at the file boundary: the file contributes nothing to the report
/// and the remaining files are still scanned.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The file could not be opened.
    #[error("Failed to open log file {}: {source}", path.display())]
    Open {
        /// File being scanned
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Reading failed part-way through the file.
    #[error("Failed to read log file {} at line {line}: {source}", path.display())]
    Read {
        /// File being scanned
        path: PathBuf,
        /// 1-based line number that failed to read
        line: u64,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The scan was cancelled before the file was fully read.
    #[error("Scan of {} cancelled after {lines} lines", path.display())]
    Cancelled {
        /// File being scanned
        path: PathBuf,
        /// Lines read before cancellation
        lines: u64,
    },
}

/// Reasons a log line is dropped or degraded without raising an error.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIterMacro, Serialize,
)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// Line does not match the combined log format
    Unparseable,
    /// Timestamp is older than the recency window
    OutsideWindow,
    /// Path could not be percent-decoded and was used as-is
    UndecodablePath,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SkipReason {
    /// Returns a human-readable description of the skip reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Unparseable => "Unparseable line",
            SkipReason::OutsideWindow => "Outside recency window",
            SkipReason::UndecodablePath => "Undecodable path (kept raw)",
        }
    }
}
