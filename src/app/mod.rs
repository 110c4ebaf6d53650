//! Main application modules.
//!
//! This module provides output rendering, deadline handling, and statistics
//! logging used by the CLI binary.

pub mod output;
pub mod shutdown;
pub mod statistics;

// Re-export public API
pub use output::{write_report, write_robots};
pub use shutdown::{shutdown_gracefully, spawn_deadline};
pub use statistics::print_report_summary;
