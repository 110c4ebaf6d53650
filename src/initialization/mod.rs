//! Application initialization.
//!
//! Logger setup for the CLI binary. The analyzer itself needs no global
//! initialization: classifiers are compiled per run from [`crate::Config`].

mod logger;

// Re-export public API
pub use logger::init_logger_with;
