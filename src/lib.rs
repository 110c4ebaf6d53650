//! crawl_budget library: crawl budget analysis over web server access logs
//!
//! This library scans combined-format access logs, isolates search engine
//! crawler traffic, classifies each crawled URL against known waste patterns
//! (deep pagination, faceted navigation, session IDs, ...), and produces
//! prioritized recommendations together with robots.txt exclusion rules.
//!
//! # Example
//!
//! ```no_run
//! use crawl_budget::{analyze_logs, render_robots_rules, Config};
//! use std::path::PathBuf;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     log_paths: vec![PathBuf::from("/var/log/nginx/access.log")],
//!     window_days: 7,
//!     ..Default::default()
//! };
//!
//! let report = analyze_logs(&config).await?;
//! println!("{} crawler requests, {:.2}% wasted",
//!          report.total_analysis.bot_requests,
//!          report.total_analysis.summary.waste_percentage);
//! println!("{}", render_robots_rules(&report.total_analysis));
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! The analysis entry points are async and require a Tokio runtime. The
//! building blocks ([`parse_line`], [`WasteClassifier`], [`FileAggregator`],
//! [`merge_analyses`]) are synchronous.

#![warn(missing_docs)]

pub mod app;
mod classify;
pub mod config;
mod error_handling;
pub mod initialization;
mod parse;
mod recommend;
mod report;
mod robots;
mod scan;

// Re-export public API
pub use classify::{BotClassifier, WasteClassifier, WastePattern, WasteTag};
pub use config::{Config, LogFormat, LogLevel, OutputFormat, Thresholds};
pub use error_handling::{ConfigError, InitializationError, ScanError, SkipReason, SkipStats};
pub use parse::{decode_path, parse_line, parse_timestamp, RequestRecord, LOG_TIMESTAMP_FORMAT};
pub use recommend::{generate_recommendations, Priority, Recommendation, RecommendationKind};
pub use report::{
    analyze_logs, analyze_logs_at, analyze_logs_with_cancel, dedup_recommendations,
    merge_analyses, AnalysisReport, Summary, TotalAnalysis,
};
pub use robots::{render_robots_file, render_robots_rules, robots_header, RobotsRules};
pub use scan::{analyze_file, FileAggregator, FileAnalysis, ScanContext, UrlWasteStat};
