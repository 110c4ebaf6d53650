//! Configuration types and CLI options.
//!
//! This module defines the library configuration ([`Config`], [`Thresholds`])
//! and the enums and structs used for command-line argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::classify::WasteTag;
use crate::config::constants::*;
use crate::error_handling::ConfigError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Output format for command results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text (`text/plain` for robots rules, a summary for reports)
    Text,
    /// JSON document
    Json,
}

/// Recommendation thresholds.
///
/// Each recommendation fires when its counter is strictly greater than the
/// threshold. Defaults are carried over from the original deployment and
/// are tunable rather than proven optimal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thresholds {
    /// Deep pagination crawls
    pub deep_pagination: u64,
    /// Faceted search crawls
    pub faceted_search: u64,
    /// Internal search page crawls
    pub search_pages: u64,
    /// Stale date archive crawls
    pub date_archives: u64,
    /// Tracking parameter crawls
    pub tracking_params: u64,
    /// Session identifier crawls
    pub session_ids: u64,
    /// 404 responses to crawlers
    pub not_found: u64,
    /// 500/502/503 responses to crawlers
    pub server_errors: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            deep_pagination: THRESHOLD_DEEP_PAGINATION,
            faceted_search: THRESHOLD_FACETED_SEARCH,
            search_pages: THRESHOLD_SEARCH_PAGES,
            date_archives: THRESHOLD_DATE_ARCHIVES,
            tracking_params: THRESHOLD_TRACKING_PARAMS,
            session_ids: THRESHOLD_SESSION_IDS,
            not_found: THRESHOLD_NOT_FOUND,
            server_errors: THRESHOLD_SERVER_ERRORS,
        }
    }
}

/// Library configuration (no CLI dependencies).
///
/// The analyzer is a function of this value and the log files on disk; there
/// is no global state.
///
/// # Examples
///
/// ```no_run
/// use crawl_budget::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     log_paths: vec![PathBuf::from("/var/log/nginx/access.log")],
///     window_days: 7,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Candidate access log files. Missing files are skipped.
    pub log_paths: Vec<PathBuf>,

    /// Only lines newer than `now - window_days` are counted
    pub window_days: u32,

    /// Minimum crawl count before a wasteful URL is surfaced
    pub min_crawl_count: u64,

    /// Wasteful URLs kept per scanned file
    pub top_urls_per_file: usize,

    /// Wasteful URLs kept in the merged report
    pub top_urls_total: usize,

    /// Files scanned concurrently (1 = sequential)
    pub max_parallel_files: usize,

    /// Case-insensitive user-agent substrings identifying crawlers
    pub bot_agents: Vec<String>,

    /// Ordered waste pattern table (tag, regular expression)
    pub waste_patterns: Vec<(WasteTag, String)>,

    /// Recommendation thresholds
    pub thresholds: Thresholds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_paths: Vec::new(),
            window_days: DEFAULT_WINDOW_DAYS,
            min_crawl_count: DEFAULT_MIN_CRAWL_COUNT,
            top_urls_per_file: DEFAULT_TOP_URLS_PER_FILE,
            top_urls_total: DEFAULT_TOP_URLS_TOTAL,
            max_parallel_files: DEFAULT_MAX_PARALLEL_FILES,
            bot_agents: DEFAULT_BOT_AGENTS.iter().map(|s| s.to_string()).collect(),
            waste_patterns: DEFAULT_WASTE_PATTERNS
                .iter()
                .map(|(tag, pattern)| (*tag, pattern.to_string()))
                .collect(),
            thresholds: Thresholds::default(),
        }
    }
}

impl Config {
    /// Checks numeric settings that would make the analysis meaningless.
    ///
    /// Pattern validity is checked when the classifier is compiled.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_days == 0 {
            return Err(ConfigError::InvalidValue {
                field: "window_days",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.top_urls_per_file == 0 || self.top_urls_total == 0 {
            return Err(ConfigError::InvalidValue {
                field: "top_urls",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_parallel_files == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_parallel_files",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Command-line interface.
///
/// # Examples
///
/// ```bash
/// # Analyze two logs and print a summary
/// crawl_budget analyze --log-path access.log --log-path access.log.1
///
/// # Emit robots.txt rules from the last 7 days of traffic
/// CRAWL_LOG_PATHS=/var/log/nginx/access.log crawl_budget robots --window-days 7
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "crawl_budget",
    about = "Finds crawler traffic that wastes crawl budget in access logs."
)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze access logs and report crawl waste
    Analyze(AnalyzeOpt),
    /// Render robots.txt exclusion rules from the analysis
    Robots(RobotsOpt),
}

/// Options for the `analyze` subcommand.
#[derive(Debug, Args)]
pub struct AnalyzeOpt {
    /// Options shared by all subcommands
    #[command(flatten)]
    pub common: CommonOpt,

    /// Output format: text|json
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Options for the `robots` subcommand.
#[derive(Debug, Args)]
pub struct RobotsOpt {
    /// Options shared by all subcommands
    #[command(flatten)]
    pub common: CommonOpt,

    /// Output format: text|json
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Options shared by all subcommands.
#[derive(Debug, Args)]
pub struct CommonOpt {
    /// Access log file to analyze (repeatable)
    #[arg(long = "log-path", env = ENV_LOG_PATHS, value_delimiter = ',')]
    pub log_paths: Vec<PathBuf>,

    /// Only analyze lines from the last N days
    #[arg(long, env = ENV_WINDOW_DAYS, default_value_t = DEFAULT_WINDOW_DAYS)]
    pub window_days: u32,

    /// Minimum crawls before a URL is reported as waste
    #[arg(long, env = ENV_MIN_CRAWL_COUNT, default_value_t = DEFAULT_MIN_CRAWL_COUNT)]
    pub min_crawl_count: u64,

    /// Number of wasteful URLs kept in the report
    #[arg(long, default_value_t = DEFAULT_TOP_URLS_TOTAL)]
    pub top_urls: usize,

    /// Crawler user-agent substring (repeatable, replaces the defaults)
    #[arg(long = "bot-agent")]
    pub bot_agents: Vec<String>,

    /// Number of log files scanned concurrently
    #[arg(long, default_value_t = DEFAULT_MAX_PARALLEL_FILES)]
    pub max_parallel_files: usize,

    /// Abort scanning after this many seconds (files already scanned still count)
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl CommonOpt {
    /// Builds the analyzer configuration from the parsed options.
    pub fn to_config(&self) -> Config {
        let defaults = Config::default();
        Config {
            log_paths: self.log_paths.clone(),
            window_days: self.window_days,
            min_crawl_count: self.min_crawl_count,
            top_urls_total: self.top_urls,
            max_parallel_files: self.max_parallel_files,
            bot_agents: if self.bot_agents.is_empty() {
                defaults.bot_agents.clone()
            } else {
                self.bot_agents.clone()
            },
            ..defaults
        }
    }
}
