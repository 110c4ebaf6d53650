//! Tests for CLI subcommand parsing.

use clap::Parser;
use crawl_budget::config::{Cli, Command, OutputFormat, DEFAULT_BOT_AGENTS};
use crawl_budget::{LogFormat, LogLevel};
use std::path::PathBuf;

#[test]
fn test_analyze_defaults() {
    let cli = Cli::try_parse_from(["crawl_budget", "analyze", "--log-path", "access.log"])
        .expect("Failed to parse analyze command");
    let Command::Analyze(opt) = cli.command else {
        panic!("Expected analyze command");
    };
    assert_eq!(opt.format, OutputFormat::Text);
    assert_eq!(opt.common.log_paths, vec![PathBuf::from("access.log")]);
    assert_eq!(opt.common.window_days, 30);
    assert_eq!(opt.common.min_crawl_count, 5);
    assert_eq!(opt.common.top_urls, 100);
    assert_eq!(opt.common.max_parallel_files, 1);
    assert!(opt.common.timeout_seconds.is_none());
    assert!(matches!(opt.common.log_level, LogLevel::Info));
    assert!(matches!(opt.common.log_format, LogFormat::Plain));
}

#[test]
fn test_repeated_and_comma_separated_log_paths() {
    let cli = Cli::try_parse_from([
        "crawl_budget",
        "analyze",
        "--log-path",
        "a.log,b.log",
        "--log-path",
        "c.log",
    ])
    .unwrap();
    let Command::Analyze(opt) = cli.command else {
        panic!("Expected analyze command");
    };
    assert_eq!(
        opt.common.log_paths,
        vec![
            PathBuf::from("a.log"),
            PathBuf::from("b.log"),
            PathBuf::from("c.log")
        ]
    );
}

#[test]
fn test_robots_with_options() {
    let cli = Cli::try_parse_from([
        "crawl_budget",
        "robots",
        "--log-path",
        "access.log",
        "--window-days",
        "7",
        "--min-crawl-count",
        "2",
        "--max-parallel-files",
        "4",
        "--timeout-seconds",
        "60",
        "--format",
        "json",
        "--log-level",
        "debug",
        "--log-format",
        "json",
    ])
    .expect("Failed to parse robots command");
    let Command::Robots(opt) = cli.command else {
        panic!("Expected robots command");
    };
    assert_eq!(opt.format, OutputFormat::Json);
    assert_eq!(opt.common.window_days, 7);
    assert_eq!(opt.common.min_crawl_count, 2);
    assert_eq!(opt.common.max_parallel_files, 4);
    assert_eq!(opt.common.timeout_seconds, Some(60));
    assert!(matches!(opt.common.log_level, LogLevel::Debug));
    assert!(matches!(opt.common.log_format, LogFormat::Json));
}

#[test]
fn test_to_config_keeps_default_bots_unless_overridden() {
    let cli = Cli::try_parse_from(["crawl_budget", "analyze", "--log-path", "a.log"]).unwrap();
    let Command::Analyze(opt) = cli.command else {
        panic!("Expected analyze command");
    };
    let config = opt.common.to_config();
    assert_eq!(config.bot_agents.len(), DEFAULT_BOT_AGENTS.len());
    assert!(config.validate().is_ok());

    let cli = Cli::try_parse_from([
        "crawl_budget",
        "analyze",
        "--log-path",
        "a.log",
        "--bot-agent",
        "bingbot",
    ])
    .unwrap();
    let Command::Analyze(opt) = cli.command else {
        panic!("Expected analyze command");
    };
    assert_eq!(opt.common.to_config().bot_agents, vec!["bingbot".to_string()]);
}

#[test]
fn test_invalid_format_rejected() {
    let result = Cli::try_parse_from(["crawl_budget", "analyze", "--format", "xml"]);
    assert!(result.is_err());
}

#[test]
fn test_missing_subcommand_rejected() {
    assert!(Cli::try_parse_from(["crawl_budget"]).is_err());
}
