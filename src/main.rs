//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `crawl_budget` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::io::{self, Write};
use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tokio_util::sync::CancellationToken;

use crawl_budget::app::{
    print_report_summary, shutdown_gracefully, spawn_deadline, write_report, write_robots,
};
use crawl_budget::config::{Cli, Command, CommonOpt, OutputFormat};
use crawl_budget::initialization::init_logger_with;
use crawl_budget::{analyze_logs_with_cancel, AnalysisReport};

#[tokio::main]
async fn main() -> Result<()> {
    // Load CRAWL_* settings from .env: current directory first, then next to
    // the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();
    let (common, format) = match &cli.command {
        Command::Analyze(opt) => (&opt.common, opt.format),
        Command::Robots(opt) => (&opt.common, opt.format),
    };

    init_logger_with(common.log_level.clone().into(), common.log_format.clone())
        .context("Failed to initialize logger")?;

    let report = match run_analysis(common).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("crawl_budget error: {:#}", e);
            process::exit(1);
        }
    };
    print_report_summary(&report);

    if let Err(e) = emit(&cli.command, &report, format) {
        eprintln!("crawl_budget error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}

async fn run_analysis(common: &CommonOpt) -> Result<AnalysisReport> {
    let config = common.to_config();
    let cancel = CancellationToken::new();
    let deadline = common
        .timeout_seconds
        .map(|secs| spawn_deadline(cancel.clone(), Duration::from_secs(secs)));

    let result = analyze_logs_with_cancel(&config, &cancel).await;
    shutdown_gracefully(cancel, deadline).await;
    result
}

fn emit(command: &Command, report: &AnalysisReport, format: OutputFormat) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match command {
        Command::Analyze(_) => write_report(&mut out, report, format)?,
        Command::Robots(_) => write_robots(&mut out, report, format, Utc::now())?,
    }
    out.flush().context("Failed to flush output")?;
    Ok(())
}
