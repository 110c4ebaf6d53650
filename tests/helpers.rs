// Shared test helpers for building access logs.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use chrono::{DateTime, Duration, Utc};
use std::path::PathBuf;
use tempfile::TempDir;

pub const GOOGLEBOT: &str =
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";
pub const GOOGLEBOT_IMAGE: &str = "Googlebot-Image/1.0";
#[allow(dead_code)] // Used by other test files
pub const BROWSER: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/126.0 Safari/537.36";

/// Fixed "now" so window arithmetic is stable across a test.
pub fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-10-10T12:00:00Z")
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

/// One combined-format line, `age` before [`now`].
pub fn log_line(path: &str, status: u16, user_agent: &str, age: Duration) -> String {
    format!(
        r#"66.249.66.1 - - [{}] "GET {} HTTP/1.1" {} 512 "-" "{}""#,
        (now() - age).format("%d/%b/%Y:%H:%M:%S +0000"),
        path,
        status,
        user_agent
    )
}

/// `count` identical Googlebot hits on `path`, one hour old.
#[allow(dead_code)] // Used by other test files
pub fn bot_hits(path: &str, count: usize) -> Vec<String> {
    (0..count)
        .map(|_| log_line(path, 200, GOOGLEBOT, Duration::hours(1)))
        .collect()
}

/// Writes `lines` to `name` inside `dir` and returns the path.
pub fn write_log(dir: &TempDir, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.path().join(name);
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(&path, content).expect("Failed to write test log");
    path
}
