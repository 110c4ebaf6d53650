//! Parse module tests.

use super::*;
use chrono::{Datelike, Timelike};

const GOOGLEBOT: &str = "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

fn line(path: &str, status: &str, size: &str) -> String {
    format!(
        r#"66.249.66.1 - - [10/Oct/2025:13:55:36 +0200] "GET {} HTTP/1.1" {} {} "https://example.com/" "{}""#,
        path, status, size, GOOGLEBOT
    )
}

#[test]
fn test_parse_line_basic() {
    let record = parse_line(&line("/blog/post", "200", "2326")).expect("line should parse");
    assert_eq!(record.ip, "66.249.66.1");
    assert_eq!(record.method, "GET");
    assert_eq!(record.path, "/blog/post");
    assert!(record.path_decoded);
    assert_eq!(record.status, 200);
    assert_eq!(record.size, 2326);
    assert_eq!(record.referer, "https://example.com/");
    assert_eq!(record.user_agent, GOOGLEBOT);
}

#[test]
fn test_parse_line_timestamp_keeps_offset() {
    let record = parse_line(&line("/", "200", "1")).unwrap();
    assert_eq!(record.timestamp.year(), 2025);
    assert_eq!(record.timestamp.month(), 10);
    assert_eq!(record.timestamp.day(), 10);
    assert_eq!(record.timestamp.hour(), 13);
    assert_eq!(record.timestamp.offset().local_minus_utc(), 2 * 3600);
}

#[test]
fn test_parse_line_dash_size_is_zero() {
    let record = parse_line(&line("/", "304", "-")).unwrap();
    assert_eq!(record.size, 0);
    assert_eq!(record.status, 304);
}

#[test]
fn test_parse_line_decodes_path() {
    let record = parse_line(&line("/search?q=caf%C3%A9%20au%20lait", "200", "10")).unwrap();
    assert_eq!(record.path, "/search?q=café au lait");
    assert!(record.path_decoded);
}

#[test]
fn test_parse_line_malformed_escape_keeps_raw_path() {
    let record = parse_line(&line("/search?q=100%zz", "200", "10")).unwrap();
    assert_eq!(record.path, "/search?q=100%zz");
    assert!(!record.path_decoded);
}

#[test]
fn test_parse_line_invalid_utf8_escape_keeps_raw_path() {
    // %C3 alone is a truncated UTF-8 sequence
    let record = parse_line(&line("/p%C3", "200", "10")).unwrap();
    assert_eq!(record.path, "/p%C3");
    assert!(!record.path_decoded);
}

#[test]
fn test_parse_line_escaped_quote_in_user_agent() {
    let raw = r#"1.2.3.4 - - [10/Oct/2025:13:55:36 +0000] "GET / HTTP/1.1" 200 5 "-" "Bot \"quoted\" Googlebot""#;
    let record = parse_line(raw).expect("escaped quotes should parse");
    assert_eq!(record.user_agent, r#"Bot \"quoted\" Googlebot"#);
}

#[test]
fn test_parse_line_trailing_newline() {
    let raw = format!("{}\r\n", line("/", "200", "1"));
    assert!(parse_line(&raw).is_some());
}

#[test]
fn test_parse_line_rejects_garbage() {
    assert!(parse_line("").is_none());
    assert!(parse_line("not a log line").is_none());
    assert!(parse_line("\u{0}\u{1}binary\u{fffd}").is_none());
}

#[test]
fn test_parse_line_rejects_truncated_line() {
    let full = line("/page", "200", "1");
    let truncated = &full[..full.len() / 2];
    assert!(parse_line(truncated).is_none());
}

#[test]
fn test_parse_line_rejects_common_format_without_agent() {
    let raw = r#"1.2.3.4 - - [10/Oct/2025:13:55:36 +0000] "GET / HTTP/1.1" 200 5"#;
    assert!(parse_line(raw).is_none());
}

#[test]
fn test_parse_line_rejects_bad_timestamp() {
    let raw = r#"1.2.3.4 - - [99/Foo/2025:13:55:36 +0000] "GET / HTTP/1.1" 200 5 "-" "Googlebot""#;
    assert!(parse_line(raw).is_none());
}

#[test]
fn test_parse_timestamp() {
    let ts = parse_timestamp("01/Jan/2024:00:00:00 -0500").expect("valid timestamp");
    assert_eq!(ts.offset().local_minus_utc(), -5 * 3600);
    assert_eq!(ts.naive_utc().hour(), 5);
    assert!(parse_timestamp("2024-01-01T00:00:00Z").is_none());
}

#[test]
fn test_decode_path_without_escapes_borrows() {
    assert!(matches!(decode_path("/plain/path"), Cow::Borrowed(_)));
}

#[test]
fn test_decode_path_plus_is_not_space() {
    assert_eq!(decode_path("/a+b%2Fc"), "/a+b/c");
}

#[test]
fn test_decode_path_trailing_percent() {
    assert_eq!(decode_path("/discount-50%"), "/discount-50%");
}
