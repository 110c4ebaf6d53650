//! Access log line parsing.
//!
//! Parses lines in the combined log format:
//!
//! ```text
//! 66.249.66.1 - - [10/Oct/2025:13:55:36 +0000] "GET /search?q=x HTTP/1.1" 200 2326 "-" "Mozilla/5.0 (compatible; Googlebot/2.1)"
//! ```
//!
//! Lines that do not match are not errors: logs routinely contain truncated
//! writes, binary junk and lines from other formats. Callers count them and
//! move on.

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use percent_encoding::percent_decode_str;
use regex::Regex;

/// Timestamp layout of the bracketed field, e.g. `10/Oct/2025:13:55:36 +0000`.
pub const LOG_TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

static COMBINED_LOG_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(\S+) \S+ \S+ \[([^\]]+)\] "(\S+) (\S+) [^"]*" (\d{3}) (\d+|-) "((?:[^"\\]|\\.)*)" "((?:[^"\\]|\\.)*)""#,
    )
    .expect("combined log pattern is valid")
});

/// One parsed access log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRecord {
    /// Client address
    pub ip: String,
    /// Request time, in the offset recorded by the server
    pub timestamp: DateTime<FixedOffset>,
    /// HTTP method
    pub method: String,
    /// Percent-decoded path and query (raw if decoding failed)
    pub path: String,
    /// False when `path` is the undecoded original
    pub path_decoded: bool,
    /// HTTP status code
    pub status: u16,
    /// Response size in bytes (0 when logged as `-`)
    pub size: u64,
    /// Referer header
    pub referer: String,
    /// User-Agent header
    pub user_agent: String,
}

/// Parses one combined-format log line.
///
/// Returns `None` when the line does not match the format or its timestamp,
/// status or size fields are malformed.
pub fn parse_line(line: &str) -> Option<RequestRecord> {
    let caps = COMBINED_LOG_LINE.captures(line.trim_end_matches(['\r', '\n']))?;

    let timestamp = parse_timestamp(&caps[2])?;
    let status = caps[5].parse::<u16>().ok()?;
    let size = match &caps[6] {
        "-" => 0,
        raw => raw.parse::<u64>().ok()?,
    };
    let raw_path = &caps[4];
    let decoded = decode_path(raw_path);
    let path_decoded = !raw_path.contains('%') || matches!(decoded, Cow::Owned(_));
    let path = decoded.into_owned();

    Some(RequestRecord {
        ip: caps[1].to_string(),
        timestamp,
        method: caps[3].to_string(),
        path,
        path_decoded,
        status,
        size,
        referer: caps[7].to_string(),
        user_agent: caps[8].to_string(),
    })
}

/// Parses the bracketed timestamp field (`DD/Mon/YYYY:HH:MM:SS +ZZZZ`).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(raw.trim(), LOG_TIMESTAMP_FORMAT).ok()
}

/// Percent-decodes a request path.
///
/// Falls back to the raw string when it contains a malformed escape (`%` not
/// followed by two hex digits) or decodes to invalid UTF-8. Crawlers request
/// plenty of both, so this never fails.
pub fn decode_path(raw: &str) -> Cow<'_, str> {
    if !raw.contains('%') || has_malformed_escape(raw) {
        return Cow::Borrowed(raw);
    }
    match percent_decode_str(raw).decode_utf8() {
        Ok(decoded) => Cow::Owned(decoded.into_owned()),
        Err(_) => Cow::Borrowed(raw),
    }
}

fn has_malformed_escape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        b == b'%'
            && !(bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit))
    })
}

#[cfg(test)]
mod tests;
