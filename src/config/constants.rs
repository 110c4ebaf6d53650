//! Configuration constants.
//!
//! This module defines the default values used by the analyzer: the recency
//! window, surfacing thresholds, the crawler signature list and the waste
//! pattern table. Every value here can be overridden through [`crate::Config`].

use crate::classify::WasteTag;

/// Default recency window in days. Log lines older than this are ignored.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Minimum number of crawls before a wasteful URL is surfaced.
///
/// Tunable. The value is carried over from the original deployment and has no
/// documented rationale beyond "a handful of hits is noise".
pub const DEFAULT_MIN_CRAWL_COUNT: u64 = 5;

/// Number of wasteful URLs kept per scanned file.
pub const DEFAULT_TOP_URLS_PER_FILE: usize = 50;

/// Number of wasteful URLs kept in the merged report.
pub const DEFAULT_TOP_URLS_TOTAL: usize = 100;

/// Files scanned concurrently. 1 keeps the scan strictly sequential.
pub const DEFAULT_MAX_PARALLEL_FILES: usize = 1;

/// Longest log line kept in memory. Longer lines are discarded up to the next
/// newline and counted as unparseable.
pub const MAX_LOG_LINE_BYTES: usize = 64 * 1024;

/// Label used for the top waste pattern when no waste was recorded.
pub const NO_WASTE_PATTERN: &str = "none";

/// Case-insensitive user-agent substrings identifying crawlers we analyze.
///
/// Covers the web, image, news and video variants of Googlebot, the ads
/// landing-page checker and the URL inspection tool.
pub const DEFAULT_BOT_AGENTS: &[&str] = &[
    "googlebot",
    "googlebot-image",
    "googlebot-news",
    "googlebot-video",
    "adsbot-google",
    "google-inspectiontool",
];

/// Ordered waste pattern table: tag -> regular expression over the decoded
/// path and query.
///
/// Rules are independent. A URL collects every tag whose expression matches.
pub const DEFAULT_WASTE_PATTERNS: &[(WasteTag, &str)] = &[
    // page number 6 or higher, as a query parameter or a /page/N segment
    (
        WasteTag::DeepPagination,
        r"(?i)(?:[?&](?:page|paged|pg)=|/page/)(?:[6-9]|[1-9]\d+)(?:[/?&#]|$)",
    ),
    // three or more query parameters
    (WasteTag::FacetedSearch, r"\?(?:[^&#]*&){2}"),
    (
        WasteTag::SearchPages,
        r"(?i)(?:[?&](?:q|s|search|query|keywords?)=|/search(?:[/?#]|$))",
    ),
    // year archives from 1900 to 2019
    (WasteTag::DateArchives, r"/(?:19\d{2}|20[01]\d)/"),
    (WasteTag::TagPages, r"(?i)/tag/"),
    (WasteTag::AuthorPages, r"(?i)/author/"),
    (WasteTag::FeedWithParams, r"(?i)/(?:feed|rss|atom)/?\?"),
    (
        WasteTag::PrintMobile,
        r"(?i)[?&](?:print|printable|mobile|m)=(?:1|true|yes)(?:[&#]|$)",
    ),
    (
        WasteTag::SessionIds,
        r"(?i)[?&;](?:sid|sessionid|session_id|phpsessid|jsessionid)=",
    ),
    (
        WasteTag::SortFilter,
        r"(?i)[?&](?:sort|sort_?by|order|order_?by|filter\w*|dir)=",
    ),
    (WasteTag::LanguageParams, r"(?i)[?&](?:lang|language|hl|locale)="),
    (
        WasteTag::TrackingParams,
        r"(?i)[?&](?:utm_[a-z]+|fbclid|gclid|msclkid|mc_cid|mc_eid|_ga|ref)=",
    ),
];

// Recommendation thresholds. A rule fires when the count is strictly greater.
/// Deep pagination crawls before recommending a robots.txt rule.
pub const THRESHOLD_DEEP_PAGINATION: u64 = 10;
/// Faceted search crawls before recommending a robots.txt rule.
pub const THRESHOLD_FACETED_SEARCH: u64 = 20;
/// Internal search page crawls before recommending a robots.txt rule.
pub const THRESHOLD_SEARCH_PAGES: u64 = 15;
/// Stale date archive crawls before recommending a robots.txt rule.
pub const THRESHOLD_DATE_ARCHIVES: u64 = 5;
/// Tracking parameter crawls before recommending parameter handling.
pub const THRESHOLD_TRACKING_PARAMS: u64 = 10;
/// Session identifier crawls before recommending a robots.txt rule.
pub const THRESHOLD_SESSION_IDS: u64 = 5;
/// 404 responses served to crawlers before recommending a fix.
pub const THRESHOLD_NOT_FOUND: u64 = 20;
/// 500/502/503 responses served to crawlers before recommending a fix.
pub const THRESHOLD_SERVER_ERRORS: u64 = 10;

/// Status codes counted as server errors by the recommendation engine.
pub const SERVER_ERROR_STATUSES: &[u16] = &[500, 502, 503];

/// Environment variable holding a comma-separated list of log paths.
pub const ENV_LOG_PATHS: &str = "CRAWL_LOG_PATHS";
/// Environment variable overriding the recency window.
pub const ENV_WINDOW_DAYS: &str = "CRAWL_WINDOW_DAYS";
/// Environment variable overriding the minimum crawl count.
pub const ENV_MIN_CRAWL_COUNT: &str = "CRAWL_MIN_COUNT";
