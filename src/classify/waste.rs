//! Waste pattern classification.
//!
//! A URL is "waste" when crawling it is unlikely to help indexing: deep
//! pagination, faceted navigation, internal search, stale archives and so on.
//! The rules live in an ordered table of `(tag, regex)` entries so each can be
//! tested on its own and new ones added without touching control flow.

use std::collections::BTreeSet;

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::error_handling::ConfigError;

/// Why a URL is considered low-value to crawl.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    Display,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum WasteTag {
    /// Page number beyond the pagination floor
    DeepPagination,
    /// Three or more query parameters at once
    FacetedSearch,
    /// Internal search result page
    SearchPages,
    /// Date archive for a stale year
    DateArchives,
    /// `/tag/` listing
    TagPages,
    /// `/author/` listing
    AuthorPages,
    /// Feed URL carrying query parameters
    FeedWithParams,
    /// Print or mobile duplicate
    PrintMobile,
    /// Session identifier in the URL
    SessionIds,
    /// Sort, order or filter parameter
    SortFilter,
    /// Language selected by query parameter
    LanguageParams,
    /// Campaign or click tracking parameter
    TrackingParams,
}

/// One compiled waste rule.
#[derive(Debug, Clone)]
pub struct WastePattern {
    /// Tag emitted when the pattern matches
    pub tag: WasteTag,
    /// Expression tested against the decoded path and query
    pub pattern: Regex,
}

impl WastePattern {
    /// Compiles a single rule.
    pub fn new(tag: WasteTag, pattern: &str) -> Result<Self, ConfigError> {
        let pattern =
            Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern { tag, source })?;
        Ok(WastePattern { tag, pattern })
    }

    /// Returns true when the rule matches the URL.
    pub fn matches(&self, url: &str) -> bool {
        self.pattern.is_match(url)
    }
}

/// Ordered table of waste rules.
#[derive(Debug, Clone)]
pub struct WasteClassifier {
    patterns: Vec<WastePattern>,
}

impl WasteClassifier {
    /// Builds a classifier from already compiled rules.
    pub fn new(patterns: Vec<WastePattern>) -> Self {
        WasteClassifier { patterns }
    }

    /// Compiles a `(tag, regex)` table, preserving its order.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` for the first expression that
    /// fails to compile.
    pub fn from_table<S: AsRef<str>>(table: &[(WasteTag, S)]) -> Result<Self, ConfigError> {
        let patterns = table
            .iter()
            .map(|(tag, pattern)| WastePattern::new(*tag, pattern.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(patterns))
    }

    /// Every tag whose rule matches the URL. Empty means "not waste".
    ///
    /// Several rules may register the same tag; it is reported once.
    pub fn classify(&self, url: &str) -> BTreeSet<WasteTag> {
        self.patterns
            .iter()
            .filter(|p| p.matches(url))
            .map(|p| p.tag)
            .collect()
    }

    /// The rules in evaluation order.
    pub fn patterns(&self) -> &[WastePattern] {
        &self.patterns
    }
}

impl Default for WasteClassifier {
    fn default() -> Self {
        Self::from_table(crate::config::DEFAULT_WASTE_PATTERNS)
            .expect("default waste patterns are valid")
    }
}
