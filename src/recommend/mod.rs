//! Recommendation engine.
//!
//! Turns the counters of a [`FileAnalysis`] into prioritized, actionable
//! findings. Every rule is an independent strict `>` threshold check against
//! one waste tag or one group of status codes, so the output is a pure
//! function of the counters and the [`Thresholds`].

use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use strum_macros::{Display, EnumIter};

use crate::classify::WasteTag;
use crate::config::{Thresholds, SERVER_ERROR_STATUSES};
use crate::scan::FileAnalysis;

/// Urgency of a recommendation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Display, Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    /// Nice to have
    Low,
    /// Worth scheduling
    Medium,
    /// Fix soon
    High,
    /// Fix now
    Critical,
}

impl Priority {
    /// Numeric rank used for ordering (critical = 4 ... low = 1).
    pub fn rank(self) -> u8 {
        match self {
            Priority::Critical => 4,
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

/// Category of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecommendationKind {
    /// Add exclusion rules to robots.txt
    RobotsTxt,
    /// Handle URL parameters (canonicals, parameter stripping)
    UrlParameters,
    /// Fix error responses served to crawlers
    FixErrors,
}

/// An actionable finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Category
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    /// Urgency
    pub priority: Priority,
    /// Short label, also used as the robots.txt comment
    pub issue: String,
    /// What was observed, with counts
    pub description: String,
    /// What to do about it
    pub solution: String,
    /// Literal robots.txt lines, when the fix is an exclusion rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub robots_rule: Option<Vec<String>>,
    /// Machine-readable follow-up for non-robots fixes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl Recommendation {
    /// Identity used when merging recommendations from several files.
    pub fn dedup_key(&self) -> (RecommendationKind, &str) {
        (self.kind, self.issue.as_str())
    }
}

struct WasteRule {
    tag: WasteTag,
    kind: RecommendationKind,
    priority: Priority,
    issue: &'static str,
    subject: &'static str,
    solution: &'static str,
    exclusion: Exclusion,
}

/// Where a rule's robots.txt lines come from.
enum Exclusion {
    /// Parameter or server-side advice only
    None,
    Fixed(&'static [&'static str]),
    /// One `Disallow` per stale archive directory actually crawled
    ObservedArchives,
}

// path prefix up to and including the first stale year segment
static ARCHIVE_DIRECTORY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^?#]*?/(?:19\d{2}|20[01]\d)/)").expect("archive directory regex is valid")
});

const WASTE_RULES: &[WasteRule] = &[
    WasteRule {
        tag: WasteTag::DeepPagination,
        kind: RecommendationKind::RobotsTxt,
        priority: Priority::High,
        issue: "Deep pagination crawling",
        subject: "deep pagination URLs",
        solution: "Block deep pagination in robots.txt and link important items from shallower pages.",
        exclusion: Exclusion::Fixed(&[
            "Disallow: /*?page=",
            "Disallow: /*&page=",
            "Disallow: /*/page/",
        ]),
    },
    WasteRule {
        tag: WasteTag::FacetedSearch,
        kind: RecommendationKind::RobotsTxt,
        priority: Priority::High,
        issue: "Faceted navigation crawling",
        subject: "faceted search URLs with three or more parameters",
        solution: "Block multi-parameter filter combinations and canonicalize facets to the base listing.",
        exclusion: Exclusion::Fixed(&["Disallow: /*?*&*&"]),
    },
    WasteRule {
        tag: WasteTag::SearchPages,
        kind: RecommendationKind::RobotsTxt,
        priority: Priority::Medium,
        issue: "Internal search pages crawled",
        subject: "internal search result pages",
        solution: "Block internal search results; they are thin, near-infinite and rarely indexable.",
        exclusion: Exclusion::Fixed(&[
            "Disallow: /search",
            "Disallow: /*?q=",
            "Disallow: /*?s=",
        ]),
    },
    WasteRule {
        tag: WasteTag::DateArchives,
        kind: RecommendationKind::RobotsTxt,
        priority: Priority::Medium,
        issue: "Stale date archives crawled",
        subject: "old date archive URLs",
        solution: "Block old date archives and rely on category pages and the sitemap for discovery.",
        exclusion: Exclusion::ObservedArchives,
    },
    WasteRule {
        tag: WasteTag::TrackingParams,
        kind: RecommendationKind::UrlParameters,
        priority: Priority::Medium,
        issue: "Tracking parameters crawled",
        subject: "URLs carrying tracking parameters",
        solution: "Point canonical tags at the clean URL and strip tracking parameters from internal links.",
        exclusion: Exclusion::None,
    },
    WasteRule {
        tag: WasteTag::SessionIds,
        kind: RecommendationKind::RobotsTxt,
        priority: Priority::High,
        issue: "Session IDs in URLs",
        subject: "URLs carrying session identifiers",
        solution: "Move sessions to cookies and block session parameters in robots.txt.",
        exclusion: Exclusion::Fixed(&[
            "Disallow: /*?*sid=",
            "Disallow: /*?*sessionid=",
            "Disallow: /*?*PHPSESSID=",
            "Disallow: /*;jsessionid=",
        ]),
    },
];

fn threshold_for(thresholds: &Thresholds, tag: WasteTag) -> Option<u64> {
    match tag {
        WasteTag::DeepPagination => Some(thresholds.deep_pagination),
        WasteTag::FacetedSearch => Some(thresholds.faceted_search),
        WasteTag::SearchPages => Some(thresholds.search_pages),
        WasteTag::DateArchives => Some(thresholds.date_archives),
        WasteTag::TrackingParams => Some(thresholds.tracking_params),
        WasteTag::SessionIds => Some(thresholds.session_ids),
        _ => None,
    }
}

/// Builds the recommendations for one analysis, most urgent first.
///
/// Ties keep rule order.
pub fn generate_recommendations(
    analysis: &FileAnalysis,
    thresholds: &Thresholds,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    for rule in WASTE_RULES {
        let Some(threshold) = threshold_for(thresholds, rule.tag) else {
            continue;
        };
        let count = analysis.waste_count(rule.tag);
        if count <= threshold {
            continue;
        }
        recommendations.push(Recommendation {
            kind: rule.kind,
            priority: rule.priority,
            issue: rule.issue.to_string(),
            description: format!(
                "Crawlers requested {} {} in the analyzed window.",
                count, rule.subject
            ),
            solution: rule.solution.to_string(),
            robots_rule: match rule.exclusion {
                Exclusion::None => None,
                Exclusion::Fixed(lines) => Some(lines.iter().map(|s| s.to_string()).collect()),
                Exclusion::ObservedArchives => archive_rules(analysis),
            },
            action: None,
        });
    }

    let not_found = analysis.status_count(404);
    if not_found > thresholds.not_found {
        recommendations.push(Recommendation {
            kind: RecommendationKind::FixErrors,
            priority: Priority::High,
            issue: "404 errors wasting crawl budget".to_string(),
            description: format!("Crawlers received {} Not Found responses.", not_found),
            solution: "Redirect moved content with 301s and remove internal links to dead URLs."
                .to_string(),
            robots_rule: None,
            action: Some("fix_404_errors".to_string()),
        });
    }

    let server_errors: u64 = SERVER_ERROR_STATUSES
        .iter()
        .map(|status| analysis.status_count(*status))
        .sum();
    if server_errors > thresholds.server_errors {
        recommendations.push(Recommendation {
            kind: RecommendationKind::FixErrors,
            priority: Priority::Critical,
            issue: "Server errors served to crawlers".to_string(),
            description: format!(
                "Crawlers received {} server errors (500/502/503).",
                server_errors
            ),
            solution: "Investigate server stability; repeated 5xx responses make crawlers slow down."
                .to_string(),
            robots_rule: None,
            action: Some("fix_server_errors".to_string()),
        });
    }

    // stable: equal priorities keep rule order
    recommendations.sort_by_key(|r| Reverse(r.priority.rank()));
    recommendations
}

/// `Disallow` lines for the stale archive directories crawlers visited.
///
/// robots.txt has no digit wildcard (`/19*/` also matches `/1984-novel/`), so
/// each directory is listed exactly. `None` when no crawled URL has one.
fn archive_rules(analysis: &FileAnalysis) -> Option<Vec<String>> {
    let directories: BTreeSet<&str> = analysis
        .url_stats
        .values()
        .filter(|stat| stat.patterns.contains(&WasteTag::DateArchives))
        .filter_map(|stat| ARCHIVE_DIRECTORY.captures(&stat.url))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();
    if directories.is_empty() {
        return None;
    }
    Some(
        directories
            .into_iter()
            .map(|dir| format!("Disallow: {}", dir))
            .collect(),
    )
}
