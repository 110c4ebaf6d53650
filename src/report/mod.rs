//! Multi-file analysis and merging.
//!
//! Runs the per-file scan over every configured log path and folds the
//! results into one [`AnalysisReport`]. Nothing is cached: every call re-reads
//! the files.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use log::{debug, info};
use serde::Serialize;
use strum::IntoEnumIterator;
use tokio_util::sync::CancellationToken;

use crate::classify::WasteTag;
use crate::config::{Config, NO_WASTE_PATTERN};
use crate::error_handling::{SkipReason, SkipStats};
use crate::recommend::{Recommendation, RecommendationKind};
use crate::scan::{analyze_file, rank_urls, FileAnalysis, ScanContext, UrlWasteStat};

/// Headline numbers of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Sum of all waste tag counts (a URL with two tags counts twice)
    pub total_waste: u64,
    /// `total_waste / bot_requests * 100`, rounded to two decimals; 0 without bot traffic
    pub waste_percentage: f64,
    /// Tag with the highest count, or `"none"`
    pub top_waste_pattern: String,
    /// Number of merged recommendations
    pub recommendation_count: usize,
}

/// Totals merged across all analyzed files.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalAnalysis {
    /// Parsed lines inside the recency window
    pub total_requests: u64,
    /// Of those, lines from known crawlers
    pub bot_requests: u64,
    /// Crawler requests per waste tag
    pub crawl_waste: BTreeMap<WasteTag, u64>,
    /// Crawler requests per status code
    pub status_codes: BTreeMap<u16, u64>,
    /// Crawler requests per hour of day
    pub hourly_activity: [u64; 24],
    /// Most crawled wasteful URLs across files
    pub top_waste_urls: Vec<UrlWasteStat>,
    /// Deduplicated findings
    pub recommendations: Vec<Recommendation>,
    /// Lines dropped or degraded, by reason
    pub lines_skipped: BTreeMap<SkipReason, u64>,
    /// Headline numbers
    pub summary: Summary,
}

/// Result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// When the analysis ran
    pub timestamp: DateTime<Utc>,
    /// Files successfully scanned. Zero means there was nothing to analyze.
    pub files_analyzed: usize,
    /// Merged totals
    pub total_analysis: TotalAnalysis,
}

/// Analyzes every configured log file.
///
/// # Errors
///
/// Only invalid configuration is an error. Missing or unreadable files are
/// logged and skipped; when none can be read the report has
/// `files_analyzed == 0` and empty totals.
///
/// # Example
///
/// ```no_run
/// use crawl_budget::{analyze_logs, Config};
/// use std::path::PathBuf;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config {
///     log_paths: vec![PathBuf::from("/var/log/nginx/access.log")],
///     ..Default::default()
/// };
/// let report = analyze_logs(&config).await?;
/// if report.files_analyzed == 0 {
///     println!("No access logs found");
/// }
/// # Ok(())
/// # }
/// ```
pub async fn analyze_logs(config: &Config) -> Result<AnalysisReport> {
    analyze_logs_with_cancel(config, &CancellationToken::new()).await
}

/// Like [`analyze_logs`], stopping early when `cancel` fires.
///
/// A file interrupted by cancellation contributes nothing; files already
/// finished are still merged.
pub async fn analyze_logs_with_cancel(
    config: &Config,
    cancel: &CancellationToken,
) -> Result<AnalysisReport> {
    analyze_logs_at(config, Utc::now(), cancel).await
}

/// Like [`analyze_logs_with_cancel`], with an explicit "now" for the window.
pub async fn analyze_logs_at(
    config: &Config,
    now: DateTime<Utc>,
    cancel: &CancellationToken,
) -> Result<AnalysisReport> {
    config.validate().context("Invalid analyzer configuration")?;
    let ctx =
        ScanContext::from_config(config, now).context("Failed to compile waste patterns")?;

    let mut seen = HashSet::new();
    let mut paths: Vec<PathBuf> = Vec::new();
    for path in &config.log_paths {
        if !seen.insert(path.clone()) {
            debug!("Ignoring duplicate log path: {}", path.display());
            continue;
        }
        if tokio::fs::try_exists(path).await.unwrap_or(false) {
            paths.push(path.clone());
        } else {
            info!("Log path does not exist, skipping: {}", path.display());
        }
    }

    // buffered() yields in input order, so the merge does not depend on which
    // scan finishes first
    let analyses: Vec<FileAnalysis> = stream::iter(paths.iter())
        .map(|path| analyze_file(path, &ctx, cancel))
        .buffered(config.max_parallel_files)
        .filter_map(|analysis| async move { analysis })
        .collect()
        .await;

    info!(
        "Analyzed {} of {} configured log files",
        analyses.len(),
        config.log_paths.len()
    );

    Ok(AnalysisReport {
        timestamp: now,
        files_analyzed: analyses.len(),
        total_analysis: merge_analyses(&analyses, config.top_urls_total),
    })
}

/// Merges per-file analyses, in the given order.
///
/// Counters are summed, URL lists concatenated then re-ranked and cut to
/// `top_urls`, and recommendations deduplicated.
pub fn merge_analyses(analyses: &[FileAnalysis], top_urls: usize) -> TotalAnalysis {
    let mut total_requests = 0;
    let mut bot_requests = 0;
    let mut crawl_waste: BTreeMap<WasteTag, u64> = WasteTag::iter().map(|t| (t, 0)).collect();
    let mut status_codes: BTreeMap<u16, u64> = BTreeMap::new();
    let mut hourly_activity = [0u64; 24];
    let mut top_waste_urls = Vec::new();
    let mut recommendations = Vec::new();
    let mut skipped = SkipStats::new();

    for analysis in analyses {
        total_requests += analysis.total_requests;
        bot_requests += analysis.bot_requests;
        for (tag, count) in &analysis.crawl_waste {
            *crawl_waste.entry(*tag).or_insert(0) += count;
        }
        for (status, count) in &analysis.status_codes {
            *status_codes.entry(*status).or_insert(0) += count;
        }
        for (hour, count) in analysis.hourly_activity.iter().enumerate() {
            hourly_activity[hour] += count;
        }
        top_waste_urls.extend(analysis.top_waste_urls.iter().cloned());
        recommendations.extend(analysis.recommendations.iter().cloned());
        skipped.merge(&analysis.skipped);
    }

    rank_urls(&mut top_waste_urls);
    top_waste_urls.truncate(top_urls);
    let recommendations = dedup_recommendations(recommendations);
    let summary = summarize(&crawl_waste, bot_requests, recommendations.len());

    TotalAnalysis {
        total_requests,
        bot_requests,
        crawl_waste,
        status_codes,
        hourly_activity,
        top_waste_urls,
        recommendations,
        lines_skipped: skipped.to_map(),
        summary,
    }
}

/// Keeps one recommendation per (type, issue), the highest priority one.
///
/// The survivor takes the position of the first occurrence; on equal
/// priority the first occurrence wins. Robots rule lines of the dropped
/// duplicates are appended to the survivor's, without repeats.
pub fn dedup_recommendations(recommendations: Vec<Recommendation>) -> Vec<Recommendation> {
    let mut deduped: Vec<Recommendation> = Vec::with_capacity(recommendations.len());
    let mut index: HashMap<(RecommendationKind, String), usize> = HashMap::new();

    for rec in recommendations {
        let key = (rec.kind, rec.issue.clone());
        match index.get(&key) {
            Some(&i) => {
                let dropped_rules = if rec.priority.rank() > deduped[i].priority.rank() {
                    std::mem::replace(&mut deduped[i], rec).robots_rule
                } else {
                    rec.robots_rule
                };
                append_rules(&mut deduped[i], dropped_rules);
            }
            None => {
                index.insert(key, deduped.len());
                deduped.push(rec);
            }
        }
    }
    deduped
}

fn append_rules(target: &mut Recommendation, extra: Option<Vec<String>>) {
    let Some(extra) = extra else {
        return;
    };
    let rules = target.robots_rule.get_or_insert_with(Vec::new);
    for line in extra {
        if !rules.contains(&line) {
            rules.push(line);
        }
    }
}

fn summarize(
    crawl_waste: &BTreeMap<WasteTag, u64>,
    bot_requests: u64,
    recommendation_count: usize,
) -> Summary {
    let total_waste: u64 = crawl_waste.values().sum();

    let waste_percentage = if bot_requests == 0 {
        0.0
    } else {
        let pct = total_waste as f64 / bot_requests as f64 * 100.0;
        (pct * 100.0).round() / 100.0
    };

    // ties go to the tag declared first
    let top_waste_pattern = crawl_waste
        .iter()
        .filter(|(_, count)| **count > 0)
        .fold(None::<(WasteTag, u64)>, |best, (tag, count)| match best {
            Some((_, best_count)) if best_count >= *count => best,
            _ => Some((*tag, *count)),
        })
        .map(|(tag, _)| tag.to_string())
        .unwrap_or_else(|| NO_WASTE_PATTERN.to_string());

    Summary {
        total_waste,
        waste_percentage,
        top_waste_pattern,
        recommendation_count,
    }
}
