//! Per-file log aggregation.
//!
//! Streams one access log line by line through the parser and classifiers,
//! folding each line into counters. Files of any size are supported: only the
//! current line and the per-URL waste table are held in memory.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, FixedOffset, Timelike, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use strum::IntoEnumIterator;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use crate::classify::{BotClassifier, WasteClassifier, WasteTag};
use crate::config::{Config, Thresholds, MAX_LOG_LINE_BYTES};
use crate::error_handling::{ConfigError, ScanError, SkipReason, SkipStats};
use crate::parse::{parse_line, RequestRecord};
use crate::recommend::{generate_recommendations, Recommendation};

/// Aggregated crawl statistics for one wasteful URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlWasteStat {
    /// Decoded path and query
    pub url: String,
    /// Crawler requests for this URL
    pub crawl_count: u64,
    /// Every waste tag the URL matched
    pub patterns: BTreeSet<WasteTag>,
    /// Most recent crawl
    pub last_crawled: DateTime<FixedOffset>,
    /// Status codes served for this URL
    pub status_codes: BTreeMap<u16, u64>,
}

/// Result of scanning one log file.
#[derive(Debug, Clone)]
pub struct FileAnalysis {
    /// File the analysis came from
    pub source: PathBuf,
    /// Parsed lines inside the recency window
    pub total_requests: u64,
    /// Of those, lines from known crawlers
    pub bot_requests: u64,
    /// Crawler requests per waste tag (every tag present, zero if unseen)
    pub crawl_waste: BTreeMap<WasteTag, u64>,
    /// Every wasteful URL seen, before threshold filtering
    pub url_stats: HashMap<String, UrlWasteStat>,
    /// Crawler requests per status code
    pub status_codes: BTreeMap<u16, u64>,
    /// Crawler requests per hour of day, in the log's own offset
    pub hourly_activity: [u64; 24],
    /// URLs at or above the minimum crawl count, most crawled first
    pub top_waste_urls: Vec<UrlWasteStat>,
    /// Findings for this file, most urgent first
    pub recommendations: Vec<Recommendation>,
    /// Lines dropped or degraded during the scan
    pub skipped: SkipStats,
}

impl FileAnalysis {
    /// An analysis with every counter at zero.
    pub fn empty(source: PathBuf) -> Self {
        FileAnalysis {
            source,
            total_requests: 0,
            bot_requests: 0,
            crawl_waste: WasteTag::iter().map(|tag| (tag, 0)).collect(),
            url_stats: HashMap::new(),
            status_codes: BTreeMap::new(),
            hourly_activity: [0; 24],
            top_waste_urls: Vec::new(),
            recommendations: Vec::new(),
            skipped: SkipStats::new(),
        }
    }

    /// Crawler requests that matched `tag`.
    pub fn waste_count(&self, tag: WasteTag) -> u64 {
        self.crawl_waste.get(&tag).copied().unwrap_or(0)
    }

    /// Crawler requests answered with `status`.
    pub fn status_count(&self, status: u16) -> u64 {
        self.status_codes.get(&status).copied().unwrap_or(0)
    }
}

/// Everything a file scan needs, compiled once per analysis run.
#[derive(Debug, Clone)]
pub struct ScanContext {
    /// Crawler detection
    pub bots: BotClassifier,
    /// Waste pattern table
    pub waste: WasteClassifier,
    /// Lines strictly older than this are ignored
    pub cutoff: DateTime<Utc>,
    /// Minimum crawl count for a URL to be surfaced
    pub min_crawl_count: u64,
    /// URLs kept per file
    pub top_urls: usize,
    /// Recommendation thresholds
    pub thresholds: Thresholds,
}

impl ScanContext {
    /// Compiles the classifiers and computes the cutoff from `now`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a waste pattern does not compile.
    pub fn from_config(config: &Config, now: DateTime<Utc>) -> Result<Self, ConfigError> {
        Ok(ScanContext {
            bots: BotClassifier::new(&config.bot_agents),
            waste: WasteClassifier::from_table(&config.waste_patterns)?,
            cutoff: now - Duration::days(i64::from(config.window_days)),
            min_crawl_count: config.min_crawl_count,
            top_urls: config.top_urls_per_file,
            thresholds: config.thresholds.clone(),
        })
    }
}

/// Folds log lines into a [`FileAnalysis`].
///
/// Pure in-memory state machine; [`analyze_file`] feeds it from disk.
pub struct FileAggregator<'a> {
    ctx: &'a ScanContext,
    analysis: FileAnalysis,
}

impl<'a> FileAggregator<'a> {
    /// Starts an empty aggregation for `source`.
    pub fn new(ctx: &'a ScanContext, source: PathBuf) -> Self {
        FileAggregator {
            ctx,
            analysis: FileAnalysis::empty(source),
        }
    }

    /// Parses and folds one raw line. Unparseable lines are counted and dropped.
    pub fn fold_line(&mut self, line: &str) {
        match parse_line(line) {
            Some(record) => self.fold_record(&record),
            None => self.analysis.skipped.increment(SkipReason::Unparseable),
        }
    }

    /// Counts a line that was dropped before parsing.
    pub fn skip_line(&mut self, reason: SkipReason) {
        self.analysis.skipped.increment(reason);
    }

    /// Folds one parsed request.
    pub fn fold_record(&mut self, record: &RequestRecord) {
        if record.timestamp.with_timezone(&Utc) < self.ctx.cutoff {
            self.analysis.skipped.increment(SkipReason::OutsideWindow);
            return;
        }
        if !record.path_decoded {
            self.analysis.skipped.increment(SkipReason::UndecodablePath);
        }

        self.analysis.total_requests += 1;
        if !self.ctx.bots.is_bot(&record.user_agent) {
            return;
        }

        self.analysis.bot_requests += 1;
        *self.analysis.status_codes.entry(record.status).or_insert(0) += 1;
        self.analysis.hourly_activity[record.timestamp.hour() as usize] += 1;

        let tags = self.ctx.waste.classify(&record.path);
        if tags.is_empty() {
            return;
        }
        for tag in &tags {
            *self.analysis.crawl_waste.entry(*tag).or_insert(0) += 1;
        }

        let stat = self
            .analysis
            .url_stats
            .entry(record.path.clone())
            .or_insert_with(|| UrlWasteStat {
                url: record.path.clone(),
                crawl_count: 0,
                patterns: BTreeSet::new(),
                last_crawled: record.timestamp,
                status_codes: BTreeMap::new(),
            });
        stat.crawl_count += 1;
        stat.patterns.extend(tags);
        stat.last_crawled = stat.last_crawled.max(record.timestamp);
        *stat.status_codes.entry(record.status).or_insert(0) += 1;
    }

    /// Ranks the wasteful URLs and attaches recommendations.
    pub fn finish(self) -> FileAnalysis {
        let ctx = self.ctx;
        let mut analysis = self.analysis;

        let mut top: Vec<UrlWasteStat> = analysis
            .url_stats
            .values()
            .filter(|stat| stat.crawl_count >= ctx.min_crawl_count)
            .cloned()
            .collect();
        rank_urls(&mut top);
        top.truncate(ctx.top_urls);
        analysis.top_waste_urls = top;

        analysis.recommendations = generate_recommendations(&analysis, &ctx.thresholds);
        analysis
    }
}

/// Sorts by crawl count descending, then URL for a deterministic order.
pub(crate) fn rank_urls(urls: &mut [UrlWasteStat]) {
    urls.sort_by(|a, b| {
        b.crawl_count
            .cmp(&a.crawl_count)
            .then_with(|| a.url.cmp(&b.url))
    });
}

/// Scans one log file.
///
/// Missing files, I/O errors and cancellation are logged and produce `None`;
/// they never abort a multi-file analysis.
pub async fn analyze_file(
    path: &Path,
    ctx: &ScanContext,
    cancel: &CancellationToken,
) -> Option<FileAnalysis> {
    match tokio::fs::try_exists(path).await {
        Ok(true) => {}
        Ok(false) => {
            warn!("Log file not found, skipping: {}", path.display());
            return None;
        }
        Err(e) => {
            warn!("Cannot access log file {}: {}", path.display(), e);
            return None;
        }
    }

    let started = std::time::Instant::now();
    match scan_file(path, ctx, cancel).await {
        Ok(analysis) => {
            info!(
                "Analyzed {}: {} requests, {} from crawlers, {} wasteful URLs in {:.2}s",
                path.display(),
                analysis.total_requests,
                analysis.bot_requests,
                analysis.url_stats.len(),
                started.elapsed().as_secs_f64()
            );
            analysis.skipped.log_summary(&path.display().to_string());
            Some(analysis)
        }
        Err(e) => {
            warn!("{}", e);
            None
        }
    }
}

async fn scan_file(
    path: &Path,
    ctx: &ScanContext,
    cancel: &CancellationToken,
) -> Result<FileAnalysis, ScanError> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|source| ScanError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    let mut reader = BufReader::new(file);
    let mut aggregator = FileAggregator::new(ctx, path.to_path_buf());

    // read raw bytes so binary junk in the log does not end the scan
    let mut buf = Vec::with_capacity(512);
    let mut lines = 0u64;
    loop {
        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled {
                path: path.to_path_buf(),
                lines,
            });
        }
        buf.clear();
        let (read, truncated) = read_line_capped(&mut reader, &mut buf, MAX_LOG_LINE_BYTES)
            .await
            .map_err(|source| ScanError::Read {
                path: path.to_path_buf(),
                line: lines + 1,
                source,
            })?;
        if read == 0 {
            break;
        }
        lines += 1;
        if truncated {
            debug!(
                "Line {} of {} is {} bytes, over the {} byte limit",
                lines,
                path.display(),
                read,
                MAX_LOG_LINE_BYTES
            );
            aggregator.skip_line(SkipReason::Unparseable);
            continue;
        }
        aggregator.fold_line(&String::from_utf8_lossy(&buf));
    }

    debug!("Read {} lines from {}", lines, path.display());
    Ok(aggregator.finish())
}

/// Reads one line like `read_until(b'\n')`, keeping at most `max` bytes.
///
/// Bytes past `max` are consumed and discarded up to the newline. Returns the
/// bytes consumed and whether the line was cut.
async fn read_line_capped<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    max: usize,
) -> std::io::Result<(usize, bool)> {
    let mut read = 0;
    let mut truncated = false;
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            break;
        }
        let (used, done) = match available.iter().position(|b| *b == b'\n') {
            Some(i) => (i + 1, true),
            None => (available.len(), false),
        };
        let keep = used.min(max.saturating_sub(buf.len()));
        buf.extend_from_slice(&available[..keep]);
        truncated |= keep < used;
        reader.consume(used);
        read += used;
        if done {
            break;
        }
    }
    Ok((read, truncated))
}
