//! End-to-end analysis over real files on disk.

mod helpers;

use chrono::Duration;
use crawl_budget::{
    analyze_logs_at, render_robots_rules, Config, Priority, RecommendationKind, SkipReason,
    WasteTag,
};
use helpers::{bot_hits, log_line, now, write_log, BROWSER, GOOGLEBOT, GOOGLEBOT_IMAGE};
use std::path::PathBuf;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn config(paths: Vec<PathBuf>) -> Config {
    Config {
        log_paths: paths,
        ..Default::default()
    }
}

async fn analyze(config: &Config) -> crawl_budget::AnalysisReport {
    analyze_logs_at(config, now(), &CancellationToken::new())
        .await
        .expect("analysis should succeed")
}

#[tokio::test]
async fn test_search_pages_at_threshold_has_no_recommendation() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "access.log", &bot_hits("/search?q=shoes", 15));

    let report = analyze(&config(vec![path])).await;
    let total = &report.total_analysis;
    assert_eq!(report.files_analyzed, 1);
    assert_eq!(total.crawl_waste[&WasteTag::SearchPages], 15);
    assert!(total.recommendations.is_empty());
}

#[tokio::test]
async fn test_search_pages_above_threshold_recommends_robots_rule() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "access.log", &bot_hits("/search?q=shoes", 16));

    let report = analyze(&config(vec![path])).await;
    let total = &report.total_analysis;
    assert_eq!(total.crawl_waste[&WasteTag::SearchPages], 16);
    assert_eq!(total.recommendations.len(), 1);
    let rec = &total.recommendations[0];
    assert_eq!(rec.kind, RecommendationKind::RobotsTxt);
    assert_eq!(rec.priority, Priority::Medium);
    assert_eq!(rec.issue, "Internal search pages crawled");
    assert!(rec.robots_rule.as_ref().is_some_and(|r| !r.is_empty()));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["totalAnalysis"]["crawlWaste"]["searchPages"], 16);
    assert_eq!(json["totalAnalysis"]["recommendations"][0]["type"], "robots_txt");
}

#[tokio::test]
async fn test_url_below_min_crawl_count_counts_but_is_not_listed() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "access.log", &bot_hits("/tag/red-shoes", 4));

    let report = analyze(&config(vec![path])).await;
    let total = &report.total_analysis;
    assert_eq!(total.crawl_waste[&WasteTag::TagPages], 4);
    assert!(total.top_waste_urls.is_empty());
}

#[tokio::test]
async fn test_url_at_min_crawl_count_is_listed() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "access.log", &bot_hits("/tag/red-shoes", 5));

    let report = analyze(&config(vec![path])).await;
    let top = &report.total_analysis.top_waste_urls;
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].url, "/tag/red-shoes");
    assert_eq!(top[0].crawl_count, 5);
}

#[tokio::test]
async fn test_only_crawler_traffic_is_classified() {
    let dir = TempDir::new().unwrap();
    let lines = vec![
        log_line("/tag/a", 200, GOOGLEBOT_IMAGE, Duration::hours(1)),
        log_line("/tag/a", 200, BROWSER, Duration::hours(1)),
    ];
    let path = write_log(&dir, "access.log", &lines);

    let report = analyze(&config(vec![path])).await;
    let total = &report.total_analysis;
    assert_eq!(total.total_requests, 2);
    assert_eq!(total.bot_requests, 1);
    assert_eq!(total.crawl_waste[&WasteTag::TagPages], 1);
    assert_eq!(total.status_codes[&200], 1);
}

#[tokio::test]
async fn test_clean_traffic_renders_no_robots_rules() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "access.log", &bot_hits("/products/shoes", 50));

    let report = analyze(&config(vec![path])).await;
    let total = &report.total_analysis;
    assert_eq!(total.bot_requests, 50);
    assert_eq!(total.summary.total_waste, 0);
    assert_eq!(total.summary.top_waste_pattern, "none");
    assert_eq!(render_robots_rules(total), "");
}

#[tokio::test]
async fn test_lines_outside_window_are_skipped() {
    let dir = TempDir::new().unwrap();
    let lines = vec![
        log_line("/tag/a", 200, GOOGLEBOT, Duration::days(40)),
        log_line("/tag/a", 200, GOOGLEBOT, Duration::days(29)),
    ];
    let path = write_log(&dir, "access.log", &lines);

    let report = analyze(&config(vec![path])).await;
    let total = &report.total_analysis;
    assert_eq!(total.total_requests, 1);
    assert_eq!(total.lines_skipped[&SkipReason::OutsideWindow], 1);
}

#[tokio::test]
async fn test_malformed_lines_are_counted_not_fatal() {
    let dir = TempDir::new().unwrap();
    let mut lines = bot_hits("/", 3);
    lines.push("this is not an access log line".to_string());
    lines.push(String::new());
    let path = write_log(&dir, "access.log", &lines);

    let report = analyze(&config(vec![path])).await;
    let total = &report.total_analysis;
    assert_eq!(total.total_requests, 3);
    assert!(total.lines_skipped[&SkipReason::Unparseable] >= 1);
}

#[tokio::test]
async fn test_empty_file_has_zero_percentage() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.log");
    std::fs::write(&path, "").unwrap();

    let report = analyze(&config(vec![path])).await;
    assert_eq!(report.files_analyzed, 1);
    assert_eq!(report.total_analysis.bot_requests, 0);
    assert_eq!(report.total_analysis.summary.waste_percentage, 0.0);
}

#[tokio::test]
async fn test_missing_files_yield_empty_report() {
    let dir = TempDir::new().unwrap();
    let report = analyze(&config(vec![dir.path().join("nope.log")])).await;
    assert_eq!(report.files_analyzed, 0);
    assert_eq!(report.total_analysis.total_requests, 0);
    assert!(report.total_analysis.recommendations.is_empty());

    let report = analyze(&config(vec![])).await;
    assert_eq!(report.files_analyzed, 0);
}

#[tokio::test]
async fn test_unreadable_file_does_not_stop_other_files() {
    let dir = TempDir::new().unwrap();
    // opens fine but fails on the first read
    let subdir = dir.path().join("rotated");
    std::fs::create_dir(&subdir).unwrap();
    let good = write_log(&dir, "a.log", &bot_hits("/tag/a", 5));

    let report = analyze(&config(vec![subdir, good])).await;
    let total = &report.total_analysis;
    assert_eq!(report.files_analyzed, 1);
    assert_eq!(total.bot_requests, 5);
    assert_eq!(total.crawl_waste[&WasteTag::TagPages], 5);
    assert_eq!(total.top_waste_urls.len(), 1);
}

#[tokio::test]
async fn test_same_finding_in_two_files_is_reported_once() {
    let dir = TempDir::new().unwrap();
    let a = write_log(&dir, "a.log", &bot_hits("/search?q=a", 20));
    let b = write_log(&dir, "b.log", &bot_hits("/search?q=b", 20));

    let report = analyze(&config(vec![a, b])).await;
    let total = &report.total_analysis;
    assert_eq!(report.files_analyzed, 2);
    assert_eq!(total.crawl_waste[&WasteTag::SearchPages], 40);
    assert_eq!(total.recommendations.len(), 1);
    assert_eq!(total.summary.recommendation_count, 1);
    assert_eq!(total.top_waste_urls.len(), 2);
}

#[tokio::test]
async fn test_duplicate_paths_are_scanned_once() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "access.log", &bot_hits("/tag/a", 5));

    let report = analyze(&config(vec![path.clone(), path])).await;
    assert_eq!(report.files_analyzed, 1);
    assert_eq!(report.total_analysis.bot_requests, 5);
}

#[tokio::test]
async fn test_analysis_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let mut lines = bot_hits("/search?q=x&sort=price&color=red", 12);
    lines.extend(bot_hits("/blog/2015/05/post", 7));
    let path = write_log(&dir, "access.log", &lines);
    let cfg = config(vec![path]);

    let first = analyze(&cfg).await;
    let second = analyze(&cfg).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_parallel_scan_matches_sequential() {
    let dir = TempDir::new().unwrap();
    let paths: Vec<PathBuf> = (0..4)
        .map(|i| {
            let mut lines = bot_hits(&format!("/search?q={}", i), 10 + i);
            lines.extend(bot_hits(&format!("/page/{}", 6 + i), 4));
            write_log(&dir, &format!("{}.log", i), &lines)
        })
        .collect();

    let sequential = analyze(&config(paths.clone())).await;
    let parallel = analyze(&Config {
        max_parallel_files: 4,
        ..config(paths)
    })
    .await;
    assert_eq!(sequential.total_analysis, parallel.total_analysis);
}

#[tokio::test]
async fn test_cancelled_analysis_merges_nothing() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "access.log", &bot_hits("/tag/a", 5));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = analyze_logs_at(&config(vec![path]), now(), &cancel)
        .await
        .unwrap();
    assert_eq!(report.files_analyzed, 0);
}

#[tokio::test]
async fn test_invalid_config_is_an_error() {
    let cfg = Config {
        max_parallel_files: 0,
        ..Default::default()
    };
    assert!(analyze_logs_at(&cfg, now(), &CancellationToken::new())
        .await
        .is_err());
}
