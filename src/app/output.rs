//! Report and robots.txt output.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::config::OutputFormat;
use crate::robots::{render_robots_file, RobotsRules};
use crate::AnalysisReport;

/// Writes the analysis report as a text summary or a JSON document.
pub fn write_report<W: Write>(
    out: &mut W,
    report: &AnalysisReport,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)
                .context("Failed to serialize report")?;
            writeln!(out)?;
        }
        OutputFormat::Text => write_report_text(out, report)?,
    }
    Ok(())
}

/// Writes the robots.txt fragment as plain text or wrapped in a JSON envelope.
pub fn write_robots<W: Write>(
    out: &mut W,
    report: &AnalysisReport,
    format: OutputFormat,
    generated_at: DateTime<Utc>,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let envelope = RobotsRules::from_report(report, generated_at);
            serde_json::to_writer_pretty(&mut *out, &envelope)
                .context("Failed to serialize robots rules")?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            out.write_all(render_robots_file(report, generated_at).as_bytes())?;
        }
    }
    Ok(())
}

fn write_report_text<W: Write>(out: &mut W, report: &AnalysisReport) -> Result<()> {
    let total = &report.total_analysis;

    writeln!(
        out,
        "Crawl budget analysis ({})",
        report.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
    )?;
    if report.files_analyzed == 0 {
        writeln!(
            out,
            "No access logs found to analyze. Configure --log-path or CRAWL_LOG_PATHS."
        )?;
        return Ok(());
    }

    writeln!(out, "Files analyzed: {}", report.files_analyzed)?;
    writeln!(
        out,
        "Requests: {} total, {} from crawlers",
        total.total_requests, total.bot_requests
    )?;
    writeln!(
        out,
        "Crawl waste: {} ({:.2}% of crawler requests), top pattern: {}",
        total.summary.total_waste, total.summary.waste_percentage, total.summary.top_waste_pattern
    )?;

    let mut waste: Vec<_> = total.crawl_waste.iter().filter(|(_, c)| **c > 0).collect();
    if !waste.is_empty() {
        waste.sort_by(|a, b| b.1.cmp(a.1));
        writeln!(out, "\nWaste by pattern:")?;
        for (tag, count) in waste {
            writeln!(out, "  {:<16} {}", tag.as_ref(), count)?;
        }
    }

    if !total.top_waste_urls.is_empty() {
        writeln!(out, "\nTop wasteful URLs:")?;
        for stat in &total.top_waste_urls {
            let tags: Vec<&str> = stat.patterns.iter().map(|t| t.as_ref()).collect();
            writeln!(
                out,
                "  {:>6}  {}  [{}]",
                stat.crawl_count,
                stat.url,
                tags.join(", ")
            )?;
        }
    }

    if total.recommendations.is_empty() {
        writeln!(out, "\nNo recommendations.")?;
    } else {
        writeln!(out, "\nRecommendations ({}):", total.summary.recommendation_count)?;
        for rec in &total.recommendations {
            writeln!(out, "  [{}] {} ({})", rec.priority, rec.issue, rec.kind)?;
            writeln!(out, "      {}", rec.description)?;
            writeln!(out, "      -> {}", rec.solution)?;
        }
    }
    Ok(())
}
