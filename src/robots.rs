//! robots.txt rule rendering.
//!
//! Pure formatting over merged recommendations; no thresholds are applied
//! here.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::report::{AnalysisReport, TotalAnalysis};

/// Renders the exclusion rules carried by the recommendations.
///
/// Each recommendation with a robots rule becomes a `# issue` comment followed
/// by its rule lines; blocks are separated by a blank line and keep the
/// recommendations' order. Returns an empty string when no recommendation
/// carries a rule.
pub fn render_robots_rules(total: &TotalAnalysis) -> String {
    total
        .recommendations
        .iter()
        .filter_map(|rec| {
            let rules = rec.robots_rule.as_ref().filter(|rules| !rules.is_empty())?;
            Some(format!("# {}\n{}", rec.issue, rules.join("\n")))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Header comment block placed above the rendered rules.
pub fn robots_header(report: &AnalysisReport, generated_at: DateTime<Utc>) -> String {
    format!(
        "# Crawl budget optimization rules\n\
         # Generated: {}\n\
         # Based on {} crawler requests across {} log file(s)\n\
         User-agent: *\n",
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        report.total_analysis.bot_requests,
        report.files_analyzed
    )
}

/// Complete robots.txt fragment: header plus rules.
pub fn render_robots_file(report: &AnalysisReport, generated_at: DateTime<Utc>) -> String {
    let header = robots_header(report, generated_at);
    let rules = render_robots_rules(&report.total_analysis);
    if rules.is_empty() {
        header
    } else {
        format!("{}\n{}\n", header, rules)
    }
}

/// JSON envelope for the rendered rules.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotsRules {
    /// When the rules were generated
    pub generated: DateTime<Utc>,
    /// Crawler requests the rules are based on
    pub bot_requests: u64,
    /// Files the rules are based on
    pub files_analyzed: usize,
    /// Number of recommendations that contributed rules
    pub rule_count: usize,
    /// Full robots.txt fragment, header included
    pub robots_txt: String,
}

impl RobotsRules {
    /// Builds the envelope from a report.
    pub fn from_report(report: &AnalysisReport, generated_at: DateTime<Utc>) -> Self {
        RobotsRules {
            generated: generated_at,
            bot_requests: report.total_analysis.bot_requests,
            files_analyzed: report.files_analyzed,
            rule_count: report
                .total_analysis
                .recommendations
                .iter()
                .filter(|r| r.robots_rule.as_ref().is_some_and(|rules| !rules.is_empty()))
                .count(),
            robots_txt: render_robots_file(report, generated_at),
        }
    }
}
