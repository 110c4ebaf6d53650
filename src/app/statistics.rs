//! Statistics logging.

use log::{info, warn};
use strum::IntoEnumIterator;

use crate::error_handling::SkipReason;
use crate::AnalysisReport;

/// Logs the headline numbers and skipped-line counts of a report.
pub fn print_report_summary(report: &AnalysisReport) {
    let total = &report.total_analysis;

    if report.files_analyzed == 0 {
        warn!("No log files could be analyzed; check the configured log paths");
        return;
    }

    info!(
        "Analyzed {} file{}: {} requests, {} from crawlers, {} wasteful ({:.2}%), top pattern: {}",
        report.files_analyzed,
        if report.files_analyzed == 1 { "" } else { "s" },
        total.total_requests,
        total.bot_requests,
        total.summary.total_waste,
        total.summary.waste_percentage,
        total.summary.top_waste_pattern
    );

    let skipped: u64 = total.lines_skipped.values().sum();
    if skipped > 0 {
        info!("Skipped line counts ({} total):", skipped);
        for reason in SkipReason::iter() {
            let count = total.lines_skipped.get(&reason).copied().unwrap_or(0);
            if count > 0 {
                info!("   {}: {}", reason.as_str(), count);
            }
        }
    }
}
