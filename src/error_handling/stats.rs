//! Skipped-line statistics.
//!
//! Counts the soft failures seen while scanning log files. None of them stop a
//! scan; they are summarised in the logs and in the report.

use std::collections::{BTreeMap, HashMap};
use strum::IntoEnumIterator;

use super::types::SkipReason;

/// Per-scan skipped line counters.
///
/// Every [`SkipReason`] is initialized to zero on creation. Owned by a single
/// file scan; merged into the report once the scan finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipStats {
    counts: HashMap<SkipReason, u64>,
}

impl Default for SkipStats {
    fn default() -> Self {
        Self::new()
    }
}

impl SkipStats {
    /// Creates a tracker with all counters at zero.
    pub fn new() -> Self {
        let counts = SkipReason::iter().map(|reason| (reason, 0)).collect();
        SkipStats { counts }
    }

    /// Increment a skip counter.
    pub fn increment(&mut self, reason: SkipReason) {
        if let Some(counter) = self.counts.get_mut(&reason) {
            *counter += 1;
        } else {
            log::error!(
                "Attempted to increment skip counter for {:?} which is not in the map. \
                 This indicates a bug in SkipStats initialization.",
                reason
            );
        }
    }

    /// Get the count for a skip reason.
    pub fn get(&self, reason: SkipReason) -> u64 {
        self.counts.get(&reason).copied().unwrap_or(0)
    }

    /// Total skipped or degraded lines across all reasons.
    pub fn total(&self) -> u64 {
        SkipReason::iter().map(|r| self.get(r)).sum()
    }

    /// Adds another tracker's counts into this one.
    pub fn merge(&mut self, other: &SkipStats) {
        for reason in SkipReason::iter() {
            *self.counts.entry(reason).or_insert(0) += other.get(reason);
        }
    }

    /// Ordered snapshot for serialization.
    pub fn to_map(&self) -> BTreeMap<SkipReason, u64> {
        SkipReason::iter().map(|r| (r, self.get(r))).collect()
    }

    /// Logs non-zero counters at debug level.
    pub fn log_summary(&self, source: &str) {
        if self.total() == 0 {
            return;
        }
        log::debug!("Skipped lines in {} ({} total):", source, self.total());
        for reason in SkipReason::iter() {
            let count = self.get(reason);
            if count > 0 {
                log::debug!("   {}: {}", reason.as_str(), count);
            }
        }
    }
}
