//! Sorting statistics derived from the bin counters.

use serde::Serialize;
use serde_json::Value;

use crate::normalizer::count_field;

/// Wet/dry totals and their shares, computed on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub wet_count: u64,
    pub dry_count: u64,
    pub total_count: u64,
    /// Share of wet items, percent, one decimal place.
    pub wet_percentage: f64,
    /// Share of dry items, percent, one decimal place.
    pub dry_percentage: f64,
}

impl Statistics {
    /// All-zero statistics.
    pub fn empty() -> Self {
        Self::from_counts(0, 0)
    }

    pub fn from_counts(wet: u64, dry: u64) -> Self {
        let total = wet.saturating_add(dry);
        Self {
            wet_count: wet,
            dry_count: dry,
            total_count: total,
            wet_percentage: percentage(wet, total),
            dry_percentage: percentage(dry, total),
        }
    }

    /// Compute from a raw `bin` subtree. Non-object input counts as empty.
    pub fn from_bin(bin: &Value) -> Self {
        match bin.as_object() {
            Some(obj) => Self::from_counts(count_field(obj, "wetCount"), count_field(obj, "dryCount")),
            None => Self::empty(),
        }
    }
}

/// Percent with one decimal place. Rounds the exact binary value half to
/// even, so an exact tie such as 6.25 gives 6.2.
fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let value = part as f64 / total as f64 * 100.0;
    format!("{value:.1}").parse().unwrap_or(value)
}
