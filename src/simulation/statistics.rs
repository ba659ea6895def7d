//! Aggregation of trial records into the public statistics.
//!
//! [`StatsResult`] is the engine's output contract: raw numeric values only —
//! percentages as 0–100 floats, counts as expectations — with all display
//! rounding left to the consumer.

use std::collections::BTreeMap;

use serde::Serialize;

use super::engine::TrialRecord;

/// The engine's public output. `success_rate` and `expected_copies` come from
/// the Monte-Carlo trials; `worst_case`, `missing_pulls`, and the 4★ counts
/// come from the analytic path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsResult {
    /// Probability (0–100) of reaching the target copy count within budget.
    pub success_rate: f64,
    /// Mean featured copies obtained within budget.
    pub expected_copies: f64,
    /// Expected additional pulls beyond the budget needed to reach the
    /// target; 0 when the mean case already reaches it.
    pub missing_pulls: f64,
    /// Pulls that mechanically guarantee the target, independent of budget.
    pub worst_case: u32,
    /// Expected 4★ hits within budget (analytic).
    pub four_star_count: f64,
    /// Expected rate-up 4★ hits within budget (analytic).
    pub featured_four_star_count: f64,
}

/// One bin of the featured-copy distribution across trials.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CopiesBin {
    pub copies: u32,
    pub probability: f64,
}

/// Monte-Carlo aggregate over one batch of trials.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialAggregate {
    /// Percentage (0–100) of trials that reached the target.
    pub success_rate: f64,
    /// Mean featured copies across trials.
    pub expected_copies: f64,
    /// Sparse distribution of featured copies, ascending.
    pub copies_distribution: Vec<CopiesBin>,
}

/// Reduce a batch of trial records against a target copy count.
pub fn aggregate_trials(records: &[TrialRecord], target_copies: u32) -> TrialAggregate {
    let trials = records.len();
    let mut successes = 0usize;
    let mut copies_sum = 0u64;
    let mut histogram: BTreeMap<u32, u32> = BTreeMap::new();

    for record in records {
        let copies = record.featured_five_stars;
        if copies >= target_copies {
            successes += 1;
        }
        copies_sum += copies as u64;
        *histogram.entry(copies).or_insert(0) += 1;
    }

    let copies_distribution = histogram
        .into_iter()
        .map(|(copies, count)| CopiesBin {
            copies,
            probability: count as f64 / trials as f64,
        })
        .collect();

    TrialAggregate {
        success_rate: 100.0 * successes as f64 / trials as f64,
        expected_copies: copies_sum as f64 / trials as f64,
        copies_distribution,
    }
}

/// Write any serializable statistics value as pretty-printed JSON.
pub fn save_statistics<T: Serialize>(stats: &T, path: &str) -> std::io::Result<()> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(stats).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}
