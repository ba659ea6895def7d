//! Monte-Carlo simulation and statistics.
//!
//! - [`engine`]: per-trial pull loops and the rayon-parallel batch driver
//! - [`statistics`]: aggregation of trial records into the public result

pub mod engine;
pub mod statistics;

pub use engine::{
    batch_pulls_to_target, pulls_to_target, simulate_batch, simulate_trial, TrialRecord,
};
pub use statistics::{
    aggregate_trials, save_statistics, CopiesBin, StatsResult, TrialAggregate,
};
