//! Public entry point: turn (pity, rates, target, budget) into statistics.
//!
//! `evaluate` is the hybrid described in the crate docs — analytic where the
//! pity ramp permits (worst case, byproduct 4★ expectations, the
//! pulls-per-copy figure behind `missing_pulls`), Monte-Carlo where the
//! 50/50-with-guarantee coupling makes a closed form intractable
//! (`success_rate`, `expected_copies`).
//!
//! Every call owns a private copy of the pity state and an independent,
//! caller-seeded random stream; nothing is shared across calls and nothing is
//! persisted. Input validation is eager: a bad rate model or an out-of-range
//! request is a rejected call, never a garbage result.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::analytic::{expected_reward_counts, mean_pulls_per_copy, worst_case_pulls};
use crate::pity::PityState;
use crate::rates::{RateModel, RateModelError};
use crate::simulation::{aggregate_trials, batch_pulls_to_target, simulate_batch, CopiesBin, StatsResult};

/// Hard cap on the pull budget, bounding simulation cost per call.
pub const MAX_PULL_BUDGET: u32 = 2000;
/// Hard cap on the trial count.
pub const MAX_TRIALS: u32 = 1_000_000;
/// Default trial count: small enough for interactive latency, large enough
/// that the success-rate standard error stays under a percentage point.
pub const DEFAULT_TRIALS: u32 = 5_000;

/// Rejected call. Raised before any simulation work happens.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvaluateError {
    #[error("target copies must be at least 1")]
    ZeroTarget,
    #[error("pull budget {0} exceeds the maximum of {MAX_PULL_BUDGET}")]
    BudgetOverCap(u32),
    #[error("trial count must be at least 1")]
    ZeroTrials,
    #[error("trial count {0} exceeds the maximum of {MAX_TRIALS}")]
    TrialsOverCap(u32),
    #[error("budget step must be at least 1")]
    ZeroStep,
    #[error("pulls since 5-star ({pulls}) must be below the hard pity ({hard_pity})")]
    FiveStarPityOutOfRange { pulls: u32, hard_pity: u32 },
    #[error("pulls since 4-star ({pulls}) must be below the 4-star hard pity ({hard_pity})")]
    FourStarPityOutOfRange { pulls: u32, hard_pity: u32 },
    #[error(transparent)]
    Rates(#[from] RateModelError),
}

fn validate_request(
    initial: &PityState,
    rate: &RateModel,
    target_copies: u32,
    pull_budget: u32,
    trials: u32,
) -> Result<(), EvaluateError> {
    rate.validate()?;
    if target_copies == 0 {
        return Err(EvaluateError::ZeroTarget);
    }
    if pull_budget > MAX_PULL_BUDGET {
        return Err(EvaluateError::BudgetOverCap(pull_budget));
    }
    if trials == 0 {
        return Err(EvaluateError::ZeroTrials);
    }
    if trials > MAX_TRIALS {
        return Err(EvaluateError::TrialsOverCap(trials));
    }
    if initial.pulls_since_five_star >= rate.hard_pity {
        return Err(EvaluateError::FiveStarPityOutOfRange {
            pulls: initial.pulls_since_five_star,
            hard_pity: rate.hard_pity,
        });
    }
    if initial.pulls_since_four_star >= rate.hard_pity_four_star {
        return Err(EvaluateError::FourStarPityOutOfRange {
            pulls: initial.pulls_since_four_star,
            hard_pity: rate.hard_pity_four_star,
        });
    }
    Ok(())
}

/// Evaluate the chance of pulling `target_copies` featured copies within
/// `pull_budget` pulls, starting from `initial`.
///
/// Deterministic for a fixed `seed`: the analytic fields are bit-identical
/// across runs regardless of `trials`, and the Monte-Carlo fields reproduce
/// exactly for the same `(trials, seed)` pair. A zero budget is a valid
/// degenerate request — it reports 0 success and 0 copies, with `worst_case`
/// unchanged (it does not depend on the budget).
pub fn evaluate(
    initial: &PityState,
    rate: &RateModel,
    target_copies: u32,
    pull_budget: u32,
    trials: u32,
    seed: u64,
) -> Result<StatsResult, EvaluateError> {
    evaluate_report(initial, rate, target_copies, pull_budget, trials, seed)
        .map(|report| report.stats)
}

/// [`evaluate`] plus the featured-copy distribution across trials, for
/// consumers that want the full histogram rather than the summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub target_copies: u32,
    pub pull_budget: u32,
    pub trials: u32,
    pub seed: u64,
    pub stats: StatsResult,
    pub copies_distribution: Vec<CopiesBin>,
}

/// Like [`evaluate`], returning the histogram alongside the statistics. The
/// same `(trials, seed)` pair yields the same numbers in both entry points.
pub fn evaluate_report(
    initial: &PityState,
    rate: &RateModel,
    target_copies: u32,
    pull_budget: u32,
    trials: u32,
    seed: u64,
) -> Result<EvaluationReport, EvaluateError> {
    validate_request(initial, rate, target_copies, pull_budget, trials)?;

    let worst_case = worst_case_pulls(initial, rate, target_copies);
    let counts = expected_reward_counts(initial, rate, pull_budget);
    let records = simulate_batch(initial, rate, pull_budget, trials, seed);
    let aggregate = aggregate_trials(&records, target_copies);

    let shortfall = target_copies as f64 - aggregate.expected_copies;
    let missing_pulls = if shortfall > 0.0 {
        shortfall * mean_pulls_per_copy(rate)
    } else {
        0.0
    };

    debug!(
        target_copies,
        pull_budget,
        trials,
        success_rate = aggregate.success_rate,
        worst_case,
        "evaluated"
    );

    Ok(EvaluationReport {
        target_copies,
        pull_budget,
        trials,
        seed,
        stats: StatsResult {
            success_rate: aggregate.success_rate,
            expected_copies: aggregate.expected_copies,
            missing_pulls,
            worst_case,
            four_star_count: counts.four_stars,
            featured_four_star_count: counts.featured_four_stars,
        },
        copies_distribution: aggregate.copies_distribution,
    })
}

/// One point of the success-rate-vs-budget curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepPoint {
    pub pull_budget: u32,
    pub success_rate: f64,
}

/// Success rate at every budget `0, step, 2·step, … ≤ max_budget`.
///
/// Each trial is simulated once to `max_budget`, recording the pull index at
/// which the target landed; the curve is the empirical CDF of those indices,
/// so it is non-decreasing by construction and every point shares the same
/// trial set.
pub fn success_curve(
    initial: &PityState,
    rate: &RateModel,
    target_copies: u32,
    max_budget: u32,
    step: u32,
    trials: u32,
    seed: u64,
) -> Result<Vec<SweepPoint>, EvaluateError> {
    validate_request(initial, rate, target_copies, max_budget, trials)?;
    if step == 0 {
        return Err(EvaluateError::ZeroStep);
    }

    let hits = batch_pulls_to_target(initial, rate, target_copies, max_budget, trials, seed);
    let mut hit_pulls: Vec<u32> = hits.into_iter().flatten().collect();
    hit_pulls.sort_unstable();

    let curve = (0..=max_budget)
        .step_by(step as usize)
        .map(|budget| {
            let reached = hit_pulls.partition_point(|&pull| pull <= budget);
            SweepPoint {
                pull_budget: budget,
                success_rate: 100.0 * reached as f64 / trials as f64,
            }
        })
        .collect();
    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate() -> RateModel {
        RateModel::character()
    }

    #[test]
    fn rejects_out_of_range_requests() {
        let state = PityState::default();
        let r = rate();
        assert_eq!(
            evaluate(&state, &r, 0, 80, 100, 1).unwrap_err(),
            EvaluateError::ZeroTarget
        );
        assert_eq!(
            evaluate(&state, &r, 1, MAX_PULL_BUDGET + 1, 100, 1).unwrap_err(),
            EvaluateError::BudgetOverCap(MAX_PULL_BUDGET + 1)
        );
        assert_eq!(
            evaluate(&state, &r, 1, 80, 0, 1).unwrap_err(),
            EvaluateError::ZeroTrials
        );
        assert_eq!(
            evaluate(&state, &r, 1, 80, MAX_TRIALS + 1, 1).unwrap_err(),
            EvaluateError::TrialsOverCap(MAX_TRIALS + 1)
        );
    }

    #[test]
    fn rejects_pity_beyond_the_ceiling() {
        let r = rate();
        let err = evaluate(&PityState::new(r.hard_pity, 0, false), &r, 1, 80, 100, 1).unwrap_err();
        assert!(matches!(err, EvaluateError::FiveStarPityOutOfRange { .. }));

        let err = evaluate(
            &PityState::new(0, r.hard_pity_four_star, false),
            &r,
            1,
            80,
            100,
            1,
        )
        .unwrap_err();
        assert!(matches!(err, EvaluateError::FourStarPityOutOfRange { .. }));
    }

    #[test]
    fn rejects_invalid_rate_model() {
        let mut r = rate();
        r.soft_pity_start = r.hard_pity;
        let err = evaluate(&PityState::default(), &r, 1, 80, 100, 1).unwrap_err();
        assert!(matches!(err, EvaluateError::Rates(_)));
    }

    #[test]
    fn zero_budget_is_a_valid_degenerate_request() {
        let result = evaluate(&PityState::default(), &rate(), 1, 0, 500, 42).unwrap();
        assert_eq!(result.success_rate, 0.0);
        assert_eq!(result.expected_copies, 0.0);
        assert_eq!(result.four_star_count, 0.0);
        assert_eq!(result.featured_four_star_count, 0.0);
        assert!(result.missing_pulls > 0.0);
        assert_eq!(result.worst_case, 160);
    }

    #[test]
    fn report_matches_evaluate() {
        let state = PityState::new(20, 3, false);
        let r = rate();
        let stats = evaluate(&state, &r, 1, 120, 400, 7).unwrap();
        let report = evaluate_report(&state, &r, 1, 120, 400, 7).unwrap();
        assert_eq!(report.stats, stats);
        let total: f64 = report
            .copies_distribution
            .iter()
            .map(|b| b.probability)
            .sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn curve_is_monotone_and_anchored_at_zero() {
        let curve = success_curve(&PityState::default(), &rate(), 1, 400, 20, 500, 11).unwrap();
        assert_eq!(curve[0].pull_budget, 0);
        assert_eq!(curve[0].success_rate, 0.0);
        for pair in curve.windows(2) {
            assert!(pair[1].success_rate >= pair[0].success_rate);
        }
        // 400 pulls is far beyond the 160-pull worst case for one copy.
        assert_eq!(curve.last().unwrap().success_rate, 100.0);
    }

    #[test]
    fn curve_rejects_zero_step() {
        let err = success_curve(&PityState::default(), &rate(), 1, 100, 0, 100, 1).unwrap_err();
        assert_eq!(err, EvaluateError::ZeroStep);
    }
}
