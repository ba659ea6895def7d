//! Exact/analytic path — everything the 50/50 does not couple.
//!
//! The pity process is Markov in the two counters, so quantities that ignore
//! the featured/standard split have closed answers without sampling:
//!
//! - [`expected_reward_counts`] propagates the exact joint distribution over
//!   (pulls-since-5★, pulls-since-4★) one pull at a time — at most
//!   `hard_pity × hard_pity_four_star` states — and accumulates the per-pull
//!   trigger probabilities. Expectation of a sum of indicators is the sum of
//!   their probabilities, so this is exact.
//! - [`pulls_per_five_star_distribution`] walks the first-hit distribution of
//!   the 5★ waiting time from zero pity.
//! - [`worst_case_pulls`] is the deterministic upper bound: hard-pity cycles
//!   with explicit guarantee bookkeeping, no randomness involved.
//!
//! The Monte-Carlo side lives in [`crate::simulation`]; keeping the two paths
//! separate is deliberate — the worst case is a hard mechanical bound, not a
//! sampled estimate.

use crate::pity::{five_star_chance, four_star_chance, PityState};
use crate::rates::RateModel;

/// Expected byproduct counts over a fixed budget, exact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpectedCounts {
    /// Expected total 5★ hits (featured or standard) within the budget.
    pub five_stars: f64,
    /// Expected total 4★ hits within the budget.
    pub four_stars: f64,
    /// Expected rate-up 4★ hits within the budget.
    pub featured_four_stars: f64,
}

/// Exact expected 5★/4★ counts over `pull_budget` pulls from `initial`.
///
/// Joint forward evolution: the state distribution starts as a point mass at
/// the caller's banked pity and is pushed through one transition per pull.
/// Caller guarantees the counters sit below their hard-pity ceilings
/// (enforced at the `evaluate` boundary).
pub fn expected_reward_counts(
    initial: &PityState,
    rate: &RateModel,
    pull_budget: u32,
) -> ExpectedCounts {
    let h5 = rate.hard_pity as usize;
    let h4 = rate.hard_pity_four_star as usize;
    let idx = |s5: usize, s4: usize| s5 * h4 + s4;

    let mut dist = vec![0.0f64; h5 * h4];
    dist[idx(
        initial.pulls_since_five_star as usize,
        initial.pulls_since_four_star as usize,
    )] = 1.0;

    let mut five_stars = 0.0;
    let mut four_stars = 0.0;

    for _ in 0..pull_budget {
        let mut next = vec![0.0f64; h5 * h4];
        for s5 in 0..h5 {
            let p5 = five_star_chance(rate, s5 as u32);
            for s4 in 0..h4 {
                let mass = dist[idx(s5, s4)];
                if mass == 0.0 {
                    continue;
                }
                let p4 = four_star_chance(rate, s4 as u32);

                five_stars += mass * p5;
                four_stars += mass * (1.0 - p5) * p4;

                // 5★ hit: 5★ counter resets; the 4★ counter resets or
                // saturates depending on the coupling flag.
                let s4_after_five = if rate.five_star_resets_four_star_pity {
                    0
                } else {
                    (s4 + 1).min(h4 - 1)
                };
                next[idx(0, s4_after_five)] += mass * p5;

                if p5 < 1.0 {
                    // 4★ hit: 4★ counter resets, 5★ counter still advances.
                    next[idx(s5 + 1, 0)] += mass * (1.0 - p5) * p4;
                    if p4 < 1.0 {
                        next[idx(s5 + 1, s4 + 1)] += mass * (1.0 - p5) * (1.0 - p4);
                    }
                }
            }
        }
        dist = next;
    }

    ExpectedCounts {
        five_stars,
        four_stars,
        featured_four_stars: four_stars * rate.featured_four_star_share,
    }
}

/// Mean and standard deviation of the 5★ waiting time from zero pity.
///
/// First-hit walk over the hazard sequence; the hard-pity clamp makes the
/// support finite, so both moments are exact sums.
pub fn pulls_per_five_star_distribution(rate: &RateModel) -> (f64, f64) {
    let mut survive = 1.0;
    let mut mean = 0.0;
    let mut second_moment = 0.0;
    for k in 1..=rate.hard_pity {
        let p = five_star_chance(rate, k - 1);
        let hit = survive * p;
        let pulls = k as f64;
        mean += hit * pulls;
        second_moment += hit * pulls * pulls;
        survive *= 1.0 - p;
    }
    let variance = (second_moment - mean * mean).max(0.0);
    (mean, variance.sqrt())
}

/// Expected pulls per *featured* copy: the analytic waiting time for one 5★
/// times the expected number of 5★ hits a featured copy costs
/// (`2 − featured_share`: win the flip at `featured_share`, otherwise the
/// guarantee makes it exactly two).
pub fn mean_pulls_per_copy(rate: &RateModel) -> f64 {
    let (per_five_star, _) = pulls_per_five_star_distribution(rate);
    per_five_star * (2.0 - rate.featured_five_star_share)
}

/// Pulls that mechanically guarantee `target_copies` featured copies from
/// `initial`, regardless of randomness.
///
/// Implemented as the cycle loop rather than a closed formula so the
/// guarantee-state bookkeeping stays explicit: an unguaranteed cycle may
/// spend a full hard pity on a standard 5★ before the guaranteed one.
pub fn worst_case_pulls(initial: &PityState, rate: &RateModel, target_copies: u32) -> u32 {
    let mut pulls = 0u32;
    let mut since = initial.pulls_since_five_star;
    let mut guaranteed = initial.guaranteed;
    for _ in 0..target_copies {
        if !guaranteed {
            // Worst case: the cycle's first 5★ lands at hard pity and loses
            // the flip.
            pulls += rate.hard_pity - since;
            since = 0;
        }
        pulls += rate.hard_pity - since;
        since = 0;
        guaranteed = false;
    }
    pulls
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate() -> RateModel {
        RateModel::character()
    }

    #[test]
    fn worst_case_one_copy_is_two_full_cycles() {
        let r = rate();
        assert_eq!(worst_case_pulls(&PityState::default(), &r, 1), 160);
    }

    #[test]
    fn worst_case_honors_banked_pity_and_guarantee() {
        let r = rate();
        assert_eq!(
            worst_case_pulls(&PityState::new(30, 0, false), &r, 1),
            2 * r.hard_pity - 30
        );
        assert_eq!(
            worst_case_pulls(&PityState::new(30, 0, true), &r, 1),
            r.hard_pity - 30
        );
    }

    #[test]
    fn worst_case_scales_by_alternating_cycles() {
        let r = rate();
        assert_eq!(worst_case_pulls(&PityState::default(), &r, 3), 3 * 160);
        assert_eq!(
            worst_case_pulls(&PityState::new(0, 0, true), &r, 2),
            80 + 160
        );
    }

    #[test]
    fn zero_budget_yields_zero_counts() {
        let counts = expected_reward_counts(&PityState::default(), &rate(), 0);
        assert_eq!(counts.five_stars, 0.0);
        assert_eq!(counts.four_stars, 0.0);
        assert_eq!(counts.featured_four_stars, 0.0);
    }

    #[test]
    fn certain_five_star_rate_counts_every_pull() {
        // base rate 1.0: every pull is a 5★, no 4★ ever triggers.
        let r = RateModel::new(80, 65, 1.0, 0.051, 10, 0.5, 0.5, true).unwrap();
        let counts = expected_reward_counts(&PityState::default(), &r, 25);
        assert!((counts.five_stars - 25.0).abs() < 1e-9);
        assert!(counts.four_stars.abs() < 1e-9);
    }

    #[test]
    fn one_pull_four_star_pity_fills_every_non_five_pull() {
        // hard_pity_four_star = 1: every pull is a 5★ or a 4★.
        let r = RateModel::new(80, 65, 0.008, 0.051, 1, 0.5, 0.5, true).unwrap();
        let budget = 40;
        let counts = expected_reward_counts(&PityState::default(), &r, budget);
        assert!((counts.five_stars + counts.four_stars - budget as f64).abs() < 1e-9);
    }

    #[test]
    fn featured_four_stars_follow_the_share() {
        let counts = expected_reward_counts(&PityState::default(), &rate(), 120);
        assert!(
            (counts.featured_four_stars - counts.four_stars * 0.5).abs() < 1e-12
        );
    }

    #[test]
    fn expected_counts_respect_banked_pity() {
        // 70 banked pulls sit inside soft pity; the next 10 pulls carry far
        // more 5★ mass than 10 pulls from zero.
        let r = rate();
        let hot = expected_reward_counts(&PityState::new(70, 0, false), &r, 10);
        let cold = expected_reward_counts(&PityState::default(), &r, 10);
        assert!(hot.five_stars > cold.five_stars * 5.0);
    }

    #[test]
    fn waiting_time_moments_are_sane() {
        let (mean, std) = pulls_per_five_star_distribution(&rate());
        assert!(mean > 1.0 && mean < 80.0);
        assert!(std > 0.0 && std < mean);

        let certain = RateModel::new(80, 65, 1.0, 0.051, 10, 0.5, 0.5, true).unwrap();
        let (mean, std) = pulls_per_five_star_distribution(&certain);
        assert!((mean - 1.0).abs() < 1e-12);
        assert!(std.abs() < 1e-6);
    }

    #[test]
    fn mean_pulls_per_copy_scales_with_featured_share() {
        let character = mean_pulls_per_copy(&RateModel::character());
        let weapon = mean_pulls_per_copy(&RateModel::weapon());
        // 75% featured share costs fewer pulls per copy than 50%.
        assert!(weapon < character);
        let (per_five, _) = pulls_per_five_star_distribution(&RateModel::character());
        assert!((character - per_five * 1.5).abs() < 1e-9);
    }
}
