//! Pity state and the pull-outcome transition function.
//!
//! [`PityState`] is the minimal per-track record: pulls since the last 5★,
//! pulls since the last 4★, and the guarantee flag set by a lost 50/50.
//! [`advance`] consumes exactly one pull: it computes the 5★ trigger
//! probability (base rate, linear soft-pity ramp, hard-pity clamp), resolves
//! featured vs standard through the 50/50-with-guarantee rule, then evaluates
//! 4★ pity for non-5★ pulls.
//!
//! The transition is a pure, total function over valid inputs — randomness is
//! injected through the `Rng` parameter so tests can drive it with seeded or
//! adversarial generators.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::rates::RateModel;

/// Per-track pity record. Owned exclusively by one simulation run; the
/// player's live pity is read once at the start of a calculation and never
/// written back by this crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PityState {
    /// Pulls since the last 5★ on this track.
    pub pulls_since_five_star: u32,
    /// Pulls since the last 4★ on this track.
    pub pulls_since_four_star: u32,
    /// True if the next 5★ is contractually the featured one.
    pub guaranteed: bool,
}

impl PityState {
    pub fn new(pulls_since_five_star: u32, pulls_since_four_star: u32, guaranteed: bool) -> Self {
        Self {
            pulls_since_five_star,
            pulls_since_four_star,
            guaranteed,
        }
    }
}

/// What a single pull produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PullOutcome {
    /// Filler below 4★.
    Nothing4or5,
    FourStarStandard,
    FourStarFeatured,
    FiveStarStandard,
    FiveStarFeatured,
}

/// 5★ trigger probability for the pull after `pulls_since_five_star` misses.
///
/// Base rate before the soft-pity window, then a linear ramp reaching 1.0 at
/// hard pity. The ramp shape is the community-observed one; different titles
/// swap in different constants through [`RateModel`].
pub fn five_star_chance(rate: &RateModel, pulls_since_five_star: u32) -> f64 {
    let pull_no = pulls_since_five_star + 1;
    if pull_no >= rate.hard_pity {
        return 1.0;
    }
    if pull_no < rate.soft_pity_start {
        return rate.base_five_star_rate;
    }
    let ramp = (pull_no - rate.soft_pity_start) as f64
        / (rate.hard_pity - rate.soft_pity_start) as f64;
    rate.base_five_star_rate + (1.0 - rate.base_five_star_rate) * ramp
}

/// 4★ trigger probability for the pull after `pulls_since_four_star` misses.
/// Flat sub-rate with a hard guarantee, no ramp.
pub fn four_star_chance(rate: &RateModel, pulls_since_four_star: u32) -> f64 {
    if pulls_since_four_star + 1 >= rate.hard_pity_four_star {
        1.0
    } else {
        rate.base_four_star_rate
    }
}

/// Consume one pull: draw against the pity-adjusted rates, update `state`
/// in place, and return the outcome.
pub fn advance<R: Rng>(state: &mut PityState, rate: &RateModel, rng: &mut R) -> PullOutcome {
    let p5 = five_star_chance(rate, state.pulls_since_five_star);
    if rng.random::<f64>() < p5 {
        state.pulls_since_five_star = 0;
        if rate.five_star_resets_four_star_pity {
            state.pulls_since_four_star = 0;
        } else {
            // Decoupled pity: the 4★ counter keeps running but saturates so
            // the next non-5★ pull is still a forced 4★.
            state.pulls_since_four_star =
                (state.pulls_since_four_star + 1).min(rate.hard_pity_four_star - 1);
        }
        if state.guaranteed {
            state.guaranteed = false;
            return PullOutcome::FiveStarFeatured;
        }
        return if rng.random::<f64>() < rate.featured_five_star_share {
            PullOutcome::FiveStarFeatured
        } else {
            state.guaranteed = true;
            PullOutcome::FiveStarStandard
        };
    }

    let p4 = four_star_chance(rate, state.pulls_since_four_star);
    if rng.random::<f64>() < p4 {
        state.pulls_since_five_star += 1;
        state.pulls_since_four_star = 0;
        return if rng.random::<f64>() < rate.featured_four_star_share {
            PullOutcome::FourStarFeatured
        } else {
            PullOutcome::FourStarStandard
        };
    }

    state.pulls_since_five_star += 1;
    state.pulls_since_four_star += 1;
    PullOutcome::Nothing4or5
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rate() -> RateModel {
        RateModel::character()
    }

    #[test]
    fn chance_is_base_before_soft_pity() {
        let r = rate();
        assert_eq!(five_star_chance(&r, 0), r.base_five_star_rate);
        // Pull 64 is the last one before the window; pull 65 sits at the
        // ramp origin and still draws the base rate.
        assert_eq!(five_star_chance(&r, 63), r.base_five_star_rate);
        assert_eq!(five_star_chance(&r, 64), r.base_five_star_rate);
    }

    #[test]
    fn chance_ramps_inside_soft_pity() {
        let r = rate();
        let mid = five_star_chance(&r, 71); // pull 72, about halfway up
        assert!(mid > r.base_five_star_rate && mid < 1.0);
        assert!(five_star_chance(&r, 72) > mid);
    }

    #[test]
    fn chance_is_one_at_hard_pity() {
        let r = rate();
        assert_eq!(five_star_chance(&r, r.hard_pity - 1), 1.0);
    }

    #[test]
    fn forced_five_star_resets_both_counters() {
        let r = rate();
        let mut state = PityState::new(r.hard_pity - 1, 5, false);
        let mut rng = SmallRng::seed_from_u64(7);
        let outcome = advance(&mut state, &r, &mut rng);
        assert!(matches!(
            outcome,
            PullOutcome::FiveStarFeatured | PullOutcome::FiveStarStandard
        ));
        assert_eq!(state.pulls_since_five_star, 0);
        assert_eq!(state.pulls_since_four_star, 0);
    }

    #[test]
    fn guarantee_forces_featured_and_clears() {
        let r = rate();
        let mut state = PityState::new(r.hard_pity - 1, 0, true);
        let mut rng = SmallRng::seed_from_u64(7);
        assert_eq!(advance(&mut state, &r, &mut rng), PullOutcome::FiveStarFeatured);
        assert!(!state.guaranteed);
    }

    #[test]
    fn losing_the_flip_sets_the_guarantee() {
        let r = rate();
        // Run forced 5★s until one resolves standard; the flag must be set
        // exactly then.
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..64 {
            let mut state = PityState::new(r.hard_pity - 1, 0, false);
            match advance(&mut state, &r, &mut rng) {
                PullOutcome::FiveStarStandard => {
                    assert!(state.guaranteed);
                    return;
                }
                PullOutcome::FiveStarFeatured => assert!(!state.guaranteed),
                other => panic!("forced pull produced {other:?}"),
            }
        }
        panic!("no standard 5★ in 64 forced pulls");
    }

    #[test]
    fn four_star_forced_at_its_hard_pity() {
        let r = rate();
        let state = PityState::new(0, r.hard_pity_four_star - 1, false);
        // A 5★ at base rate is possible; retry seeds until the 5★ roll misses.
        for seed in 0..32 {
            let mut s = state;
            let mut rng = SmallRng::seed_from_u64(seed);
            match advance(&mut s, &r, &mut rng) {
                PullOutcome::FourStarFeatured | PullOutcome::FourStarStandard => {
                    assert_eq!(s.pulls_since_four_star, 0);
                    assert_eq!(s.pulls_since_five_star, 1);
                    return;
                }
                _ => continue,
            }
        }
        panic!("no 4★ across 32 seeds at forced 4★ pity");
    }

    #[test]
    fn blank_pull_increments_both_counters() {
        let r = rate();
        for seed in 0..64 {
            let mut state = PityState::new(10, 2, false);
            let mut rng = SmallRng::seed_from_u64(seed);
            if advance(&mut state, &r, &mut rng) == PullOutcome::Nothing4or5 {
                assert_eq!(state.pulls_since_five_star, 11);
                assert_eq!(state.pulls_since_four_star, 3);
                return;
            }
        }
        panic!("no blank pull across 64 seeds");
    }

    #[test]
    fn decoupled_pity_saturates_four_star_counter() {
        let mut r = rate();
        r.five_star_resets_four_star_pity = false;
        let mut state = PityState::new(r.hard_pity - 1, r.hard_pity_four_star - 1, true);
        let mut rng = SmallRng::seed_from_u64(7);
        assert_eq!(advance(&mut state, &r, &mut rng), PullOutcome::FiveStarFeatured);
        assert_eq!(state.pulls_since_four_star, r.hard_pity_four_star - 1);
    }
}
