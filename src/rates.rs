//! Banner rate configuration.
//!
//! A [`RateModel`] holds every tunable constant of one banner track: hard and
//! soft pity thresholds, base rates, 4★ sub-rates, and the featured shares
//! for the 50/50 (5★) and rate-up (4★) resolution. The engine is fully
//! parametric over it — no rate is hard-wired anywhere else.
//!
//! Invariants are enforced at construction ([`RateModel::new`]) and re-checked
//! at every engine call boundary; out-of-range values are rejected, never
//! clamped.

use serde::Serialize;
use thiserror::Error;

/// Invalid rate configuration. Raised at construction, never deferred.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RateModelError {
    #[error("soft pity start {soft_pity_start} must satisfy 0 < soft_pity_start < hard_pity ({hard_pity})")]
    SoftPityOutOfRange { soft_pity_start: u32, hard_pity: u32 },
    #[error("base 5-star rate {0} must be within [0, 1]")]
    FiveStarRateOutOfRange(f64),
    #[error("base 4-star rate {0} must be within [0, 1]")]
    FourStarRateOutOfRange(f64),
    #[error("4-star hard pity must be at least 1")]
    FourStarPityZero,
    #[error("featured 4-star share {0} must be within [0, 1]")]
    FourStarShareOutOfRange(f64),
    #[error("featured 5-star share {0} must be within [0, 1]")]
    FiveStarShareOutOfRange(f64),
}

/// Immutable rate constants for one banner track.
///
/// Supplied by the caller (the static catalog layer in the full application);
/// [`character`](RateModel::character) and [`weapon`](RateModel::weapon) carry
/// the community-documented defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateModel {
    /// Pull index at which a 5★ is mechanically guaranteed.
    pub hard_pity: u32,
    /// Pull index at which the per-pull 5★ probability starts ramping.
    pub soft_pity_start: u32,
    /// Per-pull 5★ probability before soft pity.
    pub base_five_star_rate: f64,
    /// Per-pull 4★ probability absent pity (evaluated only when no 5★ lands).
    pub base_four_star_rate: f64,
    /// Pull index at which a 4★ is guaranteed absent an intervening 5★.
    pub hard_pity_four_star: u32,
    /// Fraction of 4★ hits that are the rate-up 4★.
    pub featured_four_star_share: f64,
    /// Probability that an unguaranteed 5★ wins the coin flip (0.5 on
    /// character banners, 0.75 on weapon banners).
    pub featured_five_star_share: f64,
    /// Whether a 5★ hit also resets the 4★ pity counter. True for the
    /// commonly documented shared-pity behavior; see DESIGN.md.
    pub five_star_resets_four_star_pity: bool,
}

impl RateModel {
    /// Validating constructor. Rejects any out-of-range constant.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        hard_pity: u32,
        soft_pity_start: u32,
        base_five_star_rate: f64,
        base_four_star_rate: f64,
        hard_pity_four_star: u32,
        featured_four_star_share: f64,
        featured_five_star_share: f64,
        five_star_resets_four_star_pity: bool,
    ) -> Result<Self, RateModelError> {
        let model = Self {
            hard_pity,
            soft_pity_start,
            base_five_star_rate,
            base_four_star_rate,
            hard_pity_four_star,
            featured_four_star_share,
            featured_five_star_share,
            five_star_resets_four_star_pity,
        };
        model.validate()?;
        Ok(model)
    }

    /// Re-check every invariant. Called at engine boundaries so a hand-built
    /// model cannot produce plausible-looking wrong statistics.
    pub fn validate(&self) -> Result<(), RateModelError> {
        if self.soft_pity_start == 0 || self.soft_pity_start >= self.hard_pity {
            return Err(RateModelError::SoftPityOutOfRange {
                soft_pity_start: self.soft_pity_start,
                hard_pity: self.hard_pity,
            });
        }
        if !(0.0..=1.0).contains(&self.base_five_star_rate) {
            return Err(RateModelError::FiveStarRateOutOfRange(
                self.base_five_star_rate,
            ));
        }
        if !(0.0..=1.0).contains(&self.base_four_star_rate) {
            return Err(RateModelError::FourStarRateOutOfRange(
                self.base_four_star_rate,
            ));
        }
        if self.hard_pity_four_star == 0 {
            return Err(RateModelError::FourStarPityZero);
        }
        if !(0.0..=1.0).contains(&self.featured_four_star_share) {
            return Err(RateModelError::FourStarShareOutOfRange(
                self.featured_four_star_share,
            ));
        }
        if !(0.0..=1.0).contains(&self.featured_five_star_share) {
            return Err(RateModelError::FiveStarShareOutOfRange(
                self.featured_five_star_share,
            ));
        }
        Ok(())
    }

    /// Character-banner defaults: 80 hard pity, ramp from 65, 0.8% base 5★
    /// rate, 10-pull 4★ pity, 50/50 featured resolution at both rarities.
    pub fn character() -> Self {
        Self {
            hard_pity: 80,
            soft_pity_start: 65,
            base_five_star_rate: 0.008,
            base_four_star_rate: 0.051,
            hard_pity_four_star: 10,
            featured_four_star_share: 0.5,
            featured_five_star_share: 0.5,
            five_star_resets_four_star_pity: true,
        }
    }

    /// Weapon-banner defaults: same pity curve, 75/25 featured resolution.
    pub fn weapon() -> Self {
        Self {
            featured_five_star_share: 0.75,
            ..Self::character()
        }
    }
}
