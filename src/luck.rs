//! Luck rating — where does an observed pull history sit among all players?
//!
//! Maps the observed average pity (mean pulls spent per 5★ across the user's
//! history) to a percentile against the analytic waiting-time distribution,
//! via a normal approximation of the sample mean. Purely analytic; no
//! simulation. The approximation is sample-size-adjusted: the standard error
//! of a mean over `n` 5★s is σ/√n, so the same average pity is far more
//! meaningful over 40 drops than over 2.

use serde::Serialize;
use thiserror::Error;

use crate::analytic::pulls_per_five_star_distribution;
use crate::rates::{RateModel, RateModelError};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LuckError {
    #[error("luck rating needs at least one observed 5-star")]
    NoSamples,
    #[error("observed mean pity {0} is outside the possible range [1, {1}]")]
    ObservedOutOfRange(f64, u32),
    #[error(transparent)]
    Rates(#[from] RateModelError),
}

/// Percentile placement of an observed pull history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LuckRating {
    /// 0–100; higher means luckier (fewer pulls per 5★ than expected).
    pub percentile: f64,
    /// Standardized distance of the observed mean below the expected one.
    pub z_score: f64,
    /// Analytic expected pulls per 5★ for this rate model.
    pub expected_pity: f64,
    pub observed_pity: f64,
    pub sample_size: u32,
}

/// Rate an observed average pity over `five_star_count` drops.
pub fn luck_rating(
    observed_mean_pity: f64,
    five_star_count: u32,
    rate: &RateModel,
) -> Result<LuckRating, LuckError> {
    rate.validate()?;
    if five_star_count == 0 {
        return Err(LuckError::NoSamples);
    }
    if !observed_mean_pity.is_finite()
        || observed_mean_pity < 1.0
        || observed_mean_pity > rate.hard_pity as f64
    {
        return Err(LuckError::ObservedOutOfRange(
            observed_mean_pity,
            rate.hard_pity,
        ));
    }

    let (expected_pity, std_dev) = pulls_per_five_star_distribution(rate);
    let standard_error = std_dev / (five_star_count as f64).sqrt();
    // Lower observed pity than expected → positive z → lucky.
    let z_score = (expected_pity - observed_mean_pity) / standard_error;

    Ok(LuckRating {
        percentile: normal_cdf(z_score) * 100.0,
        z_score,
        expected_pity,
        observed_pity: observed_mean_pity,
        sample_size: five_star_count,
    })
}

/// Standard normal CDF Φ(z), Hastings approximation (A&S 26.2.17),
/// error < 7.5e-8.
fn normal_cdf(z: f64) -> f64 {
    if z.is_nan() {
        return 0.5;
    }
    if z >= 8.0 {
        return 1.0;
    }
    if z <= -8.0 {
        return 0.0;
    }

    // Φ(-z) = 1 - Φ(z)
    let (z_abs, negate) = if z < 0.0 { (-z, true) } else { (z, false) };

    const B0: f64 = 0.2316419;
    const B1: f64 = 0.319381530;
    const B2: f64 = -0.356563782;
    const B3: f64 = 1.781477937;
    const B4: f64 = -1.821255978;
    const B5: f64 = 1.330274429;

    let t = 1.0 / (1.0 + B0 * z_abs);
    let poly = t * (B1 + t * (B2 + t * (B3 + t * (B4 + t * B5))));
    let pdf = (-0.5 * z_abs * z_abs).exp() / (2.0 * std::f64::consts::PI).sqrt();
    let cdf = 1.0 - pdf * poly;

    if negate {
        1.0 - cdf
    } else {
        cdf
    }
}
