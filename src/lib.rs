//! # pitycalc — pity-aware pull probability engine
//!
//! Answers the planning question behind every gacha session: given the pity
//! currently banked on a banner track, a target number of featured copies,
//! and a pull budget, what are the odds — and what is mechanically
//! guaranteed?
//!
//! ## Algorithm overview
//!
//! The engine is a hybrid of two deliberately separate paths:
//!
//! | Path | Rust module | Computes | Why this path |
//! |------|-------------|----------|---------------|
//! | Analytic | [`analytic`] | `worst_case`, expected 4★/featured-4★ counts, pulls-per-copy | The pity process is Markov in its two counters; everything the 50/50 does not touch has an exact answer via forward evolution of the counter distribution |
//! | Monte-Carlo | [`simulation`] | `success_rate`, `expected_copies` | Losing the 50/50 forces the *next* 5★ to be featured, coupling consecutive drops — the featured-copy-count distribution has no tractable closed form |
//!
//! The transition function itself ([`pity::advance`]) encapsulates the
//! soft-pity ramp, the hard-pity clamp, and the 50/50-with-guarantee rule;
//! both paths are built from its probabilities, so they cannot drift apart.
//!
//! ## Determinism
//!
//! Randomness is injected: `advance` takes any [`rand::Rng`], and the batch
//! drivers derive one `SmallRng` per trial from a caller-supplied seed. The
//! same seed reproduces every statistic bit for bit; the analytic fields do
//! not depend on the seed or the trial count at all.
//!
//! ## Boundaries
//!
//! This is a library core: no I/O, no persistence, no network surface. The
//! caller supplies the banked pity (persistence layer), the [`rates::RateModel`]
//! constants (static catalog), and formats the returned raw numbers
//! (presentation layer).

pub mod analytic;
pub mod env_config;
pub mod evaluate;
pub mod luck;
pub mod pity;
pub mod rates;
pub mod simulation;

pub use evaluate::{
    evaluate, evaluate_report, success_curve, EvaluateError, EvaluationReport, SweepPoint,
    DEFAULT_TRIALS, MAX_PULL_BUDGET, MAX_TRIALS,
};
pub use luck::{luck_rating, LuckError, LuckRating};
pub use pity::{advance, five_star_chance, four_star_chance, PityState, PullOutcome};
pub use rates::{RateModel, RateModelError};
pub use simulation::{simulate_batch, simulate_trial, StatsResult, TrialRecord};
