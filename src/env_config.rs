//! Shared environment configuration for the binaries.
//!
//! Consolidates the `RAYON_NUM_THREADS` and `PITYCALC_TRIALS` reads shared by
//! the CLI front-ends.

use crate::evaluate::DEFAULT_TRIALS;

/// Read `RAYON_NUM_THREADS` (fallback `OMP_NUM_THREADS`, default: available
/// parallelism), build the rayon global pool. Tolerates an already
/// initialized pool. Returns the thread count.
pub fn init_rayon_threads() -> usize {
    let num_threads = std::env::var("RAYON_NUM_THREADS")
        .or_else(|_| std::env::var("OMP_NUM_THREADS"))
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        });
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .ok(); // May fail if already initialized
    num_threads
}

/// Read `PITYCALC_TRIALS` (default [`DEFAULT_TRIALS`]).
pub fn default_trials() -> u32 {
    std::env::var("PITYCALC_TRIALS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_TRIALS)
}
