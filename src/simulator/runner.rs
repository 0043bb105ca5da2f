//! Main simulation runner.
//!
//! Each run replays the pity rules draw by draw until the featured target is
//! met. Statistics are tracked in a run-length frequency map and turned into
//! a `SimulationResult` at the end.

use super::config::SimConfig;
use super::random::RandomSource;
use super::report::{DrawCounts, SimulationResult};
use crate::constants::SIM_CHUNK_SIZE;
use crate::pity::{rate_at, DrawState, PityConfig};
use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// Simulate `run_count` independent runs from `initial_state` with the given
/// random source.
///
/// Termination: the rate model is 1 at hard pity, so every success arrives
/// within `hard_pity` draws, and a positive loss guarantee forces a featured
/// success within `guaranteed_after_loses + 1` successes. Those bounds size
/// the per-run cap, so large targets never time out. The remaining
/// degenerate case (no guarantee and a featured rate of 0) is cut off by
/// the default per-run draw cap and reported as timed out.
pub fn simulate(
    config: &PityConfig,
    target_count: u32,
    initial_state: DrawState,
    run_count: u32,
    rng: &mut impl RandomSource,
) -> SimulationResult {
    let sim = SimConfig {
        target_count,
        initial_state,
        num_runs: run_count,
        ..Default::default()
    };
    SimulationResult::from_counts(&simulate_counts(config, &sim, rng))
}

/// Run `sim.num_runs` runs on one random source and return the raw counts.
pub fn simulate_counts(
    config: &PityConfig,
    sim: &SimConfig,
    rng: &mut impl RandomSource,
) -> DrawCounts {
    let sim = sim.normalized();
    let mut counts = DrawCounts::default();
    for _ in 0..sim.num_runs {
        match simulate_single_run(config, &sim, rng) {
            Some(draws) => counts.record(draws),
            None => counts.record_timeout(),
        }
    }
    counts
}

/// Run the full simulation and return a report.
///
/// Seeded runs are split into fixed chunks, each with its own ChaCha8
/// stream derived from the seed, and executed in parallel. Chunk layout
/// does not depend on the thread count, so a seed always reproduces the
/// same result.
pub fn run_simulation(config: &PityConfig, sim: &SimConfig) -> SimulationResult {
    let sim = sim.normalized();

    let counts = match sim.seed {
        Some(seed) => {
            let chunk_count = sim.num_runs.div_ceil(SIM_CHUNK_SIZE);
            (0..chunk_count)
                .into_par_iter()
                .map(|chunk_idx| {
                    let start = chunk_idx * SIM_CHUNK_SIZE;
                    let end = (start + SIM_CHUNK_SIZE).min(sim.num_runs);
                    let chunk = SimConfig {
                        num_runs: end - start,
                        ..sim.clone()
                    };
                    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(chunk_idx as u64));
                    simulate_counts(config, &chunk, &mut rng)
                })
                .reduce(DrawCounts::default, DrawCounts::merge)
        }
        None => simulate_counts(config, &sim, &mut rand::thread_rng()),
    };

    let result = SimulationResult::from_counts(&counts);
    info!(
        "simulated {} runs (target {}): p10={} p50={} p90={} mean={:.2}",
        result.num_runs,
        sim.target_count,
        result.percentiles.p10,
        result.percentiles.p50,
        result.percentiles.p90,
        result.expected_value
    );
    if result.runs_timed_out > 0 {
        warn!(
            "{} of {} runs hit the {}-draw cap",
            result.runs_timed_out,
            result.num_runs,
            draw_cap(config, &sim)
        );
    }
    result
}

/// Most draws a run may take before it is abandoned.
///
/// With a loss guarantee every featured copy arrives within
/// `hard_pity * (guaranteed_after_loses + 1)` draws, and with a sure win
/// within `hard_pity`. Only runs with neither bound fall back to
/// `sim.max_draws_per_run`.
fn draw_cap(config: &PityConfig, sim: &SimConfig) -> u64 {
    let per_featured = if config.has_loss_guarantee() {
        (config.effective_hard_pity() as u64)
            .saturating_mul(config.guaranteed_after_loses as u64 + 1)
    } else if config.effective_win_rate() >= 1.0 {
        config.effective_hard_pity() as u64
    } else {
        return sim.max_draws_per_run;
    };
    per_featured.saturating_mul(sim.target_count as u64)
}

/// Simulate a single run from start to target.
///
/// Returns the number of draws used, or `None` if the run hit the draw cap.
fn simulate_single_run(
    config: &PityConfig,
    sim: &SimConfig,
    rng: &mut impl RandomSource,
) -> Option<u32> {
    let hard_pity = config.effective_hard_pity();
    let threshold = config.guaranteed_after_loses;
    let win_rate = config.effective_win_rate();

    let mut pity_counter = sim.initial_state.pity_counter;
    let mut losses = sim.initial_state.guaranteed_loses.min(threshold);
    let mut featured = 0u32;
    let mut draws: u64 = 0;
    let cap = draw_cap(config, sim);

    while featured < sim.target_count {
        if draws >= cap {
            debug!("run abandoned after {} draws", draws);
            return None;
        }
        draws += 1;

        let rate = rate_at(config, pity_counter.saturating_add(1));
        if rng.next_f64() >= rate {
            pity_counter = (pity_counter + 1).min(hard_pity);
            continue;
        }

        pity_counter = 0;

        if threshold > 0 && losses >= threshold {
            featured += 1;
            losses = 0;
            continue;
        }

        if rng.next_f64() < win_rate {
            featured += 1;
            losses = 0;
        } else {
            losses += 1;
        }
    }

    Some(draws.min(u32::MAX as u64) as u32)
}
