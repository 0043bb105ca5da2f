//! Simulation configuration.

use crate::constants::{DEFAULT_SIM_RUNS, MAX_DRAWS_PER_RUN, PLANNER_SIM_RUNS};
use crate::pity::DrawState;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Featured hits each run must collect
    pub target_count: u32,

    /// Pity and guarantee state every run starts from
    pub initial_state: DrawState,

    /// Number of simulation runs to perform
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Draws per run before the run is abandoned as timed out. Only used
    /// when the pity rules give no bound of their own (no loss guarantee and
    /// a featured rate below 1).
    pub max_draws_per_run: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            target_count: 1,
            initial_state: DrawState::fresh(),
            num_runs: DEFAULT_SIM_RUNS,
            seed: None,
            max_draws_per_run: MAX_DRAWS_PER_RUN,
        }
    }
}

impl SimConfig {
    /// Resume from a saved pity counter and guarantee flag.
    pub fn resume(target_count: u32, pity_counter: u32, featured_guaranteed: bool) -> Self {
        Self {
            target_count,
            initial_state: DrawState::new(pity_counter, featured_guaranteed),
            ..Default::default()
        }
    }

    /// Smaller run count used for interactive budget planning
    pub fn planner(target_count: u32, initial_state: DrawState) -> Self {
        Self {
            target_count,
            initial_state,
            num_runs: PLANNER_SIM_RUNS,
            ..Default::default()
        }
    }

    /// Fixed-seed config for reproducible analysis
    pub fn seeded(target_count: u32, num_runs: u32, seed: u64) -> Self {
        Self {
            target_count,
            num_runs,
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Target and run count floored at 1.
    pub fn normalized(&self) -> Self {
        Self {
            target_count: self.target_count.max(1),
            num_runs: self.num_runs.max(1),
            max_draws_per_run: self.max_draws_per_run.max(1),
            ..self.clone()
        }
    }
}
