//! Monte Carlo draw simulator.
//!
//! Runs thousands of independent draw sequences to analyze:
//! - Draws needed for N featured hits from any pity/guarantee state
//! - 10th/50th/90th percentile outcomes
//! - Expected draw count
//!
//! Every run uses the same rate model as the exact engine in
//! `crate::distribution`, so the two can cross-check each other.

mod config;
mod random;
mod report;
mod runner;

pub use config::SimConfig;
pub use random::{RandomSource, SplitMix64};
pub use report::{DistributionPoint, DrawCounts, Percentiles, SimulationResult};
pub use runner::{run_simulation, simulate, simulate_counts};
