//! Gacha Planner - pity probability and top-up cost analysis.
//!
//! The library holds the analysis engines; `src/main.rs` is a thin CLI over
//! [`planner::analyze_banner`].

pub mod benefits;
pub mod build_info;
pub mod config;
pub mod constants;
pub mod distribution;
pub mod exchange;
pub mod pity;
pub mod planner;
pub mod shop;
pub mod simulator;

pub use config::GameConfig;
pub use distribution::Pdf;
pub use pity::{DrawState, PityConfig, SoftPity};
pub use planner::{analyze_banner, BudgetAnalysis, PlanRequest};
pub use shop::ShoppingPlan;
pub use simulator::{SimConfig, SimulationResult};
