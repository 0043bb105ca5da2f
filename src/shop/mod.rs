//! Top-up shopping: pack catalogs, purchase variants, and the exact
//! minimum-cost optimizer.
//!
//! "Best value first" is not optimal with discrete pack sizes (a great-value
//! pack can overshoot badly), so plans are solved exactly with a knapsack
//! table over currency amounts.

pub mod optimizer;
pub mod types;

pub use optimizer::*;
pub use types::*;
