//! Exact draw-count distributions.
//!
//! Probability mass functions over "draws needed" are built from the rate
//! model by a running survival product, combined across independent hits by
//! discrete convolution, and mixed over loss counts for the featured
//! guarantee.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
