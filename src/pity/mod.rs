//! Pity rules and the per-draw rate model.
//!
//! A pity ruleset raises the success rate as consecutive failures pile up
//! (soft pity) and forces a success at the hard pity count. A second counter
//! tracks non-featured successes so a banner can force the featured item
//! after too many losses.

pub mod rate;
pub mod types;

pub use rate::*;
pub use types::*;
