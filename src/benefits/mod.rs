//! Banner benefit schedules - free draws and selector boxes granted at
//! draw-count milestones, and their effect on the real cost per draw.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
