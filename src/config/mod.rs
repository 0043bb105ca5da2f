//! Game configuration: serde records for currencies, pity systems, banners,
//! recharge packs and exchange rates, plus the JSON loader.

pub mod loader;
pub mod types;

pub use loader::*;
pub use types::*;
