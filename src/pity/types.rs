//! Pity configuration and draw state records.

use serde::{Deserialize, Serialize};

/// Linear soft-pity ramp.
///
/// From draw `start` onwards (1-based, counted since the last success) the
/// success rate grows by `increase_per_pull` per draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftPity {
    pub start: u32,
    pub increase_per_pull: f64,
}

/// Rate and guarantee parameters of one pity system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PityConfig {
    pub base_rate: f64,
    pub soft_pity: Option<SoftPity>,
    pub hard_pity: u32,
    pub featured_win_rate: f64,
    /// Non-featured successes allowed before the next success is forced featured.
    /// Zero disables the guarantee.
    pub guaranteed_after_loses: u32,
}

impl PityConfig {
    /// Hard pity clamped to at least one draw.
    pub fn effective_hard_pity(&self) -> u32 {
        self.hard_pity.max(1)
    }

    /// Featured win rate clamped to [0, 1].
    pub fn effective_win_rate(&self) -> f64 {
        super::rate::clamp01(self.featured_win_rate)
    }

    pub fn has_loss_guarantee(&self) -> bool {
        self.guaranteed_after_loses > 0
    }
}

/// Counters carried between draws.
///
/// `guaranteed_loses` counts non-featured successes since the last featured
/// one. Any value at or above the config's `guaranteed_after_loses` means the
/// next success is featured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawState {
    pub pity_counter: u32,
    pub guaranteed_loses: u32,
}

impl DrawState {
    /// A state with no pity built up and no losses.
    pub fn fresh() -> Self {
        Self::default()
    }

    /// Build a state from a pity counter and a "next success is featured" flag.
    pub fn new(pity_counter: u32, featured_guaranteed: bool) -> Self {
        Self {
            pity_counter,
            guaranteed_loses: if featured_guaranteed { u32::MAX } else { 0 },
        }
    }

    pub fn is_featured_guaranteed(&self, config: &PityConfig) -> bool {
        config.has_loss_guarantee() && self.guaranteed_loses >= config.guaranteed_after_loses
    }

    /// Losses still allowed before the guarantee kicks in.
    pub fn remaining_loses(&self, config: &PityConfig) -> u32 {
        config
            .guaranteed_after_loses
            .saturating_sub(self.guaranteed_loses)
    }
}
