//! Game configuration records, as authored in the game's JSON file.

use crate::benefits::BannerBenefit;
use crate::exchange::ExchangeRate;
use crate::pity::rate::clamp01;
use crate::pity::{PityConfig, SoftPity};
use crate::shop::RechargePack;
use log::warn;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrencyKind {
    /// Spent on draws
    Main,
    /// Bought with money, converted into the main currency
    Premium,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub id: String,
    pub name: String,
    pub kind: CurrencyKind,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub decimals: u32,
}

/// Pity rules as written in the configuration file.
///
/// Values are kept as authored; [`PitySystem::to_pity_config`] produces the
/// clamped form the engines work with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitySystem {
    pub id: String,
    pub name: String,
    pub base_rate: Decimal,
    /// Advertised consolidated rate; informational only
    #[serde(default)]
    pub overall_rate: Option<Decimal>,
    #[serde(default)]
    pub soft_pity_start: Option<i64>,
    #[serde(default)]
    pub soft_pity_increase_per_pull: Option<Decimal>,
    pub hard_pity: i64,
    pub featured_win_rate: Decimal,
    #[serde(default)]
    pub guaranteed_after_loses: i64,
}

fn probability(field: &str, owner: &str, value: Decimal) -> f64 {
    let raw = value.to_f64().unwrap_or(0.0);
    let clamped = clamp01(raw);
    if clamped != raw {
        warn!("pity system {}: {} {} clamped to {}", owner, field, value, clamped);
    }
    clamped
}

fn count(field: &str, owner: &str, value: i64, min: i64) -> u32 {
    let clamped = value.clamp(min, u32::MAX as i64);
    if clamped != value {
        warn!("pity system {}: {} {} clamped to {}", owner, field, value, clamped);
    }
    clamped as u32
}

impl PitySystem {
    /// Engine form of these rules.
    ///
    /// Probabilities clamp to [0, 1], hard pity to at least 1 and counts to
    /// non-negative. Soft pity applies only when both its start and its
    /// increase are set.
    pub fn to_pity_config(&self) -> PityConfig {
        let soft_pity = match (self.soft_pity_start, self.soft_pity_increase_per_pull) {
            (Some(start), Some(increase)) => Some(SoftPity {
                start: count("softPityStart", &self.id, start, 0),
                increase_per_pull: increase.to_f64().unwrap_or(0.0),
            }),
            (None, None) => None,
            _ => {
                warn!("pity system {}: soft pity needs both start and increase; ignored", self.id);
                None
            }
        };

        PityConfig {
            base_rate: probability("baseRate", &self.id, self.base_rate),
            soft_pity,
            hard_pity: count("hardPity", &self.id, self.hard_pity, 1),
            featured_win_rate: probability("featuredWinRate", &self.id, self.featured_win_rate),
            guaranteed_after_loses: count(
                "guaranteedAfterLoses",
                &self.id,
                self.guaranteed_after_loses,
                0,
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub up_items: Vec<String>,
    #[serde(default)]
    pub start_at: Option<String>,
    #[serde(default)]
    pub end_at: Option<String>,
    pub pity_system_id: String,
    pub cost_per_pull: Decimal,
    pub cost_currency_id: String,
    #[serde(default)]
    pub benefits: Vec<BannerBenefit>,
}

/// Everything known about one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub id: String,
    pub name: String,
    pub default_main_currency_id: String,
    pub default_premium_currency_id: String,
    #[serde(default)]
    pub currencies: Vec<Currency>,
    #[serde(default)]
    pub pity_systems: Vec<PitySystem>,
    #[serde(default)]
    pub banners: Vec<Banner>,
    #[serde(default)]
    pub recharge_packs: Vec<RechargePack>,
    #[serde(default)]
    pub exchange_rates: Vec<ExchangeRate>,
}

impl GameConfig {
    pub fn pity_system(&self, id: &str) -> Option<&PitySystem> {
        self.pity_systems.iter().find(|p| p.id == id)
    }

    pub fn banner(&self, id: &str) -> Option<&Banner> {
        self.banners.iter().find(|b| b.id == id)
    }

    pub fn currency(&self, id: &str) -> Option<&Currency> {
        self.currencies.iter().find(|c| c.id == id)
    }

    /// Banner to use when none is named: the first one listed.
    pub fn default_banner(&self) -> Option<&Banner> {
        self.banners.first()
    }

    pub fn pity_for_banner(&self, banner: &Banner) -> Option<PityConfig> {
        self.pity_system(&banner.pity_system_id)
            .map(PitySystem::to_pity_config)
    }
}
