//! Benefit schedule records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Schedule category of a benefit.
///
/// Both kinds fire each configured step once, at its exact trigger point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenefitKind {
    OneTime,
    Cumulative,
}

impl BenefitKind {
    pub const ALL: [BenefitKind; 2] = [BenefitKind::OneTime, BenefitKind::Cumulative];

    pub fn name(&self) -> &'static str {
        match self {
            BenefitKind::OneTime => "one-time",
            BenefitKind::Cumulative => "cumulative",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardType {
    FreePulls,
    /// Choose-your-own featured item box
    SelectUpFiveStarBox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenefitReward {
    #[serde(rename = "type")]
    pub reward_type: RewardType,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitStep {
    pub trigger_pulls: i64,
    #[serde(default)]
    pub rewards: Vec<BenefitReward>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BannerBenefit {
    pub kind: BenefitKind,
    #[serde(default)]
    pub steps: Vec<BenefitStep>,
}

/// Merged rewards at one trigger point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TriggerReward {
    pub free_draws: u32,
    pub has_bonus_box: bool,
}

/// One merged trigger point of a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitTriggerPoint {
    pub trigger_pulls: u32,
    pub kind: BenefitKind,
    pub free_pulls: u32,
    pub has_bonus_box: bool,
}

/// One row of the benefit chart: both kinds side by side at a trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitChartPoint {
    pub trigger_pulls: u32,
    pub one_time_free_pulls: u32,
    pub cumulative_free_pulls: u32,
    pub has_bonus_box: bool,
}

/// Effective cost at one paid-draw budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveCostPoint {
    pub paid_pulls: u32,
    pub total_pulls: u32,
    pub avg_cost_per_pull: Decimal,
}
