//! Recharge pack catalog and plan records.

use crate::constants::MINOR_UNITS_PER_MAJOR;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackKind {
    /// One-off purchase of premium currency
    Direct,
    /// Subscription: premium up front plus a daily stipend
    Monthly,
}

/// A purchasable currency pack as defined by the game's shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RechargePack {
    pub id: String,
    pub name: String,
    pub kind: PackKind,
    #[serde(rename = "priceCNY")]
    pub price: Decimal,
    #[serde(default)]
    pub premium_currency_id: String,
    pub premium_amount: Decimal,
    #[serde(default)]
    pub first_purchase_bonus_amount: Option<Decimal>,
    #[serde(default)]
    pub duration_days: Option<u32>,
    #[serde(default)]
    pub daily_main_currency_amount: Option<Decimal>,
}

impl RechargePack {
    /// Currency one purchase yields, before any first-purchase bonus.
    ///
    /// Monthly packs add the daily stipend over their full duration.
    pub fn total_gain(&self) -> Decimal {
        match self.kind {
            PackKind::Direct => self.premium_amount,
            PackKind::Monthly => {
                let days = Decimal::from(self.duration_days.unwrap_or(0));
                let daily = self.daily_main_currency_amount.unwrap_or(Decimal::ZERO);
                self.premium_amount + daily * days
            }
        }
    }
}

/// One option the optimizer may buy.
///
/// Regular variants can be bought any number of times; bonus variants (a
/// pack's first purchase) at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseVariant {
    pub pack_id: String,
    pub name: String,
    pub is_bonus_variant: bool,
    pub currency_gain: u64,
    pub cost_minor_units: i64,
}

impl PurchaseVariant {
    pub fn price(&self) -> Decimal {
        from_minor_units(self.cost_minor_units)
    }
}

/// Decimal currency amount floored to a whole number, negatives to zero.
pub fn floor_amount(value: Decimal) -> u64 {
    value.floor().to_u64().unwrap_or(0)
}

/// Price in minor units, rounded half-up.
pub fn to_minor_units(price: Decimal) -> i64 {
    (price * Decimal::from(MINOR_UNITS_PER_MAJOR))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

pub fn from_minor_units(minor: i64) -> Decimal {
    (Decimal::from(minor) / Decimal::from(MINOR_UNITS_PER_MAJOR)).normalize()
}

/// One line of a shopping list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListItem {
    pub pack_id: String,
    pub pack_name: String,
    pub count: u32,
    pub is_bonus_variant: bool,
    pub unit_price: Decimal,
    pub gained_currency: u64,
}

/// Value ranking of one variant, independent of the chosen plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackEfficiency {
    pub pack_id: String,
    pub pack_name: String,
    pub price: Decimal,
    pub gained_currency: u64,
    pub cost_per_currency: Decimal,
    /// Cost of one reference-priced draw worth of currency
    pub cost_per_draw: Decimal,
    pub is_bonus_variant: bool,
}

/// Result of a shopping solve.
///
/// `feasible` is false when no combination of packs reaches the target; such
/// a plan buys nothing and reports the whole target as both overfill and
/// shortfall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingPlan {
    pub needed_currency: u64,
    pub gained_currency: u64,
    pub overfill_currency: u64,
    pub shortfall_currency: u64,
    pub total_cost: Decimal,
    pub feasible: bool,
    pub list: Vec<ShoppingListItem>,
    pub efficiencies: Vec<PackEfficiency>,
}

impl ShoppingPlan {
    pub(crate) fn empty() -> Self {
        Self {
            needed_currency: 0,
            gained_currency: 0,
            overfill_currency: 0,
            shortfall_currency: 0,
            total_cost: Decimal::ZERO,
            feasible: true,
            list: Vec::new(),
            efficiencies: Vec::new(),
        }
    }

    pub(crate) fn infeasible(needed: u64, efficiencies: Vec<PackEfficiency>) -> Self {
        Self {
            needed_currency: needed,
            overfill_currency: needed,
            shortfall_currency: needed,
            feasible: false,
            efficiencies,
            ..Self::empty()
        }
    }

    pub fn total_packs(&self) -> u32 {
        self.list.iter().map(|item| item.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monthly() -> RechargePack {
        RechargePack {
            id: "welkin".to_string(),
            name: "Monthly Card".to_string(),
            kind: PackKind::Monthly,
            price: Decimal::from(30),
            premium_currency_id: "crystal".to_string(),
            premium_amount: Decimal::from(300),
            first_purchase_bonus_amount: None,
            duration_days: Some(30),
            daily_main_currency_amount: Some(Decimal::from(90)),
        }
    }

    #[test]
    fn test_monthly_gain_includes_stipend() {
        assert_eq!(monthly().total_gain(), Decimal::from(3000));
    }

    #[test]
    fn test_direct_gain_ignores_stipend() {
        let pack = RechargePack {
            kind: PackKind::Direct,
            ..monthly()
        };
        assert_eq!(pack.total_gain(), Decimal::from(300));
    }

    #[test]
    fn test_minor_unit_conversion_rounds_half_up() {
        assert_eq!(to_minor_units(Decimal::new(648, 2)), 648);
        assert_eq!(to_minor_units(Decimal::new(1005, 3)), 101);
        assert_eq!(to_minor_units(Decimal::from(648)), 64800);
        assert_eq!(from_minor_units(64800), Decimal::from(648));
        assert_eq!(from_minor_units(648).to_string(), "6.48");
    }

    #[test]
    fn test_floor_amount() {
        assert_eq!(floor_amount(Decimal::new(1999, 1)), 199);
        assert_eq!(floor_amount(Decimal::from(-5)), 0);
    }

    #[test]
    fn test_pack_json_uses_catalog_field_names() {
        let json = r#"{
            "id": "p6480",
            "name": "6480 Crystals",
            "kind": "direct",
            "priceCNY": "648",
            "premiumCurrencyId": "crystal",
            "premiumAmount": 6480,
            "firstPurchaseBonusAmount": "6480"
        }"#;
        let pack: RechargePack = serde_json::from_str(json).unwrap();
        assert_eq!(pack.price, Decimal::from(648));
        assert_eq!(pack.first_purchase_bonus_amount, Some(Decimal::from(6480)));
        assert_eq!(pack.duration_days, None);
    }

    #[test]
    fn test_total_packs_counts_every_purchase() {
        let item = |id: &str, count: u32| ShoppingListItem {
            pack_id: id.to_string(),
            pack_name: id.to_string(),
            count,
            is_bonus_variant: false,
            unit_price: Decimal::from(6),
            gained_currency: 60 * count as u64,
        };
        assert_eq!(ShoppingPlan::empty().total_packs(), 0);
        let plan = ShoppingPlan {
            list: vec![item("p60", 3), item("p300", 1)],
            ..ShoppingPlan::empty()
        };
        assert_eq!(plan.total_packs(), 4);
    }
}
