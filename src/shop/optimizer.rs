use super::types::{
    floor_amount, from_minor_units, to_minor_units, PackEfficiency, PurchaseVariant,
    RechargePack, ShoppingListItem, ShoppingPlan,
};
use crate::constants::{EFFICIENCY_SIGNIFICANT_DIGITS, REFERENCE_DRAW_COST};
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

const UNREACHABLE: i64 = i64::MAX;

/// Expand a catalog into purchase variants.
///
/// Every pack with a positive gain and price yields a regular variant; packs
/// with a first-purchase bonus also yield a bonus variant worth
/// `gain + bonus`, buyable once.
pub fn expand_variants(packs: &[RechargePack]) -> Vec<PurchaseVariant> {
    let mut variants = Vec::new();
    for pack in packs {
        let total_gain = pack.total_gain();
        let gain = floor_amount(total_gain);
        let cost = to_minor_units(pack.price);
        if gain == 0 || cost <= 0 {
            debug!("skipping pack {}: gain {} cost {}", pack.id, gain, cost);
            continue;
        }

        variants.push(PurchaseVariant {
            pack_id: pack.id.clone(),
            name: pack.name.clone(),
            is_bonus_variant: false,
            currency_gain: gain,
            cost_minor_units: cost,
        });

        if let Some(bonus) = pack.first_purchase_bonus_amount {
            let bonus_gain = floor_amount(total_gain + bonus);
            if bonus_gain > 0 {
                variants.push(PurchaseVariant {
                    pack_id: pack.id.clone(),
                    name: pack.name.clone(),
                    is_bonus_variant: true,
                    currency_gain: bonus_gain,
                    cost_minor_units: cost,
                });
            }
        }
    }
    variants
}

/// Cheapest set of packs that yields at least `needed_currency`.
pub fn optimize_shopping(needed_currency: Decimal, packs: &[RechargePack]) -> ShoppingPlan {
    let needed = floor_amount(needed_currency);
    optimize_variants(needed, &expand_variants(packs))
}

/// Exact minimum-cost cover over pre-built variants.
///
/// Table `cost[amt]` holds the cheapest way to gain exactly `amt`, for
/// `amt` up to `needed + max_gain` (any cheapest plan overshoots by less
/// than one pack). Regular variants are relaxed with ascending amounts so a
/// pass can reuse them; bonus variants with descending amounts so each is
/// taken at most once. The winning amount is the cheapest in
/// `needed..=limit`, the smallest on ties.
pub fn optimize_variants(needed: u64, variants: &[PurchaseVariant]) -> ShoppingPlan {
    if needed == 0 {
        return ShoppingPlan::empty();
    }

    let variants: Vec<&PurchaseVariant> = variants
        .iter()
        .filter(|v| v.currency_gain > 0 && v.cost_minor_units > 0)
        .collect();
    if variants.is_empty() {
        warn!("no usable packs for a target of {}", needed);
        return ShoppingPlan::infeasible(needed, Vec::new());
    }

    let max_gain = variants.iter().map(|v| v.currency_gain).max().unwrap_or(0);
    let target = needed as usize;
    let limit = target + max_gain as usize;
    debug!(
        "shopping solve: {} variants, target {}, table size {}",
        variants.len(),
        needed,
        limit + 1
    );

    let mut cost = vec![UNREACHABLE; limit + 1];
    cost[0] = 0;

    // Regular variants: predecessor links are final once this stage ends.
    let mut prev_amount = vec![usize::MAX; limit + 1];
    let mut prev_variant = vec![usize::MAX; limit + 1];
    let (bonus, regular): (Vec<usize>, Vec<usize>) =
        (0..variants.len()).partition(|&i| variants[i].is_bonus_variant);

    for &idx in &regular {
        let item = variants[idx];
        let gain = item.currency_gain as usize;
        for amt in gain..=limit {
            let from = amt - gain;
            if cost[from] == UNREACHABLE {
                continue;
            }
            let candidate = cost[from] + item.cost_minor_units;
            if candidate < cost[amt] {
                cost[amt] = candidate;
                prev_amount[amt] = from;
                prev_variant[amt] = idx;
            }
        }
    }

    // Bonus variants: one decision layer per item so reconstruction can
    // never route through the same bonus twice.
    let mut took = vec![vec![false; limit + 1]; bonus.len()];
    for (layer, &idx) in bonus.iter().enumerate() {
        let item = variants[idx];
        let gain = item.currency_gain as usize;
        if gain > limit {
            continue;
        }
        for amt in (gain..=limit).rev() {
            let from = amt - gain;
            if cost[from] == UNREACHABLE {
                continue;
            }
            let candidate = cost[from] + item.cost_minor_units;
            if candidate < cost[amt] {
                cost[amt] = candidate;
                took[layer][amt] = true;
            }
        }
    }

    let mut best_amount = None;
    let mut best_cost = UNREACHABLE;
    for (amt, &c) in cost.iter().enumerate().skip(target) {
        if c < best_cost {
            best_cost = c;
            best_amount = Some(amt);
        }
    }

    let efficiencies = efficiency_table(&variants);
    let Some(best_amount) = best_amount else {
        warn!("target {} unreachable with the given packs", needed);
        return ShoppingPlan::infeasible(needed, efficiencies);
    };

    // Walk bonus layers newest-first, then regular predecessor links.
    let mut used: Vec<u32> = vec![0; variants.len()];
    let mut cur = best_amount;
    for (layer, &idx) in bonus.iter().enumerate().rev() {
        if took[layer][cur] {
            used[idx] += 1;
            cur -= variants[idx].currency_gain as usize;
        }
    }
    while cur > 0 {
        let idx = prev_variant[cur];
        let from = prev_amount[cur];
        if idx == usize::MAX || from == usize::MAX {
            break;
        }
        used[idx] += 1;
        cur = from;
    }

    promote_first_purchases(&variants, &mut used);

    let list = shopping_list(&variants, &used);
    let gained: u64 = list.iter().map(|item| item.gained_currency).sum();
    let total_minor: i64 = variants
        .iter()
        .zip(&used)
        .map(|(v, &n)| v.cost_minor_units * n as i64)
        .sum();

    debug!(
        "shopping plan: {} packs, cost {}, gained {} for target {}",
        list.iter().map(|i| i.count).sum::<u32>(),
        from_minor_units(total_minor),
        gained,
        needed
    );

    ShoppingPlan {
        needed_currency: needed,
        gained_currency: gained,
        overfill_currency: gained.saturating_sub(needed),
        shortfall_currency: needed.saturating_sub(gained),
        total_cost: from_minor_units(total_minor),
        feasible: gained >= needed,
        list,
        efficiencies,
    }
}

/// A pack's first purchase always carries its bonus: if the plan buys a
/// pack's regular variant while the pack's unused bonus variant costs the
/// same, one regular copy becomes the bonus copy.
fn promote_first_purchases(variants: &[&PurchaseVariant], used: &mut [u32]) {
    for (bonus_idx, bonus) in variants.iter().enumerate() {
        if !bonus.is_bonus_variant || used[bonus_idx] > 0 {
            continue;
        }
        let regular = variants.iter().position(|v| {
            !v.is_bonus_variant
                && v.pack_id == bonus.pack_id
                && v.cost_minor_units == bonus.cost_minor_units
        });
        if let Some(regular_idx) = regular {
            if used[regular_idx] > 0 {
                used[regular_idx] -= 1;
                used[bonus_idx] = 1;
            }
        }
    }
}

/// Group used variants into list lines: bonus lines first, then by pack id.
fn shopping_list(variants: &[&PurchaseVariant], used: &[u32]) -> Vec<ShoppingListItem> {
    let mut lines: BTreeMap<(bool, String), ShoppingListItem> = BTreeMap::new();
    for (variant, &count) in variants.iter().zip(used) {
        if count == 0 {
            continue;
        }
        let line = lines
            .entry((!variant.is_bonus_variant, variant.pack_id.clone()))
            .or_insert_with(|| ShoppingListItem {
                pack_id: variant.pack_id.clone(),
                pack_name: variant.name.clone(),
                count: 0,
                is_bonus_variant: variant.is_bonus_variant,
                unit_price: variant.price(),
                gained_currency: 0,
            });
        line.count += count;
        line.gained_currency += variant.currency_gain * count as u64;
    }
    lines.into_values().collect()
}

fn round_significant(value: Decimal) -> Decimal {
    value
        .round_sf(EFFICIENCY_SIGNIFICANT_DIGITS)
        .unwrap_or(value)
        .normalize()
}

/// Rank every variant by cost per unit of currency.
///
/// Ties put bonus variants first, then order by pack id. Informational only:
/// the ranking does not depend on any chosen plan.
pub fn efficiency_table(variants: &[&PurchaseVariant]) -> Vec<PackEfficiency> {
    let reference = Decimal::from(REFERENCE_DRAW_COST);
    let mut table: Vec<PackEfficiency> = variants
        .iter()
        .map(|v| {
            let gain = Decimal::from(v.currency_gain);
            let price = v.price();
            PackEfficiency {
                pack_id: v.pack_id.clone(),
                pack_name: v.name.clone(),
                price,
                gained_currency: v.currency_gain,
                cost_per_currency: round_significant(price / gain),
                cost_per_draw: round_significant(price * reference / gain),
                is_bonus_variant: v.is_bonus_variant,
            }
        })
        .collect();

    table.sort_by(|a, b| {
        a.cost_per_currency
            .cmp(&b.cost_per_currency)
            .then(b.is_bonus_variant.cmp(&a.is_bonus_variant))
            .then_with(|| a.pack_id.cmp(&b.pack_id))
    });
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shop::PackKind;

    fn variant(id: &str, bonus: bool, gain: u64, cost: i64) -> PurchaseVariant {
        PurchaseVariant {
            pack_id: id.to_string(),
            name: id.to_uppercase(),
            is_bonus_variant: bonus,
            currency_gain: gain,
            cost_minor_units: cost,
        }
    }

    fn pack(id: &str, price: i64, amount: i64, bonus: Option<i64>) -> RechargePack {
        RechargePack {
            id: id.to_string(),
            name: id.to_string(),
            kind: PackKind::Direct,
            price: Decimal::from(price),
            premium_currency_id: "crystal".to_string(),
            premium_amount: Decimal::from(amount),
            first_purchase_bonus_amount: bonus.map(Decimal::from),
            duration_days: None,
            daily_main_currency_amount: None,
        }
    }

    #[test]
    fn test_zero_target_is_empty_plan() {
        let plan = optimize_shopping(Decimal::ZERO, &[pack("a", 6, 60, None)]);
        assert!(plan.feasible);
        assert!(plan.list.is_empty());
        assert_eq!(plan.total_cost, Decimal::ZERO);
        assert_eq!(plan.gained_currency, 0);
    }

    #[test]
    fn test_fractional_target_is_floored() {
        let plan = optimize_shopping(Decimal::new(9, 1), &[pack("a", 6, 60, None)]);
        assert_eq!(plan.needed_currency, 0);
        assert!(plan.list.is_empty());
    }

    #[test]
    fn test_no_usable_packs_is_infeasible() {
        let plan = optimize_shopping(Decimal::from(100), &[pack("free", 0, 60, None)]);
        assert!(!plan.feasible);
        assert_eq!(plan.gained_currency, 0);
        assert_eq!(plan.total_cost, Decimal::ZERO);
        assert_eq!(plan.overfill_currency, 100);
        assert_eq!(plan.shortfall_currency, 100);
    }

    #[test]
    fn test_beats_greedy_on_overshoot() {
        // Best ratio pack overshoots; two small packs are cheaper.
        let variants = vec![variant("big", false, 1000, 900), variant("small", false, 300, 300)];
        let plan = optimize_variants(600, &variants);
        assert_eq!(plan.total_cost, Decimal::from(6));
        assert_eq!(plan.list.len(), 1);
        assert_eq!(plan.list[0].pack_id, "small");
        assert_eq!(plan.list[0].count, 2);
        assert_eq!(plan.overfill_currency, 0);
    }

    #[test]
    fn test_bonus_never_taken_twice() {
        // Bonus is the cheapest way to every multiple of 120; it must still
        // appear at most once.
        let variants = vec![variant("a", false, 60, 600), variant("a", true, 120, 600)];
        let plan = optimize_variants(240, &variants);
        for item in &plan.list {
            if item.is_bonus_variant {
                assert_eq!(item.count, 1);
            }
        }
        assert!(plan.gained_currency >= 240);
        // bonus (120) + 2 regular (120) = 18.00
        assert_eq!(plan.total_cost, Decimal::from(18));
    }

    #[test]
    fn test_two_bonus_variants_each_used_once() {
        let variants = vec![
            variant("a", false, 100, 1000),
            variant("a", true, 200, 1000),
            variant("b", false, 300, 3000),
            variant("b", true, 600, 3000),
        ];
        let plan = optimize_variants(800, &variants);
        assert_eq!(plan.total_cost, Decimal::from(40));
        assert_eq!(plan.gained_currency, 800);
        assert!(plan.list.iter().all(|i| !i.is_bonus_variant || i.count == 1));
    }

    #[test]
    fn test_first_purchase_promotion() {
        let plan = optimize_shopping(Decimal::from(60), &[pack("a", 6, 60, Some(60))]);
        assert_eq!(plan.total_cost, Decimal::from(6));
        assert_eq!(plan.list.len(), 1);
        assert!(plan.list[0].is_bonus_variant);
        assert_eq!(plan.gained_currency, 120);
        assert_eq!(plan.overfill_currency, 60);
    }

    #[test]
    fn test_only_bonus_variants_can_be_infeasible() {
        let variants = vec![variant("a", true, 50, 100)];
        let plan = optimize_variants(80, &variants);
        assert!(!plan.feasible);
        assert!(plan.list.is_empty());
        assert_eq!(plan.efficiencies.len(), 1);
    }

    #[test]
    fn test_efficiency_order() {
        let variants = vec![
            variant("a", false, 60, 600),
            variant("a", true, 120, 600),
            variant("b", false, 6480, 64800),
        ];
        let refs: Vec<&PurchaseVariant> = variants.iter().collect();
        let table = efficiency_table(&refs);
        assert_eq!(table[0].pack_id, "a");
        assert!(table[0].is_bonus_variant);
        assert_eq!(table[0].cost_per_currency, Decimal::new(5, 2));
        assert_eq!(table[0].cost_per_draw, Decimal::from(8));
        // a and b tie at 0.1 per unit: pack id breaks the tie
        assert_eq!(table[1].pack_id, "a");
        assert_eq!(table[2].pack_id, "b");
    }

    #[test]
    fn test_list_sorted_bonus_first() {
        let plan = optimize_shopping(
            Decimal::from(1000),
            &[pack("z", 30, 300, Some(300)), pack("a", 6, 60, None)],
        );
        assert!(plan.feasible);
        assert!(plan.list[0].is_bonus_variant);
        assert_eq!(plan.list[0].pack_id, "z");
    }
}
