use super::types::{
    BannerBenefit, BenefitChartPoint, BenefitKind, BenefitTriggerPoint, EffectiveCostPoint,
    RewardType, TriggerReward,
};
use crate::constants::{
    AVG_COST_DECIMAL_PLACES, BENEFIT_CHART_MAX_PAID, BENEFIT_CHART_MIN_PAID,
    BENEFIT_CHART_PADDING,
};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;

/// Trigger draw count -> merged rewards, ordered by trigger.
pub type TriggerMap = BTreeMap<u32, TriggerReward>;

fn clamp_count(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

/// Merge every step of `kind` into one entry per trigger point.
///
/// Free draws at a shared trigger are summed and box flags OR-ed. Steps that
/// grant neither are dropped.
pub fn build_trigger_map(schedule: &[BannerBenefit], kind: BenefitKind) -> TriggerMap {
    let mut map = TriggerMap::new();
    for benefit in schedule.iter().filter(|b| b.kind == kind) {
        for step in &benefit.steps {
            let trigger = clamp_count(step.trigger_pulls);
            let free: u32 = step
                .rewards
                .iter()
                .filter(|r| r.reward_type == RewardType::FreePulls)
                .map(|r| clamp_count(r.amount))
                .fold(0u32, |acc, n| acc.saturating_add(n));
            let has_box = step
                .rewards
                .iter()
                .any(|r| r.reward_type == RewardType::SelectUpFiveStarBox && r.amount > 0);

            if free == 0 && !has_box {
                continue;
            }

            let entry = map.entry(trigger).or_default();
            entry.free_draws = entry.free_draws.saturating_add(free);
            entry.has_bonus_box |= has_box;
        }
    }
    map
}

/// All merged trigger points of both kinds, sorted by trigger.
pub fn extract_trigger_points(schedule: &[BannerBenefit]) -> Vec<BenefitTriggerPoint> {
    let mut points: Vec<BenefitTriggerPoint> = BenefitKind::ALL
        .iter()
        .flat_map(|&kind| {
            build_trigger_map(schedule, kind)
                .into_iter()
                .map(move |(trigger_pulls, reward)| BenefitTriggerPoint {
                    trigger_pulls,
                    kind,
                    free_pulls: reward.free_draws,
                    has_bonus_box: reward.has_bonus_box,
                })
        })
        .collect();
    // Stable: one-time before cumulative at equal triggers
    points.sort_by_key(|p| p.trigger_pulls);
    points
}

/// One chart row per trigger with both kinds side by side.
pub fn chart_points(schedule: &[BannerBenefit]) -> Vec<BenefitChartPoint> {
    let mut rows: BTreeMap<u32, BenefitChartPoint> = BTreeMap::new();
    for point in extract_trigger_points(schedule) {
        let row = rows.entry(point.trigger_pulls).or_insert(BenefitChartPoint {
            trigger_pulls: point.trigger_pulls,
            ..Default::default()
        });
        match point.kind {
            BenefitKind::OneTime => row.one_time_free_pulls += point.free_pulls,
            BenefitKind::Cumulative => row.cumulative_free_pulls += point.free_pulls,
        }
        row.has_bonus_box |= point.has_bonus_box;
    }
    rows.into_values().collect()
}

/// Total free draws granted by one kind across the whole schedule.
pub fn total_free_draws(schedule: &[BannerBenefit], kind: BenefitKind) -> u32 {
    build_trigger_map(schedule, kind)
        .values()
        .map(|r| r.free_draws)
        .sum()
}

/// Paid-draw range worth charting: last trigger plus padding, clamped.
pub fn chart_horizon(schedule: &[BannerBenefit]) -> u32 {
    let max_trigger = extract_trigger_points(schedule)
        .iter()
        .map(|p| p.trigger_pulls)
        .max()
        .unwrap_or(0);
    max_trigger
        .saturating_add(BENEFIT_CHART_PADDING)
        .clamp(BENEFIT_CHART_MIN_PAID, BENEFIT_CHART_MAX_PAID)
}

/// Total draws a paid budget turns into once schedule rewards are added.
///
/// Free draws are always spent before paid ones. Rewards at trigger 0 are in
/// the starting balance; every other reward lands when the running total
/// reaches its trigger.
pub fn simulate_total_draws(paid_draws: u32, schedule: &[BannerBenefit]) -> u32 {
    let one_time = build_trigger_map(schedule, BenefitKind::OneTime);
    let cumulative = build_trigger_map(schedule, BenefitKind::Cumulative);
    let reward_at = |total: u64| -> u64 {
        let Ok(total) = u32::try_from(total) else {
            return 0;
        };
        let a = one_time.get(&total).map_or(0, |r| r.free_draws);
        let b = cumulative.get(&total).map_or(0, |r| r.free_draws);
        a as u64 + b as u64
    };
    let last_trigger = one_time
        .keys()
        .chain(cumulative.keys())
        .copied()
        .max()
        .unwrap_or(0) as u64;

    let mut paid_remaining = paid_draws as u64;
    let mut free_remaining = reward_at(0);
    let mut total: u64 = 0;

    // Past the last trigger nothing more is granted
    while total < last_trigger && (paid_remaining > 0 || free_remaining > 0) {
        if free_remaining > 0 {
            free_remaining -= 1;
        } else {
            paid_remaining -= 1;
        }
        total += 1;
        free_remaining += reward_at(total);
    }

    (total + paid_remaining + free_remaining).min(u32::MAX as u64) as u32
}

/// Average cost per draw for every paid budget from 0 to `max_paid_pulls`.
///
/// Averages are rounded half-up to two decimals; a budget yielding no draws
/// averages zero.
pub fn effective_cost_series(
    cost_per_paid_pull: Decimal,
    schedule: &[BannerBenefit],
    max_paid_pulls: u32,
) -> Vec<EffectiveCostPoint> {
    (0..=max_paid_pulls)
        .map(|paid| {
            let total = simulate_total_draws(paid, schedule);
            let avg = if total == 0 {
                Decimal::ZERO
            } else {
                (cost_per_paid_pull * Decimal::from(paid) / Decimal::from(total))
                    .round_dp_with_strategy(
                        AVG_COST_DECIMAL_PLACES,
                        RoundingStrategy::MidpointAwayFromZero,
                    )
            };
            EffectiveCostPoint {
                paid_pulls: paid,
                total_pulls: total,
                avg_cost_per_pull: avg,
            }
        })
        .collect()
}
