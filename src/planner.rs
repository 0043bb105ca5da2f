//! Budget planning for one banner: what the player owns, how far it goes,
//! and what it would cost to reach the median and unlucky outcomes.

use crate::benefits::{
    chart_horizon, chart_points, effective_cost_series, total_free_draws, BenefitChartPoint,
    BenefitKind, EffectiveCostPoint,
};
use crate::config::{Banner, GameConfig};
use crate::constants::{
    EFFECTIVE_COST_REPORT_STEP, PERCENTILE_LUCKY, PERCENTILE_MEDIAN, PERCENTILE_UNLUCKY,
};
use crate::distribution::target_pdf;
use crate::exchange::{convert_by_direct_rate, find_direct_rate};
use crate::pity::{DrawState, PityConfig};
use crate::shop::{optimize_shopping, ShoppingPlan};
use crate::simulator::{run_simulation, Percentiles, SimConfig, SimulationResult};
use log::{info, warn};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// Inputs of one planning query.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub target_count: u32,
    pub state: DrawState,
    /// Main currency on hand
    pub owned_main: Decimal,
    /// Premium currency on hand, converted at the game's direct rate
    pub owned_premium: Decimal,
    pub sim: SimConfig,
    /// Also compute the exact distribution alongside the simulation
    pub exact: bool,
}

impl Default for PlanRequest {
    fn default() -> Self {
        Self {
            target_count: 1,
            state: DrawState::fresh(),
            owned_main: Decimal::ZERO,
            owned_premium: Decimal::ZERO,
            sim: SimConfig::planner(1, DrawState::fresh()),
            exact: false,
        }
    }
}

/// Summary of the exact draw-count distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExactSummary {
    pub expected_draws: f64,
    pub percentiles: Percentiles,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAnalysis {
    pub game_name: String,
    pub banner_id: String,
    pub banner_name: String,
    pub target_count: u32,
    pub cost_per_pull: Decimal,
    /// Display name of the currency draws are paid in
    pub cost_currency: String,
    pub owned_main_equivalent: Decimal,
    pub affordable_draws: u64,
    pub chance_within_budget: f64,
    pub simulation: SimulationResult,
    pub exact: Option<ExactSummary>,
    pub need_for_p50: Decimal,
    pub need_for_p90: Decimal,
    pub plan_p50: ShoppingPlan,
    pub plan_p90: ShoppingPlan,
    pub benefit_chart: Vec<BenefitChartPoint>,
    pub one_time_free_draws: u32,
    pub cumulative_free_draws: u32,
    /// Average cost per draw for every paid budget up to the chart horizon
    pub effective_cost: Vec<EffectiveCostPoint>,
}

/// Owned main currency plus owned premium converted into it.
///
/// Negative main balances count as nothing. Premium is ignored when it is
/// negative or when the game defines no premium-to-main rate.
pub fn owned_main_equivalent(config: &GameConfig, owned_main: Decimal, owned_premium: Decimal) -> Decimal {
    if owned_main.is_sign_negative() {
        return Decimal::ZERO;
    }
    if owned_premium.is_sign_negative() || owned_premium.is_zero() {
        return owned_main;
    }
    match convert_by_direct_rate(
        &config.exchange_rates,
        owned_premium,
        &config.default_premium_currency_id,
        &config.default_main_currency_id,
    ) {
        Some(converted) => owned_main + converted,
        None => {
            warn!(
                "no rate from {} to {}; premium balance ignored",
                config.default_premium_currency_id, config.default_main_currency_id
            );
            owned_main
        }
    }
}

/// Main currency still missing to afford `draws` draws.
pub fn currency_needed(draws: u32, cost_per_pull: Decimal, owned: Decimal) -> Decimal {
    (Decimal::from(draws) * cost_per_pull - owned).max(Decimal::ZERO)
}

/// Whole draws the owned balance pays for. Zero when draws are free or
/// mispriced.
pub fn affordable_draws(owned: Decimal, cost_per_pull: Decimal) -> u64 {
    if cost_per_pull <= Decimal::ZERO || owned <= Decimal::ZERO {
        return 0;
    }
    (owned / cost_per_pull).floor().to_u64().unwrap_or(u64::MAX)
}

/// Premium currency that buys `main_needed` of main currency, rounded up.
///
/// Falls back to one-to-one when no positive premium-to-main rate exists.
pub fn premium_needed(config: &GameConfig, main_needed: Decimal) -> Decimal {
    let rate = find_direct_rate(
        &config.exchange_rates,
        &config.default_premium_currency_id,
        &config.default_main_currency_id,
    )
    .map(|r| r.rate)
    .filter(|rate| *rate > Decimal::ZERO);
    match rate {
        Some(rate) if config.default_premium_currency_id != config.default_main_currency_id => {
            (main_needed / rate).ceil()
        }
        _ => main_needed,
    }
}

/// Run the full budget analysis for `banner_id`.
///
/// Returns `None` when the banner or its pity system is not in the config.
pub fn analyze_banner(config: &GameConfig, banner_id: &str, request: &PlanRequest) -> Option<BudgetAnalysis> {
    let banner = config.banner(banner_id)?;
    let pity = config.pity_for_banner(banner)?;
    Some(analyze(config, banner, &pity, request))
}

fn analyze(
    config: &GameConfig,
    banner: &Banner,
    pity: &PityConfig,
    request: &PlanRequest,
) -> BudgetAnalysis {
    let target_count = request.target_count.max(1);
    let sim = SimConfig {
        target_count,
        initial_state: request.state,
        ..request.sim.clone()
    };
    let simulation = run_simulation(pity, &sim);

    let exact = request.exact.then(|| {
        let pdf = target_pdf(pity, &request.state, target_count);
        ExactSummary {
            expected_draws: pdf.expected_draws(),
            percentiles: Percentiles {
                p10: pdf.percentile(PERCENTILE_LUCKY as f64) as u32,
                p50: pdf.percentile(PERCENTILE_MEDIAN as f64) as u32,
                p90: pdf.percentile(PERCENTILE_UNLUCKY as f64) as u32,
            },
        }
    });

    let cost_per_pull = banner.cost_per_pull;
    let owned = owned_main_equivalent(config, request.owned_main, request.owned_premium);
    let affordable = affordable_draws(owned, cost_per_pull);
    let chance_within_budget = simulation.chance_within(affordable.min(u32::MAX as u64) as u32);

    let need_for_p50 = currency_needed(simulation.percentiles.p50, cost_per_pull, owned);
    let need_for_p90 = currency_needed(simulation.percentiles.p90, cost_per_pull, owned);
    let plan_p50 = optimize_shopping(premium_needed(config, need_for_p50), &config.recharge_packs);
    let plan_p90 = optimize_shopping(premium_needed(config, need_for_p90), &config.recharge_packs);

    info!(
        "{}: {} owned covers {} draws ({:.1}% chance), p50 top-up {}",
        banner.id,
        owned,
        affordable,
        chance_within_budget * 100.0,
        plan_p50.total_cost
    );

    let cost_currency = config
        .currency(&banner.cost_currency_id)
        .map_or_else(|| banner.cost_currency_id.clone(), |c| c.name.clone());
    let effective_cost = effective_cost_series(
        cost_per_pull,
        &banner.benefits,
        chart_horizon(&banner.benefits),
    );

    BudgetAnalysis {
        game_name: config.name.clone(),
        banner_id: banner.id.clone(),
        banner_name: banner.name.clone(),
        target_count,
        cost_per_pull,
        cost_currency,
        owned_main_equivalent: owned,
        affordable_draws: affordable,
        chance_within_budget,
        simulation,
        exact,
        need_for_p50,
        need_for_p90,
        plan_p50,
        plan_p90,
        benefit_chart: chart_points(&banner.benefits),
        one_time_free_draws: total_free_draws(&banner.benefits, BenefitKind::OneTime),
        cumulative_free_draws: total_free_draws(&banner.benefits, BenefitKind::Cumulative),
        effective_cost,
    }
}

fn push_plan(report: &mut String, label: &str, need: Decimal, plan: &ShoppingPlan) {
    report.push_str(&format!("  {} - need {} more\n", label, need.round_dp(0)));
    if plan.needed_currency == 0 {
        report.push_str("    Nothing to buy.\n");
        return;
    }
    if !plan.feasible {
        report.push_str("    No pack combination reaches this amount.\n");
        return;
    }
    for item in &plan.list {
        let bonus = if item.is_bonus_variant { " (first purchase)" } else { "" };
        report.push_str(&format!(
            "    {:>3} x {:<24} @ {:>8} -> {}{}\n",
            item.count, item.pack_name, item.unit_price, item.gained_currency, bonus
        ));
    }
    report.push_str(&format!(
        "    Total: {} packs, {} for {} (+{} spare)\n",
        plan.total_packs(),
        plan.total_cost,
        plan.gained_currency,
        plan.overfill_currency
    ));
}

impl BudgetAnalysis {
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                      BUDGET PLAN REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");
        report.push_str(&format!("Game:    {}\n", self.game_name));
        report.push_str(&format!("Banner:  {} ({})\n", self.banner_name, self.banner_id));
        report.push_str(&format!("Target:  {} featured\n", self.target_count));
        report.push_str(&format!(
            "Cost:    {} {} per draw\n\n",
            self.cost_per_pull, self.cost_currency
        ));

        report.push_str(&self.simulation.to_text());
        report.push('\n');

        if let Some(exact) = &self.exact {
            report.push_str("── EXACT DISTRIBUTION ───────────────────────────────────────────\n");
            report.push_str(&format!(
                "  p10 / p50 / p90: {} / {} / {}\n",
                exact.percentiles.p10, exact.percentiles.p50, exact.percentiles.p90
            ));
            report.push_str(&format!("  Expected:        {:.2}\n\n", exact.expected_draws));
        }

        report.push_str("── BUDGET ───────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Owned (main equivalent): {}\n", self.owned_main_equivalent));
        report.push_str(&format!("  Affordable draws:        {}\n", self.affordable_draws));
        report.push_str(&format!(
            "  Chance within budget:    {:.1}%\n\n",
            self.chance_within_budget * 100.0
        ));

        report.push_str("── TOP-UP PLANS ─────────────────────────────────────────────────\n");
        push_plan(&mut report, "Median (p50)", self.need_for_p50, &self.plan_p50);
        push_plan(&mut report, "Unlucky (p90)", self.need_for_p90, &self.plan_p90);

        if !self.benefit_chart.is_empty() {
            let one_time = BenefitKind::OneTime.name();
            let cumulative = BenefitKind::Cumulative.name();
            report.push_str("\n── BANNER BENEFITS ──────────────────────────────────────────────\n");
            for row in &self.benefit_chart {
                let boxed = if row.has_bonus_box { " + select box" } else { "" };
                report.push_str(&format!(
                    "  @{:>4}: {:>3} {}, {:>3} {}{}\n",
                    row.trigger_pulls,
                    row.one_time_free_pulls,
                    one_time,
                    row.cumulative_free_pulls,
                    cumulative,
                    boxed
                ));
            }
            report.push_str(&format!(
                "  Free draws: {} {}, {} {}\n",
                self.one_time_free_draws, one_time, self.cumulative_free_draws, cumulative
            ));

            report.push_str("\n── EFFECTIVE COST ───────────────────────────────────────────────\n");
            let rows = self
                .effective_cost
                .iter()
                .skip(EFFECTIVE_COST_REPORT_STEP)
                .step_by(EFFECTIVE_COST_REPORT_STEP);
            for point in rows {
                report.push_str(&format!(
                    "  {:>4} paid -> {:>4} draws, {} per draw\n",
                    point.paid_pulls, point.total_pulls, point.avg_cost_per_pull
                ));
            }
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");
        report
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::ExchangeRate;

    fn game(rate: Option<Decimal>) -> GameConfig {
        GameConfig {
            id: "g".to_string(),
            name: "G".to_string(),
            default_main_currency_id: "gem".to_string(),
            default_premium_currency_id: "crystal".to_string(),
            currencies: vec![],
            pity_systems: vec![],
            banners: vec![],
            recharge_packs: vec![],
            exchange_rates: rate
                .map(|rate| {
                    vec![ExchangeRate {
                        from_currency_id: "crystal".to_string(),
                        to_currency_id: "gem".to_string(),
                        rate,
                    }]
                })
                .unwrap_or_default(),
        }
    }

    #[test]
    fn test_owned_equivalent_converts_premium() {
        let config = game(Some(Decimal::from(2)));
        assert_eq!(
            owned_main_equivalent(&config, Decimal::from(100), Decimal::from(50)),
            Decimal::from(200)
        );
    }

    #[test]
    fn test_owned_equivalent_edge_cases() {
        let config = game(None);
        assert_eq!(
            owned_main_equivalent(&config, Decimal::from(100), Decimal::from(50)),
            Decimal::from(100)
        );
        assert_eq!(
            owned_main_equivalent(&config, Decimal::from(-1), Decimal::from(50)),
            Decimal::ZERO
        );
        assert_eq!(
            owned_main_equivalent(&game(Some(Decimal::ONE)), Decimal::from(10), Decimal::from(-5)),
            Decimal::from(10)
        );
    }

    #[test]
    fn test_currency_needed_never_negative() {
        assert_eq!(currency_needed(80, Decimal::from(160), Decimal::from(1000)), Decimal::from(11800));
        assert_eq!(currency_needed(5, Decimal::from(160), Decimal::from(1000)), Decimal::ZERO);
    }

    #[test]
    fn test_affordable_draws_floors() {
        assert_eq!(affordable_draws(Decimal::from(1000), Decimal::from(160)), 6);
        assert_eq!(affordable_draws(Decimal::from(1000), Decimal::ZERO), 0);
        assert_eq!(affordable_draws(Decimal::ZERO, Decimal::from(160)), 0);
    }

    #[test]
    fn test_premium_needed_rounds_up() {
        assert_eq!(premium_needed(&game(Some(Decimal::from(2))), Decimal::from(5)), Decimal::from(3));
        assert_eq!(premium_needed(&game(None), Decimal::from(5)), Decimal::from(5));
    }

    #[test]
    fn test_unknown_banner() {
        assert!(analyze_banner(&game(None), "nope", &PlanRequest::default()).is_none());
    }
}
