use super::types::{ChartPoint, Pdf};
use crate::pity::{rate_at, DrawState, PityConfig};
use log::debug;

/// Distribution of the number of draws until the next success.
///
/// Offset `i` runs from 1 to the remaining distance to hard pity, so the
/// result always has at least one non-reserved entry and its mass sums to 1
/// (hard pity is certain).
pub fn success_pdf(config: &PityConfig, state: &DrawState) -> Pdf {
    let hard_pity = config.effective_hard_pity();
    let pity_counter = state.pity_counter;
    let remaining = hard_pity.saturating_sub(pity_counter).max(1) as usize;

    let mut mass = vec![0.0; remaining + 1];
    let mut survival = 1.0;
    for (offset, slot) in mass.iter_mut().enumerate().skip(1) {
        let rate = rate_at(config, pity_counter.saturating_add(offset as u32));
        *slot = survival * rate;
        survival *= 1.0 - rate;
    }

    Pdf::from_masses(mass)
}

/// Distribution of the number of draws until the next featured success.
///
/// Without a loss guarantee (or with the guarantee already earned) every
/// success counts and this equals [`success_pdf`]. Otherwise the result is a
/// mixture over how many non-featured successes come first: `k` losses cost
/// `k` extra fresh-pity cycles and happen with weight
/// `lose^k * win` (or `lose^k` once the guarantee forces the win).
pub fn featured_pdf(config: &PityConfig, state: &DrawState) -> Pdf {
    let first = success_pdf(config, state);
    let remaining = state.remaining_loses(config);
    if !config.has_loss_guarantee() || remaining == 0 {
        return first;
    }

    let win_rate = config.effective_win_rate();
    let lose_rate = 1.0 - win_rate;
    let fresh = success_pdf(config, &DrawState::fresh());

    let mut result = Pdf::zeroed(0);
    let mut chain = first;
    for loses in 0..=remaining {
        if loses > 0 {
            chain = convolve(&chain, &fresh);
        }
        let win_weight = if loses == remaining { 1.0 } else { win_rate };
        let weight = lose_rate.powi(loses as i32) * win_weight;
        result.add_weighted(&chain, weight);
    }
    result.clamp_entries();

    debug!(
        "featured pdf: {} mixture components, horizon {} draws",
        remaining + 1,
        result.max_draws()
    );
    result
}

/// Distribution of the sum of two independent draw counts.
pub fn convolve(a: &Pdf, b: &Pdf) -> Pdf {
    let len = (a.len() + b.len()).saturating_sub(1).max(1);
    let mut mass = vec![0.0; len];
    for (i, pa) in a.iter() {
        if pa == 0.0 {
            continue;
        }
        for (j, pb) in b.iter() {
            if pb == 0.0 {
                continue;
            }
            mass[i + j] += pa * pb;
        }
    }
    Pdf::from_masses(mass)
}

/// Distribution of draws needed for `count` independent hits of `single`.
pub fn multi_target_pdf(single: &Pdf, count: u32) -> Pdf {
    let count = count.max(1);
    let mut result = single.clone();
    for _ in 1..count {
        result = convolve(&result, single);
    }
    result
}

/// Running cumulative chance, in percent, for every draw count.
pub fn cumulative_from_pdf(pdf: &Pdf) -> Vec<ChartPoint> {
    let mut cumulative = 0.0;
    pdf.iter()
        .map(|(draws, p)| {
            cumulative += p;
            ChartPoint {
                draws: draws as u32,
                chance_percent: cumulative * 100.0,
            }
        })
        .collect()
}

/// Exact distribution of draws until `target_count` featured hits, starting
/// from `state`. Only the first hit sees the starting state.
pub fn target_pdf(config: &PityConfig, state: &DrawState, target_count: u32) -> Pdf {
    let first = featured_pdf(config, state);
    if target_count <= 1 {
        return first;
    }
    let repeat = featured_pdf(config, &DrawState::fresh());
    let rest = multi_target_pdf(&repeat, target_count - 1);
    convolve(&first, &rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pity::SoftPity;

    fn genshin_like() -> PityConfig {
        PityConfig {
            base_rate: 0.006,
            soft_pity: Some(SoftPity {
                start: 74,
                increase_per_pull: 0.06,
            }),
            hard_pity: 90,
            featured_win_rate: 0.5,
            guaranteed_after_loses: 1,
        }
    }

    fn flat(rate: f64, hard_pity: u32) -> PityConfig {
        PityConfig {
            base_rate: rate,
            soft_pity: None,
            hard_pity,
            featured_win_rate: 0.5,
            guaranteed_after_loses: 1,
        }
    }

    #[test]
    fn test_success_pdf_sums_to_one() {
        let pdf = success_pdf(&genshin_like(), &DrawState::fresh());
        assert_eq!(pdf.max_draws(), 90);
        assert!((pdf.total_mass() - 1.0).abs() < 1e-9);
        assert!(pdf.iter().all(|(_, p)| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn test_success_pdf_expectation() {
        // Known mean for this ruleset
        let pdf = success_pdf(&genshin_like(), &DrawState::fresh());
        assert!((pdf.expected_draws() - 62.297).abs() < 0.01);
    }

    #[test]
    fn test_success_pdf_resumes_from_pity() {
        let pdf = success_pdf(&genshin_like(), &DrawState::new(80, false));
        assert_eq!(pdf.max_draws(), 10);
        assert!((pdf.total_mass() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_success_pdf_past_hard_pity_is_immediate() {
        let pdf = success_pdf(&genshin_like(), &DrawState::new(120, false));
        assert_eq!(pdf.as_slice(), &[0.0, 1.0]);
    }

    #[test]
    fn test_convolve_small() {
        let a = Pdf::from_masses(vec![0.0, 0.5, 0.5]);
        let b = Pdf::from_masses(vec![0.0, 1.0]);
        let c = convolve(&a, &b);
        assert_eq!(c.len(), 4);
        assert_eq!(c.as_slice(), &[0.0, 0.0, 0.5, 0.5]);
    }

    #[test]
    fn test_featured_equals_success_without_guarantee() {
        let config = PityConfig {
            guaranteed_after_loses: 0,
            ..genshin_like()
        };
        let state = DrawState::new(12, false);
        assert_eq!(featured_pdf(&config, &state), success_pdf(&config, &state));
    }

    #[test]
    fn test_featured_equals_success_when_guaranteed() {
        let config = genshin_like();
        let state = DrawState::new(30, true);
        assert_eq!(featured_pdf(&config, &state), success_pdf(&config, &state));
    }

    #[test]
    fn test_featured_mixture_weights() {
        // Hard pity 1: every draw succeeds, so featured lands on draw 1 or 2.
        let config = flat(0.0, 1);
        let pdf = featured_pdf(&config, &DrawState::fresh());
        assert!((pdf.get(1) - 0.5).abs() < 1e-12);
        assert!((pdf.get(2) - 0.5).abs() < 1e-12);
        assert!((pdf.total_mass() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_featured_pdf_median_and_mean() {
        let pdf = featured_pdf(&genshin_like(), &DrawState::fresh());
        assert_eq!(pdf.percentile(50.0), 80);
        assert!((pdf.expected_draws() - 93.446).abs() < 0.01);
    }

    #[test]
    fn test_multi_target_mass_and_mean() {
        let single = featured_pdf(&genshin_like(), &DrawState::fresh());
        let double = multi_target_pdf(&single, 2);
        assert!(double.total_mass() <= 1.0 + 1e-9);
        assert!((double.expected_draws() - 2.0 * single.expected_draws()).abs() < 1e-6);
        assert_eq!(multi_target_pdf(&single, 0), single);
    }

    #[test]
    fn test_cumulative_series_ends_at_hundred() {
        let pdf = success_pdf(&flat(0.1, 10), &DrawState::fresh());
        let series = cumulative_from_pdf(&pdf);
        assert_eq!(series.len(), 10);
        assert_eq!(series[0].draws, 1);
        assert!((series[0].chance_percent - 10.0).abs() < 1e-9);
        assert!((series[9].chance_percent - 100.0).abs() < 1e-9);
        assert!(series.windows(2).all(|w| w[0].chance_percent <= w[1].chance_percent));
    }

    #[test]
    fn test_target_pdf_single_matches_featured() {
        let config = genshin_like();
        let state = DrawState::new(40, false);
        assert_eq!(target_pdf(&config, &state, 1), featured_pdf(&config, &state));
    }
}
