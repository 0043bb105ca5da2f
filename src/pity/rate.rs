use super::types::PityConfig;

/// Clamp a probability to [0, 1]. NaN maps to 0.
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() || value < 0.0 {
        0.0
    } else if value > 1.0 {
        1.0
    } else {
        value
    }
}

/// Success probability of the draw at `draw_index` (1-based, counted since
/// the last success).
///
/// Draws at or past hard pity always succeed. Inside the soft-pity window the
/// base rate grows linearly by `increase_per_pull` per draw.
pub fn rate_at(config: &PityConfig, draw_index: u32) -> f64 {
    let draw_index = draw_index.max(1);
    if draw_index >= config.effective_hard_pity() {
        return 1.0;
    }

    let base = clamp01(config.base_rate);
    let rate = match config.soft_pity {
        Some(soft) if draw_index >= soft.start => {
            let steps = (draw_index - soft.start + 1) as f64;
            base + soft.increase_per_pull * steps
        }
        _ => base,
    };

    clamp01(rate)
}
