use crate::pity::clamp01;
use serde::{Deserialize, Serialize};

/// Probability mass function over draw counts.
///
/// Index `i` holds P(event happens exactly on draw `i`). Index 0 is unused
/// and always zero. Entries past the end are implicitly zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pdf {
    mass: Vec<f64>,
}

impl Pdf {
    /// Build from raw masses, clamping every entry into [0, 1] and zeroing index 0.
    pub fn from_masses(mut mass: Vec<f64>) -> Self {
        if mass.is_empty() {
            mass.push(0.0);
        }
        mass[0] = 0.0;
        for m in mass.iter_mut() {
            *m = clamp01(*m);
        }
        Self { mass }
    }

    /// A PDF with every entry zero up to `max_draws`.
    pub fn zeroed(max_draws: usize) -> Self {
        Self {
            mass: vec![0.0; max_draws + 1],
        }
    }

    /// Length including the unused index 0.
    pub fn len(&self) -> usize {
        self.mass.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mass.len() <= 1
    }

    /// Largest draw count with storage.
    pub fn max_draws(&self) -> usize {
        self.mass.len().saturating_sub(1)
    }

    pub fn get(&self, draws: usize) -> f64 {
        self.mass.get(draws).copied().unwrap_or(0.0)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.mass
    }

    /// `(draws, probability)` pairs starting at draw 1.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.mass.iter().copied().enumerate().skip(1)
    }

    pub fn total_mass(&self) -> f64 {
        self.iter().map(|(_, p)| p).sum()
    }

    /// Mean draw count, sum of draws * probability.
    pub fn expected_draws(&self) -> f64 {
        self.iter().map(|(i, p)| i as f64 * p).sum()
    }

    /// Probability that the event has happened within `draws` draws.
    pub fn chance_within(&self, draws: usize) -> f64 {
        self.iter()
            .take_while(|(i, _)| *i <= draws)
            .map(|(_, p)| p)
            .sum()
    }

    /// Smallest draw count whose cumulative mass reaches `percent`.
    ///
    /// Falls back to the last index when rounding keeps the total just
    /// under the threshold.
    pub fn percentile(&self, percent: f64) -> usize {
        let target = clamp01(percent / 100.0);
        let mut cumulative = 0.0;
        for (i, p) in self.iter() {
            cumulative += p;
            if cumulative + 1e-12 >= target {
                return i;
            }
        }
        self.max_draws()
    }

    pub(crate) fn add_weighted(&mut self, other: &Pdf, weight: f64) {
        if weight == 0.0 {
            return;
        }
        if self.mass.len() < other.mass.len() {
            self.mass.resize(other.mass.len(), 0.0);
        }
        for (i, p) in other.iter() {
            self.mass[i] += p * weight;
        }
    }

    pub(crate) fn clamp_entries(&mut self) {
        for m in self.mass.iter_mut().skip(1) {
            *m = clamp01(*m);
        }
    }
}

/// One point of a cumulative chart series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub draws: u32,
    pub chance_percent: f64,
}
