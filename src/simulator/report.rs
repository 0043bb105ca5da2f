//! Simulation result aggregation and report generation.

use crate::constants::{PERCENTILE_LUCKY, PERCENTILE_MEDIAN, PERCENTILE_UNLUCKY};
use serde::Serialize;
use std::collections::BTreeMap;

/// Frequency map of run lengths.
///
/// Merging two maps is a plain associative sum, so independently simulated
/// batches can be combined in any grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawCounts {
    pub counts: BTreeMap<u32, u64>,
    pub runs: u64,
    pub runs_timed_out: u64,
}

impl DrawCounts {
    pub fn record(&mut self, draws: u32) {
        *self.counts.entry(draws).or_insert(0) += 1;
        self.runs += 1;
    }

    pub fn record_timeout(&mut self) {
        self.runs += 1;
        self.runs_timed_out += 1;
    }

    pub fn merge(mut self, other: DrawCounts) -> DrawCounts {
        for (draws, count) in other.counts {
            *self.counts.entry(draws).or_insert(0) += count;
        }
        self.runs += other.runs;
        self.runs_timed_out += other.runs_timed_out;
        self
    }
}

/// Share of runs that finished in exactly `draws` draws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistributionPoint {
    pub draws: u32,
    pub probability: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Percentiles {
    pub p10: u32,
    pub p50: u32,
    pub p90: u32,
}

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub num_runs: u64,
    pub runs_timed_out: u64,
    /// Sorted by draw count ascending
    pub distribution: Vec<DistributionPoint>,
    pub percentiles: Percentiles,
    pub expected_value: f64,
}

impl SimulationResult {
    /// Create a result from a run-length frequency map.
    pub fn from_counts(counts: &DrawCounts) -> Self {
        let runs = counts.runs.max(1);

        let distribution: Vec<DistributionPoint> = counts
            .counts
            .iter()
            .map(|(&draws, &count)| DistributionPoint {
                draws,
                probability: count as f64 / runs as f64,
            })
            .collect();

        let expected_value = counts
            .counts
            .iter()
            .map(|(&draws, &count)| draws as f64 * (count as f64 / runs as f64))
            .sum();

        let percentiles = Percentiles {
            p10: percentile(counts, PERCENTILE_LUCKY),
            p50: percentile(counts, PERCENTILE_MEDIAN),
            p90: percentile(counts, PERCENTILE_UNLUCKY),
        };

        Self {
            num_runs: counts.runs,
            runs_timed_out: counts.runs_timed_out,
            distribution,
            percentiles,
            expected_value,
        }
    }

    /// Share of runs that reached the target within `draws` draws.
    pub fn chance_within(&self, draws: u32) -> f64 {
        self.distribution
            .iter()
            .take_while(|p| p.draws <= draws)
            .map(|p| p.probability)
            .sum()
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    DRAW SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {} total, {} timed out\n\n",
            self.num_runs, self.runs_timed_out
        ));

        report.push_str("── DRAWS NEEDED ─────────────────────────────────────────────────\n");
        report.push_str(&format!("  Lucky (p10):     {}\n", self.percentiles.p10));
        report.push_str(&format!("  Median (p50):    {}\n", self.percentiles.p50));
        report.push_str(&format!("  Unlucky (p90):   {}\n", self.percentiles.p90));
        report.push_str(&format!("  Expected:        {:.1}\n\n", self.expected_value));

        report.push_str("── CUMULATIVE CHANCE ────────────────────────────────────────────\n");
        let max_draws = self.distribution.last().map(|p| p.draws).unwrap_or(0);
        let step = (max_draws / 10).max(1);
        let mut mark = step;
        while mark <= max_draws {
            let pct = self.chance_within(mark) * 100.0;
            let bar: String = "█".repeat((pct / 5.0) as usize);
            report.push_str(&format!("  ≤{:5}: {:>5.1}% {}\n", mark, pct, bar));
            mark += step;
        }

        if self.runs_timed_out > 0 {
            report.push_str(&format!(
                "\n  ⚠️  {} runs never reached the target - featured item unreachable?\n",
                self.runs_timed_out
            ));
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Smallest draw count whose cumulative share of runs reaches `percent`.
///
/// Compared in integer arithmetic so ties resolve to the first crossing.
fn percentile(counts: &DrawCounts, percent: u32) -> u32 {
    let threshold = percent.min(100) as u64 * counts.runs;
    let mut cumulative = 0u64;
    for (&draws, &count) in &counts.counts {
        cumulative += count;
        if cumulative * 100 >= threshold {
            return draws;
        }
    }
    counts.counts.keys().next_back().copied().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts_of(draws: &[u32]) -> DrawCounts {
        let mut counts = DrawCounts::default();
        for &d in draws {
            counts.record(d);
        }
        counts
    }

    #[test]
    fn test_report_generation() {
        let counts = counts_of(&[10, 10, 20, 30, 30, 30, 40, 50, 60, 70]);
        let result = SimulationResult::from_counts(&counts);

        assert_eq!(result.num_runs, 10);
        assert_eq!(result.distribution.len(), 7);
        assert_eq!(result.distribution[0].draws, 10);
        assert!((result.distribution[0].probability - 0.2).abs() < 1e-12);
        assert!((result.expected_value - 35.0).abs() < 1e-9);
        assert_eq!(result.percentiles.p10, 10);
        assert_eq!(result.percentiles.p50, 30);
        assert_eq!(result.percentiles.p90, 60);
    }

    #[test]
    fn test_percentile_takes_first_crossing() {
        // Exactly half the mass at 5
        let counts = counts_of(&[5, 9]);
        let result = SimulationResult::from_counts(&counts);
        assert_eq!(result.percentiles.p50, 5);
    }

    #[test]
    fn test_merge_is_associative_sum() {
        let a = counts_of(&[1, 2, 2]);
        let b = counts_of(&[2, 3]);
        let c = counts_of(&[3, 3, 4]);

        let left = a.clone().merge(b.clone()).merge(c.clone());
        let right = a.merge(b.merge(c));
        assert_eq!(left, right);
        assert_eq!(left.runs, 8);
        assert_eq!(left.counts[&3], 3);
    }

    #[test]
    fn test_timeouts_reduce_mass() {
        let mut counts = counts_of(&[4, 4]);
        counts.record_timeout();
        counts.record_timeout();
        let result = SimulationResult::from_counts(&counts);
        let mass: f64 = result.distribution.iter().map(|p| p.probability).sum();
        assert!((mass - 0.5).abs() < 1e-12);
        assert_eq!(result.runs_timed_out, 2);
        // p90 never reached, falls back to the longest recorded run
        assert_eq!(result.percentiles.p90, 4);
    }

    #[test]
    fn test_empty_counts() {
        let result = SimulationResult::from_counts(&DrawCounts::default());
        assert!(result.distribution.is_empty());
        assert_eq!(result.percentiles.p50, 0);
        assert_eq!(result.expected_value, 0.0);
    }

    #[test]
    fn test_text_and_json_render() {
        let result = SimulationResult::from_counts(&counts_of(&[3, 6, 9]));
        let text = result.to_text();
        assert!(text.contains("Median (p50):    6"));
        let json = result.to_json();
        assert!(json.contains("\"expected_value\""));
        assert!(json.contains("\"p90\": 9"));
    }
}
