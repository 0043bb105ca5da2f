// Monte Carlo defaults
pub const DEFAULT_SIM_RUNS: u32 = 10_000;
pub const PLANNER_SIM_RUNS: u32 = 5_000;
pub const MAX_DRAWS_PER_RUN: u64 = 1_000_000;
pub const SIM_CHUNK_SIZE: u32 = 256;

// Percentile thresholds, in whole percent
pub const PERCENTILE_LUCKY: u32 = 10;
pub const PERCENTILE_MEDIAN: u32 = 50;
pub const PERCENTILE_UNLUCKY: u32 = 90;

// Money and display
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;
pub const AVG_COST_DECIMAL_PLACES: u32 = 2;
pub const EFFICIENCY_SIGNIFICANT_DIGITS: u32 = 8;
/// Currency per single draw used for the "cost per draw" efficiency column.
pub const REFERENCE_DRAW_COST: i64 = 160;

// Benefit chart horizon: max trigger + padding, clamped to [min, max]
pub const BENEFIT_CHART_PADDING: u32 = 30;
pub const BENEFIT_CHART_MIN_PAID: u32 = 120;
pub const BENEFIT_CHART_MAX_PAID: u32 = 300;
/// Paid-draw spacing of the effective cost rows in the text report.
pub const EFFECTIVE_COST_REPORT_STEP: usize = 30;

// Configuration file discovery
pub const CONFIG_APP_NAME: &str = "gacha-planner";
pub const CONFIG_FILE_NAME: &str = "game.json";
