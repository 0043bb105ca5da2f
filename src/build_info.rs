//! Compile-time build information.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// `gacha-planner 0.1.0 (abc1234, 2026-01-31)`
pub fn version_line() -> String {
    format!(
        "{} {} ({}, {})",
        crate::constants::CONFIG_APP_NAME,
        BUILD_VERSION,
        BUILD_COMMIT,
        BUILD_DATE
    )
}
