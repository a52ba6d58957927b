//! Timing configuration for the indicator updater.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Nominal period between refresh passes (15 minutes).
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Upper bound for the per-instance scheduling skew (30 seconds).
///
/// Every updater instance draws one skew from `[0, SKEW_UPPER_BOUND]` at
/// construction and adds it to every scheduled delay, so independent
/// instances (e.g. one per window) do not fire in lockstep.
pub const SKEW_UPPER_BOUND: Duration = Duration::from_secs(30);

/// Timing configuration for [`IndicatorUpdater`](crate::IndicatorUpdater).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdaterConfig {
    /// Seconds between refresh passes (default: 900 = 15 min).
    pub interval_secs: u64,
    /// Upper bound in milliseconds for the random scheduling skew
    /// (default: 30 000). Set to 0 for a deterministic schedule.
    pub skew_bound_ms: u64,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            interval_secs: REFRESH_INTERVAL.as_secs(),
            skew_bound_ms: SKEW_UPPER_BOUND.as_millis() as u64,
        }
    }
}

impl UpdaterConfig {
    /// Interval between passes as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Skew upper bound as a [`Duration`].
    pub fn skew_bound(&self) -> Duration {
        Duration::from_millis(self.skew_bound_ms)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = UpdaterConfig::default();
        assert_eq!(config.interval(), REFRESH_INTERVAL);
        assert_eq!(config.skew_bound(), SKEW_UPPER_BOUND);
    }

    #[test]
    fn serde_round_trip() {
        let config = UpdaterConfig {
            interval_secs: 60,
            skew_bound_ms: 500,
        };
        let json = serde_json::to_string(&config).expect("serialize");
        let parsed: UpdaterConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, config);
    }

    #[test]
    fn duration_accessors() {
        let config = UpdaterConfig {
            interval_secs: 90,
            skew_bound_ms: 1_500,
        };
        assert_eq!(config.interval(), Duration::from_secs(90));
        assert_eq!(config.skew_bound(), Duration::from_millis(1_500));
    }
}
