//! Leak risk classification

use crate::trend::{TrendMetrics, TrendState, MIN_TREND_SAMPLES};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Stability held longer than this overrides any growth signal.
pub const STABLE_OVERRIDE: Duration = Duration::from_secs(5);
pub const HIGH_GROWTH_MB_S: f64 = 1.0;
pub const MEDIUM_GROWTH_MB_S: f64 = 0.2;
/// Unstable growth faster than this is Medium even when not yet consistent.
pub const RAPID_GROWTH_MB_S: f64 = 0.5;
pub const RAPID_WINDOW: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LeakRisk {
    Low,
    Medium,
    High,
}

impl LeakRisk {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeakRisk::Low => "Low",
            LeakRisk::Medium => "Medium",
            LeakRisk::High => "High",
        }
    }

    pub fn is_elevated(&self) -> bool {
        !matches!(self, LeakRisk::Low)
    }
}

impl fmt::Display for LeakRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify the window. Rules are not mutually exclusive; the first match wins.
pub fn classify(metrics: &TrendMetrics, state: &TrendState) -> LeakRisk {
    if metrics.sample_count < MIN_TREND_SAMPLES {
        return LeakRisk::Low;
    }

    if state.is_stable && state.stable_for > STABLE_OVERRIDE {
        return LeakRisk::Low;
    }

    if metrics.consistent_growth {
        if metrics.avg_growth_rate > HIGH_GROWTH_MB_S {
            return LeakRisk::High;
        }
        if metrics.avg_growth_rate > MEDIUM_GROWTH_MB_S {
            return LeakRisk::Medium;
        }
    }

    if !state.is_stable
        && metrics.stabilization_time < RAPID_WINDOW
        && metrics.avg_growth_rate > RAPID_GROWTH_MB_S
    {
        return LeakRisk::Medium;
    }

    // Mild positive growth, flat, or shrinking.
    LeakRisk::Low
}
