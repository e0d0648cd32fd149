//! Sliding-window memory trend tracking

use crate::detector::{classify, LeakRisk};
use crate::error::{MonitorError, Result};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Bytes per megabyte used for every rate in this module.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Tick-to-tick growth below this magnitude (MB/s) counts as stable.
pub const STABILITY_TOLERANCE_MB_S: f64 = 0.1;

/// Minimum window length before window-wide metrics are meaningful.
pub const MIN_TREND_SAMPLES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub rss: f64,
    pub at: Instant,
}

/// Tick-to-tick state, recomputed from the two newest samples on every insert.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendState {
    /// Signed growth between the two newest samples, MB/s.
    pub growth_rate: f64,
    pub is_stable: bool,
    /// Time spent continuously stable. Restarts at zero on the tick that enters stability.
    pub stable_for: Duration,
    pub last_stable_rss: f64,
}

impl Default for TrendState {
    fn default() -> Self {
        Self {
            growth_rate: 0.0,
            is_stable: true,
            stable_for: Duration::ZERO,
            last_stable_rss: 0.0,
        }
    }
}

/// Window-wide aggregates. Computed on demand, never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendMetrics {
    pub sample_count: usize,
    /// Growth between the oldest and newest sample in the window, MB/s.
    pub avg_growth_rate: f64,
    /// More than two thirds of adjacent steps moved strictly upward.
    pub consistent_growth: bool,
    pub stabilization_time: Duration,
}

#[derive(Debug, Clone)]
pub struct MemoryTrend {
    samples: VecDeque<Sample>,
    capacity: usize,
    state: TrendState,
}

impl MemoryTrend {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(MonitorError::InvalidWindow);
        }
        Ok(Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            state: TrendState::default(),
        })
    }

    /// Record one RSS reading. `rss` is expected to be a non-negative byte count.
    pub fn add_sample(&mut self, rss: f64, at: Instant) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(Sample { rss, at });
        self.update_state();
    }

    fn update_state(&mut self) {
        let n = self.samples.len();
        if n < 2 {
            self.state.growth_rate = 0.0;
            return;
        }

        let previous = self.samples[n - 2];
        let recent = self.samples[n - 1];
        // Clock anomalies (equal or reversed instants) yield zero elapsed time.
        let elapsed = recent
            .at
            .checked_duration_since(previous.at)
            .unwrap_or(Duration::ZERO);
        let dt = elapsed.as_secs_f64();

        if dt > 0.0 {
            self.state.growth_rate = ((recent.rss - previous.rss) / BYTES_PER_MB) / dt;
        }

        if self.state.growth_rate.abs() < STABILITY_TOLERANCE_MB_S {
            if self.state.is_stable {
                self.state.stable_for += elapsed;
            } else {
                self.state.is_stable = true;
                self.state.stable_for = Duration::ZERO;
            }
            self.state.last_stable_rss = recent.rss;
        } else {
            self.state.is_stable = false;
            self.state.stable_for = Duration::ZERO;
        }
    }

    pub fn metrics(&self) -> TrendMetrics {
        let sample_count = self.samples.len();
        if sample_count < MIN_TREND_SAMPLES {
            return TrendMetrics {
                sample_count,
                ..TrendMetrics::default()
            };
        }

        // Both ends exist: sample_count >= MIN_TREND_SAMPLES.
        let first = self.samples[0];
        let last = self.samples[sample_count - 1];
        let span = last
            .at
            .checked_duration_since(first.at)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        let avg_growth_rate = if span > 0.0 {
            ((last.rss - first.rss) / BYTES_PER_MB) / span
        } else {
            0.0
        };

        let growth_count = self
            .samples
            .iter()
            .zip(self.samples.iter().skip(1))
            .filter(|(prev, next)| next.rss > prev.rss)
            .count();
        // growth_count > 2/3 * steps, kept in integers
        let consistent_growth = 3 * growth_count > 2 * (sample_count - 1);

        let stabilization_time = if self.state.is_stable {
            self.state.stable_for
        } else {
            Duration::ZERO
        };

        TrendMetrics {
            sample_count,
            avg_growth_rate,
            consistent_growth,
            stabilization_time,
        }
    }

    pub fn analyze(&self) -> LeakRisk {
        classify(&self.metrics(), &self.state)
    }

    pub fn state(&self) -> &TrendState {
        &self.state
    }

    pub fn samples(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
