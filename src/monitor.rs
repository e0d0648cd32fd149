//! Sampling loop: sample, classify, render

use crate::collector::ProcessCollector;
use crate::detector::LeakRisk;
use crate::error::{MonitorError, Result};
use crate::report::{MemoryReport, Renderer};
use crate::trend::MemoryTrend;
use chrono::{DateTime, Local, SecondsFormat};
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Watches one process. Owns its trend window exclusively.
pub struct Monitor<C: ProcessCollector> {
    collector: C,
    pid: u32,
    trend: MemoryTrend,
    last_risk: Option<LeakRisk>,
}

impl<C: ProcessCollector> Monitor<C> {
    pub fn new(collector: C, pid: u32, window_samples: usize) -> Result<Self> {
        Ok(Self {
            collector,
            pid,
            trend: MemoryTrend::new(window_samples)?,
            last_risk: None,
        })
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn trend(&self) -> &MemoryTrend {
        &self.trend
    }

    /// Name of the monitored process, empty when it cannot be resolved.
    pub fn process_name(&self) -> String {
        self.collector
            .get_process(self.pid)
            .map(|p| p.name)
            .unwrap_or_default()
    }

    /// One sample-and-classify cycle. Sampler failures propagate unchanged.
    pub fn tick(&mut self, now: Instant, wall: DateTime<Local>) -> Result<MemoryReport> {
        let rss = self.collector.rss_bytes(self.pid)? as f64;
        let growth = self.trend.latest().map(|prev| rss - prev.rss);

        self.trend.add_sample(rss, now);
        let risk = self.trend.analyze();

        let state = self.trend.state();
        debug!(
            pid = self.pid,
            rss,
            growth_rate = state.growth_rate,
            stable = state.is_stable,
            risk = %risk,
            "sampled"
        );
        match self.last_risk {
            Some(prev) if prev < risk => {
                warn!(pid = self.pid, from = %prev, to = %risk, "leak risk increased")
            }
            Some(prev) if prev > risk => {
                info!(pid = self.pid, from = %prev, to = %risk, "leak risk decreased")
            }
            _ => {}
        }
        self.last_risk = Some(risk);

        Ok(MemoryReport {
            timestamp: wall.to_rfc3339_opts(SecondsFormat::Secs, false),
            rss,
            leak_risk: risk,
            growth,
        })
    }

    /// Run until the first sampler or render failure, which is returned.
    pub async fn run<R: Renderer + ?Sized>(&mut self, period: Duration, renderer: &mut R) -> Result<()> {
        if period.is_zero() {
            return Err(MonitorError::InvalidInterval);
        }
        let mut interval = tokio::time::interval(period);
        // A slow render delays the next tick rather than bunching samples.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(pid = self.pid, ?period, window = self.trend.capacity(), "monitoring started");

        loop {
            interval.tick().await;
            let report = self.tick(Instant::now(), Local::now())?;
            renderer.render(&report)?;
        }
    }
}
