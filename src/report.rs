//! Per-tick report and its renderers

use crate::detector::LeakRisk;
use crate::error::Result;
use crate::trend::BYTES_PER_MB;
use serde::{Deserialize, Serialize};
use std::io::Write;

mod table;

pub use table::TableRenderer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryReport {
    /// RFC 3339 wall-clock time of the sample.
    pub timestamp: String,
    /// Resident set size in bytes.
    pub rss: f64,
    pub leak_risk: LeakRisk,
    /// Bytes gained (or lost) since the previous report. Omitted when zero.
    #[serde(default, skip_serializing_if = "no_growth")]
    pub growth: Option<f64>,
}

fn no_growth(growth: &Option<f64>) -> bool {
    growth.map_or(true, |g| g == 0.0)
}

impl MemoryReport {
    pub fn rss_mb(&self) -> f64 {
        self.rss / BYTES_PER_MB
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Text,
    Json,
}

pub trait Renderer {
    fn render(&mut self, report: &MemoryReport) -> Result<()>;
}

/// One JSON object per line.
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render(&mut self, report: &MemoryReport) -> Result<()> {
        serde_json::to_writer(&mut self.out, report)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Three-line plain text block.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, report: &MemoryReport) -> Result<()> {
        writeln!(
            self.out,
            "Timestamp: {}\nRSS: {:.2} MB\nLeak Risk: {}",
            report.timestamp,
            report.rss_mb(),
            report.leak_risk
        )?;
        self.out.flush()?;
        Ok(())
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, report: &MemoryReport) -> Result<()> {
        (**self).render(report)
    }
}

/// Human-readable size with two decimals (B, KB, MB, GB).
pub fn format_memory(bytes: u64) -> String {
    const KB: u64 = 1 << 10;
    const MB: u64 = 1 << 20;
    const GB: u64 = 1 << 30;

    match bytes {
        b if b >= GB => format!("{:.2} GB", b as f64 / GB as f64),
        b if b >= MB => format!("{:.2} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.2} KB", b as f64 / KB as f64),
        b => format!("{} B", b),
    }
}
