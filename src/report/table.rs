use super::{MemoryReport, Renderer};
use crate::error::Result;
use crate::trend::BYTES_PER_MB;
use std::collections::VecDeque;
use std::io::Write;
use std::time::Duration;

const TOP_LEFT: &str = "┌";
const TOP_RIGHT: &str = "┐";
const BOTTOM_LEFT: &str = "└";
const BOTTOM_RIGHT: &str = "┘";
const HORIZONTAL: &str = "─";
const VERTICAL: &str = "│";
const TEE_DOWN: &str = "┬";
const TEE_UP: &str = "┴";
const TEE_RIGHT: &str = "├";
const TEE_LEFT: &str = "┤";
const CROSS: &str = "┼";

const TIME_WIDTH: usize = 12;
const RSS_WIDTH: usize = 11;
const RISK_WIDTH: usize = 11;

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";

/// Bounded table of the most recent reports, redrawn in full on every render.
pub struct TableRenderer<W: Write> {
    out: W,
    reports: VecDeque<MemoryReport>,
    max_rows: usize,
    pid: u32,
    process_name: String,
    interval: Duration,
    clear_screen: bool,
}

impl<W: Write> TableRenderer<W> {
    pub fn new(out: W, pid: u32, process_name: impl Into<String>, interval: Duration, max_rows: usize) -> Self {
        let max_rows = max_rows.max(1);
        Self {
            out,
            reports: VecDeque::with_capacity(max_rows),
            max_rows,
            pid,
            process_name: process_name.into(),
            interval,
            clear_screen: true,
        }
    }

    /// Skip the terminal clear before each redraw (used when output is not a tty).
    pub fn without_clear(mut self) -> Self {
        self.clear_screen = false;
        self
    }

    pub fn add_report(&mut self, report: MemoryReport) {
        if self.reports.len() >= self.max_rows {
            self.reports.pop_front();
        }
        self.reports.push_back(report);
    }

    pub fn reports(&self) -> impl Iterator<Item = &MemoryReport> + '_ {
        self.reports.iter()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn interval_label(&self) -> String {
        if self.interval < Duration::from_secs(1) {
            format!("{}ms", self.interval.as_millis())
        } else {
            format!("{:.0}s", self.interval.as_secs_f64())
        }
    }

    fn border(left: &str, middle: &str, right: &str) -> String {
        let cells: Vec<String> = [TIME_WIDTH, RSS_WIDTH, RISK_WIDTH]
            .iter()
            .map(|w| HORIZONTAL.repeat(*w))
            .collect();
        format!("{}{}{}", left, cells.join(middle), right)
    }

    fn growth_indicator(&self, prev: &MemoryReport, report: &MemoryReport) -> String {
        let growth_mb = (report.rss - prev.rss) / BYTES_PER_MB;
        if growth_mb < 1.0 {
            return String::new();
        }
        let marker = if report.leak_risk.is_elevated() { " !" } else { "" };
        format!("{} +{}MB/{}", marker, growth_mb as u64, self.interval_label())
    }

    pub fn draw(&mut self) -> Result<()> {
        let mut frame = String::new();
        if self.clear_screen {
            frame.push_str(CLEAR_SCREEN);
        }

        let process = if self.process_name.is_empty() {
            format!("PID {}", self.pid)
        } else {
            format!("PID {} ({})", self.pid, self.process_name)
        };
        frame.push_str(&format!(
            "[MLeak] Monitoring {} | Interval: {}\n",
            process,
            self.interval_label()
        ));

        frame.push_str(&Self::border(TOP_LEFT, TEE_DOWN, TOP_RIGHT));
        frame.push('\n');
        frame.push_str(&format!(
            "{v} {:<tw$} {v} {:<rw$} {v} {:<kw$} {v}\n",
            "Timestamp",
            "RSS",
            "Leak Risk",
            v = VERTICAL,
            tw = TIME_WIDTH - 2,
            rw = RSS_WIDTH - 2,
            kw = RISK_WIDTH - 2,
        ));
        frame.push_str(&Self::border(TEE_RIGHT, CROSS, TEE_LEFT));
        frame.push('\n');

        let mut prev: Option<&MemoryReport> = None;
        for report in &self.reports {
            let time = chrono::DateTime::parse_from_rfc3339(&report.timestamp)
                .map(|t| t.format("%H:%M:%S").to_string())
                .unwrap_or_else(|_| report.timestamp.clone());
            let rss = format!("{:.2} MB", report.rss_mb());
            let indicator = prev
                .map(|p| self.growth_indicator(p, report))
                .unwrap_or_default();

            frame.push_str(&format!(
                "{v} {:<tw$} {v} {:<rw$} {v} {:<kw$} {v}{}\n",
                time,
                rss,
                report.leak_risk.as_str(),
                indicator,
                v = VERTICAL,
                tw = TIME_WIDTH - 2,
                rw = RSS_WIDTH - 2,
                kw = RISK_WIDTH - 2,
            ));
            prev = Some(report);
        }

        frame.push_str(&Self::border(BOTTOM_LEFT, TEE_UP, BOTTOM_RIGHT));
        frame.push('\n');

        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Renderer for TableRenderer<W> {
    fn render(&mut self, report: &MemoryReport) -> Result<()> {
        self.add_report(report.clone());
        self.draw()
    }
}
