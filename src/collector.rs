//! Process discovery and RSS sampling (/proc on Linux, psapi on Windows)

use crate::error::Result;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "linux")]
pub use linux::LinuxProcessCollector;

#[cfg(windows)]
mod windows;

#[cfg(windows)]
pub use windows::WindowsProcessCollector;

/// Collector for the platform this binary was built for.
#[cfg(target_os = "linux")]
pub type SystemCollector = LinuxProcessCollector;

#[cfg(windows)]
pub type SystemCollector = WindowsProcessCollector;

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub rss_bytes: u64,
}

pub trait ProcessCollector: Send + Sync {
    /// Current resident set size of `pid` in bytes.
    fn rss_bytes(&self, pid: u32) -> Result<u64>;
    fn get_process(&self, pid: u32) -> Option<ProcessInfo>;
    fn list_processes(&self) -> Vec<ProcessInfo>;
}
