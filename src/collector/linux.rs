use super::{ProcessCollector, ProcessInfo};
use crate::error::{MonitorError, Result};
use std::fs;
use std::path::PathBuf;

const FALLBACK_PAGE_SIZE: u64 = 4096;

pub struct LinuxProcessCollector {
    proc_root: PathBuf,
    page_size: u64,
}

impl LinuxProcessCollector {
    pub fn new() -> Self {
        Self::with_proc_root("/proc")
    }

    /// Read process data from an alternate procfs mount.
    pub fn with_proc_root(root: impl Into<PathBuf>) -> Self {
        let raw = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        let page_size = if raw < 1 { FALLBACK_PAGE_SIZE } else { raw as u64 };
        Self {
            proc_root: root.into(),
            page_size,
        }
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    fn read_statm(&self, pid: u32) -> Result<u64> {
        let path = self.proc_root.join(pid.to_string()).join("statm");
        let content = fs::read_to_string(&path).map_err(|e| MonitorError::from_proc_io(pid, e))?;
        // Field 0 = total pages, field 1 = resident pages
        let resident = content
            .split_whitespace()
            .nth(1)
            .ok_or_else(|| MonitorError::MalformedStat {
                pid,
                detail: format!("statm has fewer than 2 fields: {:?}", content.trim()),
            })?;
        let pages: u64 = resident.parse().map_err(|_| MonitorError::MalformedStat {
            pid,
            detail: format!("resident page count {:?} is not a number", resident),
        })?;
        pages
            .checked_mul(self.page_size)
            .ok_or_else(|| MonitorError::MalformedStat {
                pid,
                detail: format!("resident page count {} overflows a byte count", pages),
            })
    }

    fn read_name(&self, pid: u32) -> Option<String> {
        let comm = fs::read_to_string(self.proc_root.join(pid.to_string()).join("comm")).ok()?;
        Some(comm.trim_end_matches('\n').to_string())
    }
}

impl Default for LinuxProcessCollector {
    fn default() -> Self { Self::new() }
}

impl ProcessCollector for LinuxProcessCollector {
    fn rss_bytes(&self, pid: u32) -> Result<u64> {
        self.read_statm(pid)
    }

    fn get_process(&self, pid: u32) -> Option<ProcessInfo> {
        let rss_bytes = self.read_statm(pid).ok()?;
        let name = self.read_name(pid).unwrap_or_default();
        Some(ProcessInfo { pid, name, rss_bytes })
    }

    fn list_processes(&self) -> Vec<ProcessInfo> {
        let mut processes = Vec::new();
        if let Ok(entries) = fs::read_dir(&self.proc_root) {
            for entry in entries.flatten() {
                if let Some(name) = entry.file_name().to_str() {
                    if let Ok(pid) = name.parse::<u32>() {
                        // Processes that exit mid-scan drop out here
                        if let Some(info) = self.get_process(pid) {
                            processes.push(info);
                        }
                    }
                }
            }
        }
        processes.sort_by_key(|p| p.pid);
        processes
    }
}
