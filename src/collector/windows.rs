use super::{ProcessCollector, ProcessInfo};
use crate::error::{MonitorError, Result};
use std::mem;
use std::ptr;
use windows_sys::Win32::Foundation::{CloseHandle, ERROR_INVALID_PARAMETER, HANDLE};
use windows_sys::Win32::System::ProcessStatus::{
    K32EnumProcesses, K32GetModuleBaseNameW, K32GetProcessMemoryInfo, PROCESS_MEMORY_COUNTERS,
};
use windows_sys::Win32::System::Threading::{
    OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION, PROCESS_VM_READ,
};

const MAX_NAME_LEN: usize = 260;

/// Open process handle, closed on drop.
struct ProcessHandle(HANDLE);

impl ProcessHandle {
    fn open(pid: u32) -> Result<Self> {
        let handle = unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION | PROCESS_VM_READ, 0, pid) };
        if handle.is_null() {
            let err = std::io::Error::last_os_error();
            // OpenProcess reports an unknown pid as an invalid parameter
            if err.raw_os_error() == Some(ERROR_INVALID_PARAMETER as i32) {
                return Err(MonitorError::ProcessNotFound { pid });
            }
            return Err(MonitorError::from_proc_io(pid, err));
        }
        Ok(Self(handle))
    }

    fn working_set(&self, pid: u32) -> Result<u64> {
        let mut counters: PROCESS_MEMORY_COUNTERS = unsafe { mem::zeroed() };
        let cb = mem::size_of::<PROCESS_MEMORY_COUNTERS>() as u32;
        counters.cb = cb;
        let ok = unsafe { K32GetProcessMemoryInfo(self.0, &mut counters, cb) };
        if ok == 0 {
            return Err(MonitorError::from_proc_io(pid, std::io::Error::last_os_error()));
        }
        Ok(counters.WorkingSetSize as u64)
    }

    fn base_name(&self) -> Option<String> {
        let mut buf = [0u16; MAX_NAME_LEN];
        let len = unsafe {
            K32GetModuleBaseNameW(self.0, ptr::null_mut(), buf.as_mut_ptr(), buf.len() as u32)
        };
        if len == 0 {
            return None;
        }
        Some(String::from_utf16_lossy(&buf[..len as usize]))
    }
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        unsafe { CloseHandle(self.0) };
    }
}

/// Samples the working set size through psapi.
pub struct WindowsProcessCollector;

impl WindowsProcessCollector {
    pub fn new() -> Self {
        Self
    }

    fn pids() -> Vec<u32> {
        let mut pids = vec![0u32; 1024];
        loop {
            let bytes = (pids.len() * mem::size_of::<u32>()) as u32;
            let mut needed = 0u32;
            let ok = unsafe { K32EnumProcesses(pids.as_mut_ptr(), bytes, &mut needed) };
            if ok == 0 {
                return Vec::new();
            }
            // A full buffer may have been truncated
            if needed < bytes {
                pids.truncate(needed as usize / mem::size_of::<u32>());
                return pids;
            }
            pids.resize(pids.len() * 2, 0);
        }
    }
}

impl Default for WindowsProcessCollector {
    fn default() -> Self { Self::new() }
}

impl ProcessCollector for WindowsProcessCollector {
    fn rss_bytes(&self, pid: u32) -> Result<u64> {
        ProcessHandle::open(pid)?.working_set(pid)
    }

    fn get_process(&self, pid: u32) -> Option<ProcessInfo> {
        let handle = ProcessHandle::open(pid).ok()?;
        let rss_bytes = handle.working_set(pid).ok()?;
        let name = handle.base_name().unwrap_or_default();
        Some(ProcessInfo { pid, name, rss_bytes })
    }

    fn list_processes(&self) -> Vec<ProcessInfo> {
        let mut processes: Vec<ProcessInfo> = Self::pids()
            .into_iter()
            .filter(|pid| *pid != 0)
            // Protected and system processes refuse the handle and are skipped
            .filter_map(|pid| self.get_process(pid))
            .collect();
        processes.sort_by_key(|p| p.pid);
        processes
    }
}
