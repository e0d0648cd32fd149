#![cfg(target_os = "linux")]

use mleak::collector::{LinuxProcessCollector, ProcessCollector};
use mleak::MonitorError;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_rss_of_current_process() {
    let collector = LinuxProcessCollector::new();
    let rss = collector.rss_bytes(std::process::id()).unwrap();
    assert!(rss > 0);
    assert_eq!(rss % collector.page_size(), 0);
}

#[test]
fn test_list_processes_returns_current_process() {
    let collector = LinuxProcessCollector::new();
    let processes = collector.list_processes();
    let current_pid = std::process::id();
    let found = processes.iter().any(|p| p.pid == current_pid);
    assert!(found, "Current process should be in the list");
}

#[test]
fn test_get_process_returns_current_process() {
    let collector = LinuxProcessCollector::new();
    let current_pid = std::process::id();
    let p = collector.get_process(current_pid).expect("Should find current process");
    assert_eq!(p.pid, current_pid);
    assert!(!p.name.is_empty());
}

#[test]
fn test_missing_process_is_not_found() {
    let collector = LinuxProcessCollector::new();
    assert!(collector.get_process(999999999).is_none());
    assert!(matches!(
        collector.rss_bytes(999999999),
        Err(MonitorError::ProcessNotFound { pid: 999999999 })
    ));
}

#[test]
fn test_reads_statm_from_custom_root() {
    let root = tempdir().unwrap();
    let proc_dir = root.path().join("4242");
    fs::create_dir_all(&proc_dir).unwrap();
    fs::write(proc_dir.join("statm"), "1000 250 30 1 0 200 0\n").unwrap();
    fs::write(proc_dir.join("comm"), "leaky\n").unwrap();
    fs::create_dir_all(root.path().join("self")).unwrap();

    let collector = LinuxProcessCollector::with_proc_root(root.path());
    let expected = 250 * collector.page_size();
    assert_eq!(collector.rss_bytes(4242).unwrap(), expected);

    let processes = collector.list_processes();
    assert_eq!(processes.len(), 1);
    assert_eq!(processes[0].name, "leaky");
    assert_eq!(processes[0].rss_bytes, expected);
}

#[test]
fn test_malformed_statm() {
    let root = tempdir().unwrap();
    let proc_dir = root.path().join("7");
    fs::create_dir_all(&proc_dir).unwrap();
    fs::write(proc_dir.join("statm"), "1000\n").unwrap();

    let collector = LinuxProcessCollector::with_proc_root(root.path());
    assert!(matches!(
        collector.rss_bytes(7),
        Err(MonitorError::MalformedStat { pid: 7, .. })
    ));

    fs::write(proc_dir.join("statm"), "1000 lots\n").unwrap();
    assert!(matches!(
        collector.rss_bytes(7),
        Err(MonitorError::MalformedStat { pid: 7, .. })
    ));
}

#[test]
fn test_statm_overflowing_byte_count() {
    let root = tempdir().unwrap();
    let proc_dir = root.path().join("9");
    fs::create_dir_all(&proc_dir).unwrap();
    fs::write(proc_dir.join("statm"), format!("1 {}\n", u64::MAX)).unwrap();

    let collector = LinuxProcessCollector::with_proc_root(root.path());
    assert!(matches!(
        collector.rss_bytes(9),
        Err(MonitorError::MalformedStat { pid: 9, .. })
    ));
}
