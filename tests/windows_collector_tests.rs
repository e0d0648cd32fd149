#![cfg(windows)]

use mleak::collector::{ProcessCollector, WindowsProcessCollector};
use mleak::MonitorError;

#[test]
fn test_rss_of_current_process() {
    let collector = WindowsProcessCollector::new();
    assert!(collector.rss_bytes(std::process::id()).unwrap() > 0);
}

#[test]
fn test_get_process_returns_current_process() {
    let collector = WindowsProcessCollector::new();
    let current_pid = std::process::id();
    let p = collector.get_process(current_pid).expect("Should find current process");
    assert_eq!(p.pid, current_pid);
    assert!(!p.name.is_empty());
    assert!(collector.list_processes().iter().any(|p| p.pid == current_pid));
}

#[test]
fn test_missing_process_is_not_found() {
    let collector = WindowsProcessCollector::new();
    // Windows pids are multiples of four
    assert!(matches!(
        collector.rss_bytes(0xFFFF_FFF1),
        Err(MonitorError::ProcessNotFound { .. })
    ));
}
