use mleak::MonitorError;
use std::io::{Error, ErrorKind};

#[test]
fn test_missing_proc_entry_is_not_found() {
    let err = MonitorError::from_proc_io(12, Error::from(ErrorKind::NotFound));
    assert!(matches!(err, MonitorError::ProcessNotFound { pid: 12 }));
}

#[test]
fn test_access_denied_is_permission_error() {
    let err = MonitorError::from_proc_io(1, Error::from(ErrorKind::PermissionDenied));
    assert!(matches!(err, MonitorError::PermissionDenied { pid: 1 }));
    assert_eq!(err.to_string(), "permission denied reading memory of process 1");
}

#[test]
fn test_other_io_failures_keep_source() {
    let err = MonitorError::from_proc_io(3, Error::new(ErrorKind::Other, "device gone"));
    match err {
        MonitorError::Io { pid, source } => {
            assert_eq!(pid, 3);
            assert_eq!(source.to_string(), "device gone");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
