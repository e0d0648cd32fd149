//! Error types shared by the library

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, MonitorError>;

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("process {pid} not found")]
    ProcessNotFound { pid: u32 },

    #[error("permission denied reading memory of process {pid}")]
    PermissionDenied { pid: u32 },

    #[error("failed to read memory of process {pid}: {source}")]
    Io {
        pid: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed /proc entry for process {pid}: {detail}")]
    MalformedStat { pid: u32, detail: String },

    #[error("sample window capacity must be at least 1")]
    InvalidWindow,

    #[error("sampling interval must be greater than zero")]
    InvalidInterval,

    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

impl MonitorError {
    /// Map an I/O failure while reading `/proc/<pid>/...` onto the sampler taxonomy.
    pub fn from_proc_io(pid: u32, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => MonitorError::ProcessNotFound { pid },
            std::io::ErrorKind::PermissionDenied => MonitorError::PermissionDenied { pid },
            _ => MonitorError::Io { pid, source: err },
        }
    }
}
