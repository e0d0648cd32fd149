//! Configuration management (TOML)

use crate::error::{MonitorError, Result};
use crate::report::OutputFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub interval_seconds: u64,
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Samples kept in the trend window.
    pub window_samples: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Rows kept on screen by the table renderer.
    pub table_rows: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 10,
            format: OutputFormat::Table,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self { window_samples: 20 }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { table_rows: 10 }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| MonitorError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `path`, falling back to defaults when it is missing or unusable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!("No config file found, using defaults");
            return Config::default();
        }
        Config::load(path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}, using defaults", e);
            Config::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        let io_err = |source| MonitorError::ConfigIo {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, content).map_err(io_err)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "mleak")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.general.interval_seconds)
    }
}
