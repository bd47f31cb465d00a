//! Widget configuration.
//!
//! Read from a JSON file; every field has a default so a partial or missing
//! file is fine. Front ends layer their own overrides (flags, env) on top.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::composer::DEFAULT_MAX_ROWS;
use crate::paths;
use crate::time_format::TimeFormat;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Shorter timeouts, including `0`, are raised to this.
pub const MIN_TIMEOUT_SECS: u64 = 1;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Backend origin; the `/api/...` paths are appended to it.
    pub base_url: String,
    pub time_format: TimeFormat,
    /// Upper bound on a single backend request.
    pub timeout_secs: u64,
    pub max_input_rows: usize,
    /// Where exchange logs go. No logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
    /// Example questions offered for quick asking.
    pub suggestions: Vec<String>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            time_format: TimeFormat::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_input_rows: DEFAULT_MAX_ROWS,
            log_dir: None,
            suggestions: vec![
                "Kapan jadwal UAS?".to_string(),
                "Jadwal kuliah kelas 1KA01".to_string(),
                "Siapa wali kelas 2IA03?".to_string(),
                "Jam buka loket BAAK".to_string(),
                "Kalender akademik semester ganjil".to_string(),
            ],
        }
    }
}

impl WidgetConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Load from `~/.config/baak/config.json`, or defaults without a home dir.
    pub fn load_default() -> Result<Self, ConfigError> {
        match paths::default_config_path() {
            Ok(path) => Self::load(&path),
            Err(e) => {
                log::debug!("{}, using default config", e);
                Ok(Self::default())
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        if self.timeout_secs < MIN_TIMEOUT_SECS {
            log::warn!(
                "timeout_secs = {} is too short, using {}s",
                self.timeout_secs,
                MIN_TIMEOUT_SECS
            );
        }
        Duration::from_secs(self.timeout_secs.max(MIN_TIMEOUT_SECS))
    }
}
