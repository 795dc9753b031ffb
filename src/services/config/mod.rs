//! TOML configuration for the scheduler binary.
//!
//! Loaded from the platform config directory (or an explicit path); a
//! missing file just means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the appointment store API.
    pub api_base_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Longest bookable appointment, in minutes.
    pub max_appointment_minutes: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3001/api".to_string(),
            request_timeout_secs: 20,
            max_appointment_minutes: 120,
        }
    }
}

impl Config {
    /// Path of the per-user config file, when the platform exposes one.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "ClinicScheduler", "SchedulerApp")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load from the default location, falling back to defaults when no
    /// file exists.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        let config = toml::from_str(&data)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;
        Ok(config)
    }
}
