//! Client configuration
//!
//! Loads [`ClientConfig`] from a JSON file, then applies environment
//! overrides. Command-line flags are applied last by the binary.
//!
//! # File Location
//!
//! `settings.json` in the user's configuration directory, e.g.
//! `~/.config/gradeboard/settings.json` on Linux. Falls back to
//! `settings.json` in the working directory if no config dir exists.
//!
//! # Environment
//!
//! | Variable                  | Field                  |
//! |---------------------------|------------------------|
//! | `GRADEBOARD_URL`          | `service_url`          |
//! | `GRADEBOARD_POLL_SECS`    | `poll_interval_secs`   |
//! | `GRADEBOARD_TIMEOUT_SECS` | `request_timeout_secs` |
//!
//! A `.env` file is honored when the binary loads it with `dotenvy`.
//!
//! # Error Handling
//!
//! A missing or unreadable settings file is not fatal: loading logs a
//! warning and falls back to defaults. Invalid overrides and invalid URLs
//! are reported as [`ConfigError`].

use super::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Settings filename
const SETTINGS_FILENAME: &str = "settings.json";

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:6400/api";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const ENV_SERVICE_URL: &str = "GRADEBOARD_URL";
pub const ENV_POLL_SECS: &str = "GRADEBOARD_POLL_SECS";
pub const ENV_TIMEOUT_SECS: &str = "GRADEBOARD_TIMEOUT_SECS";

/// Connection settings for the engine service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL; endpoint paths are appended to it
    pub service_url: String,
    /// Seconds between `/health` probes
    pub poll_interval_secs: u64,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Check the URL and durations
    pub fn validate(&self) -> ConfigResult<()> {
        let url = reqwest::Url::parse(&self.service_url).map_err(|e| ConfigError::InvalidUrl {
            url: self.service_url.clone(),
            message: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: self.service_url.clone(),
                message: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "poll_interval_secs",
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "request_timeout_secs",
            });
        }
        Ok(())
    }

    /// Read a settings file; missing fields take their defaults
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Write the settings file, creating its directory if needed
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!("[CONFIG] Saved settings to {:?}", path);
        Ok(())
    }

    /// Load settings, falling back to defaults when the file is missing
    /// or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!("[CONFIG] No settings file found at {:?}. Using defaults.", path);
            return Self::default();
        }

        match Self::load_from(path) {
            Ok(config) => {
                info!("[CONFIG] Loaded settings from {:?}", path);
                config
            }
            Err(e) => {
                warn!(
                    "[CONFIG] Failed to load settings file at {:?}: {}. Using defaults.",
                    path, e
                );
                Self::default()
            }
        }
    }

    /// Apply `GRADEBOARD_*` environment overrides
    pub fn apply_env(&mut self) -> ConfigResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_SERVICE_URL) {
            self.service_url = url.trim().to_string();
        }
        if let Some(value) = lookup(ENV_POLL_SECS) {
            self.poll_interval_secs = parse_secs(ENV_POLL_SECS, &value)?;
        }
        if let Some(value) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = parse_secs(ENV_TIMEOUT_SECS, &value)?;
        }
        Ok(())
    }
}

fn parse_secs(key: &str, value: &str) -> ConfigResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidOverride {
            key: key.to_string(),
            value: value.to_string(),
        })
}

/// Resolve the settings file path
///
/// Returns `settings.json` in the user's configuration directory, or in
/// the working directory if the system config dir cannot be found.
pub fn settings_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "gradeboard", "gradeboard") {
        proj_dirs.config_dir().join(SETTINGS_FILENAME)
    } else {
        PathBuf::from(SETTINGS_FILENAME)
    }
}
