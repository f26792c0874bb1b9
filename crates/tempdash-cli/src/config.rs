//! Configuration file management.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tempdash_core::PollingIntervals;
use tempdash_types::{HOURLY_INTERVAL_MS, HistoryQuery};

/// Backend used when neither the flag, the env var nor the file names one.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5001";

/// Device selected automatically once the list has loaded.
pub const DEFAULT_DEVICE_NAME: &str = "MyTempSensor";

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the dashboard backend
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Name of the device selected on startup
    #[serde(default = "default_device")]
    pub default_device: Option<String>,

    /// Seconds between latest-reading refreshes
    #[serde(default = "default_realtime_interval")]
    pub realtime_interval_secs: u64,

    /// Seconds between statistics refreshes
    #[serde(default = "default_stats_interval")]
    pub stats_interval_secs: u64,

    /// Chart bucket width in milliseconds
    #[serde(default = "default_history_interval")]
    pub history_interval_ms: u64,

    /// Chart lookback in days (backend default when unset)
    #[serde(default)]
    pub history_days: Option<u32>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// One-key questions offered in the chat panel
    #[serde(default = "default_suggested_replies")]
    pub suggested_replies: Vec<String>,

    /// TUI-specific settings
    #[serde(default)]
    pub tui: TuiConfig,
}

/// TUI-specific configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuiConfig {
    /// Theme preference: "dark" or "light"
    #[serde(default = "default_theme")]
    pub theme: String,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
        }
    }
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_device() -> Option<String> {
    Some(DEFAULT_DEVICE_NAME.to_string())
}

fn default_realtime_interval() -> u64 {
    5
}

fn default_stats_interval() -> u64 {
    60
}

fn default_history_interval() -> u64 {
    HOURLY_INTERVAL_MS
}

fn default_request_timeout() -> u64 {
    10
}

fn default_suggested_replies() -> Vec<String> {
    vec![
        "這台設備現在狀況如何？".to_string(),
        "今天的溫度變化正常嗎？".to_string(),
        "本週溫度有異常嗎？".to_string(),
    ]
}

fn default_theme() -> String {
    "dark".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            default_device: default_device(),
            realtime_interval_secs: default_realtime_interval(),
            stats_interval_secs: default_stats_interval(),
            history_interval_ms: default_history_interval(),
            history_days: None,
            request_timeout_secs: default_request_timeout(),
            suggested_replies: default_suggested_replies(),
            tui: TuiConfig::default(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tempdash")
            .join("config.toml")
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load config from a specific file, or return default if it is missing or invalid
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config: {}", e);
                    }
                },
                Err(e) => {
                    eprintln!("Warning: Failed to read config: {}", e);
                }
            }
        }
        Self::default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    /// Save config to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Backend URL, preferring an explicit value (flag or env var).
    pub fn resolve_url(&self, explicit: Option<&str>) -> String {
        explicit
            .filter(|u| !u.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.backend_url.clone())
    }

    /// Polling periods. Zero values fall back to the defaults.
    pub fn polling_intervals(&self) -> PollingIntervals {
        let defaults = PollingIntervals::default();
        PollingIntervals {
            realtime: non_zero_secs(self.realtime_interval_secs).unwrap_or(defaults.realtime),
            stats: non_zero_secs(self.stats_interval_secs).unwrap_or(defaults.stats),
        }
    }

    /// Query used to build the dashboard chart.
    pub fn history_query(&self) -> HistoryQuery {
        let mut query = HistoryQuery::hourly_temperature().with_days(self.history_days);
        if self.history_interval_ms > 0 {
            query.interval_ms = self.history_interval_ms;
        }
        query
    }

    /// Per-request timeout for the backend client.
    pub fn request_timeout(&self) -> Duration {
        non_zero_secs(self.request_timeout_secs).unwrap_or(tempdash_core::DEFAULT_TIMEOUT)
    }

    /// Name of the device to select automatically, if any.
    pub fn default_device_name(&self) -> Option<&str> {
        self.default_device.as_deref().filter(|n| !n.is_empty())
    }
}

fn non_zero_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
