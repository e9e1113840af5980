//! Configuration management for ambientectl.
//!
//! Loads settings from `--config`, else `$XDG_CONFIG_HOME/ambiente/config.toml`,
//! else uses defaults. Command-line flags override file values.

use ambiente_shared::{CHART_ROUTE_MARKER, DEFAULT_DATA_PATH, DEFAULT_TIMESTAMP_FORMAT};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Shortest refresh period accepted; tokio intervals reject zero
pub const MIN_REFRESH_INTERVAL_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Station server, scheme and authority
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Readings endpoint path on the station server
    #[serde(default = "default_data_path")]
    pub data_path: String,

    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_ms: u64,

    /// Request timeout; the transport default applies when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,

    /// Route substring that selects the chart view
    #[serde(default = "default_chart_marker")]
    pub chart_route_marker: String,

    /// Route the dashboard opens on
    #[serde(default = "default_initial_route")]
    pub initial_route: String,

    /// strftime pattern for reading timestamps
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_data_path() -> String {
    DEFAULT_DATA_PATH.to_string()
}

fn default_refresh_interval() -> u64 {
    5_000
}

fn default_chart_marker() -> String {
    CHART_ROUTE_MARKER.to_string()
}

fn default_initial_route() -> String {
    "/datos".to_string()
}

fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            data_path: default_data_path(),
            refresh_interval_ms: default_refresh_interval(),
            request_timeout_ms: None,
            chart_route_marker: default_chart_marker(),
            initial_route: default_initial_route(),
            timestamp_format: default_timestamp_format(),
        }
    }
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ambiente").join("config.toml"))
    }

    /// Load config, falling back to defaults when the file is missing or invalid
    pub fn load(explicit: Option<&Path>) -> Self {
        let path = explicit.map(Path::to_path_buf).or_else(Self::default_path);
        let Some(path) = path else {
            return Config::default();
        };

        Self::load_from_path(&path).unwrap_or_else(|e| {
            warn!("Config not loaded from {}, using defaults: {}", path.display(), e);
            Config::default()
        })
    }

    /// Load config from specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply command-line overrides
    pub fn apply_overrides(&mut self, base_url: Option<String>, refresh_interval_ms: Option<u64>) {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        if let Some(ms) = refresh_interval_ms {
            self.refresh_interval_ms = ms;
        }
    }

    /// Full URL of the readings endpoint
    pub fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = self.data_path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms.max(MIN_REFRESH_INTERVAL_MS))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}
