//! Device health summary computed from one batch of readings.

use serde::{Deserialize, Serialize};

use crate::reading::Reading;

/// WiFi counts as up when RSSI is above this floor (dBm)
pub const WIFI_RSSI_FLOOR_DBM: f64 = -90.0;

/// Reset reason reported on a cold boot
pub const POWER_ON_RESET: &str = "POWERON";

const I2C_GOOD_US: f64 = 10_000.0;
const I2C_WARN_US: f64 = 20_000.0;
const WIFI_GOOD_PCT: f64 = 95.0;
const WIFI_WARN_PCT: f64 = 85.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthLevel {
    Good,
    Warning,
    Critical,
}

impl std::fmt::Display for HealthLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthLevel::Good => write!(f, "OK"),
            HealthLevel::Warning => write!(f, "WARN"),
            HealthLevel::Critical => write!(f, "CRIT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSummary {
    pub readings: usize,
    /// Mean of the positive I2C latencies, 0 when none were reported
    pub i2c_latency_avg_us: f64,
    /// Share of readings with usable WiFi signal
    pub wifi_uptime_pct: f64,
    /// Power-on resets beyond the first boot
    pub unexpected_resets: u64,
    pub comm_errors: u64,
}

impl HealthSummary {
    pub fn from_readings(readings: &[Reading]) -> Self {
        let metrics = || readings.iter().filter_map(|r| r.metrics.as_ref());

        let latencies: Vec<f64> = metrics()
            .filter_map(|m| m.i2c_latency_us)
            .filter(|v| *v > 0.0)
            .collect();
        let i2c_latency_avg_us = if latencies.is_empty() {
            0.0
        } else {
            latencies.iter().sum::<f64>() / latencies.len() as f64
        };

        let wifi_uptime_pct = if readings.is_empty() {
            100.0
        } else {
            let up = metrics()
                .filter(|m| m.wifi_rssi.is_some_and(|rssi| rssi > WIFI_RSSI_FLOOR_DBM))
                .count();
            up as f64 * 100.0 / readings.len() as f64
        };

        let power_ons = metrics()
            .filter(|m| m.reset_reason.as_deref() == Some(POWER_ON_RESET))
            .count() as u64;

        let comm_errors = metrics()
            .filter_map(|m| m.comm_errors)
            .filter(|v| *v > 0.0)
            .map(|v| v.round() as u64)
            .fold(0u64, u64::saturating_add);

        Self {
            readings: readings.len(),
            i2c_latency_avg_us,
            wifi_uptime_pct,
            unexpected_resets: power_ons.saturating_sub(1),
            comm_errors,
        }
    }

    pub fn i2c_level(&self) -> HealthLevel {
        if self.i2c_latency_avg_us < I2C_GOOD_US {
            HealthLevel::Good
        } else if self.i2c_latency_avg_us < I2C_WARN_US {
            HealthLevel::Warning
        } else {
            HealthLevel::Critical
        }
    }

    pub fn wifi_level(&self) -> HealthLevel {
        if self.wifi_uptime_pct > WIFI_GOOD_PCT {
            HealthLevel::Good
        } else if self.wifi_uptime_pct > WIFI_WARN_PCT {
            HealthLevel::Warning
        } else {
            HealthLevel::Critical
        }
    }

    pub fn resets_level(&self) -> HealthLevel {
        if self.unexpected_resets == 0 {
            HealthLevel::Good
        } else {
            HealthLevel::Warning
        }
    }

    /// Worst of the individual levels
    pub fn overall(&self) -> HealthLevel {
        [self.i2c_level(), self.wifi_level(), self.resets_level()]
            .into_iter()
            .max_by_key(|level| match level {
                HealthLevel::Good => 0,
                HealthLevel::Warning => 1,
                HealthLevel::Critical => 2,
            })
            .unwrap_or(HealthLevel::Good)
    }
}
