//! Reading model as served by the station's readings endpoint.
//!
//! Every field is optional. Missing objects, missing keys, `null` and
//! non-numeric sensor values all decode to `None`, which is the single
//! "absent" sentinel consumed by both the table and the chart views.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::sensor::SensorKey;
use crate::timestamp::{format_timestamp, Timestamp};

/// One timestamped sensor sample
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(
        default,
        deserialize_with = "lenient_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub ts: Option<Timestamp>,

    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub device: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_object",
        skip_serializing_if = "Option::is_none"
    )]
    pub sensors: Option<Sensors>,

    #[serde(
        default,
        deserialize_with = "lenient_object",
        skip_serializing_if = "Option::is_none"
    )]
    pub metrics: Option<DeviceMetrics>,
}

/// Per-sensor values of a reading
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sensors {
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub temp: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub hum: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub mq_volt: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub uv_volt: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub vbat: Option<f64>,
}

impl Sensors {
    pub fn get(&self, key: SensorKey) -> Option<f64> {
        match key {
            SensorKey::Temp => self.temp,
            SensorKey::Hum => self.hum,
            SensorKey::MqVolt => self.mq_volt,
            SensorKey::UvVolt => self.uv_volt,
            SensorKey::Vbat => self.vbat,
        }
    }

    pub fn set(&mut self, key: SensorKey, value: Option<f64>) {
        let slot = match key {
            SensorKey::Temp => &mut self.temp,
            SensorKey::Hum => &mut self.hum,
            SensorKey::MqVolt => &mut self.mq_volt,
            SensorKey::UvVolt => &mut self.uv_volt,
            SensorKey::Vbat => &mut self.vbat,
        };
        *slot = value;
    }
}

/// Device diagnostics posted alongside the sensor values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceMetrics {
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub i2c_latency_us: Option<f64>,
    #[serde(
        rename = "wifiRSSI",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub wifi_rssi: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub wifi_bytes_sent: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub wifi_bytes_recv: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub comm_errors: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub reset_reason: Option<String>,
}

impl Reading {
    /// Reading stamped with epoch milliseconds
    pub fn new(ts_millis: i64) -> Self {
        Self {
            ts: Some(Timestamp::Millis(ts_millis)),
            ..Self::default()
        }
    }

    pub fn with_device(mut self, device: &str) -> Self {
        self.device = Some(device.to_string());
        self
    }

    pub fn with_sensor(mut self, key: SensorKey, value: f64) -> Self {
        self.sensors
            .get_or_insert_with(Sensors::default)
            .set(key, Some(value));
        self
    }

    pub fn with_metrics(mut self, metrics: DeviceMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Value of one sensor, `None` when the reading has no `sensors` object
    /// or no value for that key
    pub fn sensor(&self, key: SensorKey) -> Option<f64> {
        self.sensors.as_ref().and_then(|s| s.get(key))
    }

    pub fn device_label(&self) -> &str {
        self.device.as_deref().unwrap_or("")
    }

    pub fn formatted_ts(&self, pattern: &str) -> String {
        format_timestamp(self.ts.as_ref(), pattern)
    }
}

/// Table cell text for an optional sensor value; absent is the empty string
pub fn cell_text(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Nested value that decodes to `None` instead of failing the whole reading
fn lenient_value<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Nested object; arrays and scalars are `None` rather than positional fields
fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(v @ Value::Object(_)) => serde_json::from_value(v).ok(),
        _ => None,
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(true)) => Some("true".to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_reading() {
        let json = r#"{
            "ts": 1000,
            "device": "esp32-a",
            "sensors": {"temp": 21.5, "hum": 40, "mqVolt": 0.31, "uvVolt": 0.02, "vbat": 3.9},
            "metrics": {"i2cLatencyUs": 3200, "wifiRSSI": -61, "resetReason": "POWERON"}
        }"#;
        let reading: Reading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.ts, Some(Timestamp::Millis(1000)));
        assert_eq!(reading.device_label(), "esp32-a");
        assert_eq!(reading.sensor(SensorKey::Temp), Some(21.5));
        assert_eq!(reading.sensor(SensorKey::MqVolt), Some(0.31));
        let metrics = reading.metrics.unwrap();
        assert_eq!(metrics.wifi_rssi, Some(-61.0));
        assert_eq!(metrics.reset_reason.as_deref(), Some("POWERON"));
    }

    #[test]
    fn test_missing_sensors_object() {
        let reading: Reading = serde_json::from_str(r#"{"ts": 1000}"#).unwrap();
        for key in SensorKey::ALL {
            assert_eq!(reading.sensor(key), None);
        }
        assert_eq!(reading.device_label(), "");
    }

    #[test]
    fn test_null_and_garbage_values_are_absent() {
        let json = r#"{"ts": 1, "sensors": {"temp": null, "hum": "n/a", "vbat": "3.7"}}"#;
        let reading: Reading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.sensor(SensorKey::Temp), None);
        assert_eq!(reading.sensor(SensorKey::Hum), None);
        assert_eq!(reading.sensor(SensorKey::Vbat), Some(3.7));
    }

    #[test]
    fn test_malformed_nested_values_are_absent() {
        let json = r#"[{"ts": {"when": 1}, "sensors": 5, "metrics": []}, {"ts": 2}]"#;
        let readings: Vec<Reading> = serde_json::from_str(json).unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].ts, None);
        assert_eq!(readings[0].sensors, None);
        assert_eq!(readings[0].metrics, None);
        assert_eq!(readings[1].ts, Some(Timestamp::Millis(2)));
    }

    #[test]
    fn test_array_shaped_sensors_are_absent() {
        let json = r#"{"ts": 1, "sensors": [21, 40, 0.3, 0.1, 3.9], "metrics": [800, -60]}"#;
        let reading: Reading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.sensors, None);
        assert_eq!(reading.metrics, None);
        for key in SensorKey::ALL {
            assert_eq!(reading.sensor(key), None);
        }
    }

    #[test]
    fn test_zero_is_not_absent() {
        let reading: Reading = serde_json::from_str(r#"{"sensors": {"uvVolt": 0}}"#).unwrap();
        assert_eq!(reading.sensor(SensorKey::UvVolt), Some(0.0));
        assert_eq!(cell_text(reading.sensor(SensorKey::UvVolt)), "0");
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(None), "");
        assert_eq!(cell_text(Some(21.0)), "21");
        assert_eq!(cell_text(Some(21.5)), "21.5");
        assert_eq!(cell_text(Some(-0.25)), "-0.25");
    }

    #[test]
    fn test_builder_matches_json() {
        let built = Reading::new(2000)
            .with_device("B")
            .with_sensor(SensorKey::Temp, 22.0)
            .with_sensor(SensorKey::Hum, 40.0);
        let parsed: Reading =
            serde_json::from_str(r#"{"ts":2000,"device":"B","sensors":{"temp":22,"hum":40}}"#)
                .unwrap();
        assert_eq!(built, parsed);
    }
}
