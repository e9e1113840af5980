//! The five station sensors and their display attributes.

use std::fmt;

/// One of the station's sensor channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SensorKey {
    Temp,
    Hum,
    MqVolt,
    UvVolt,
    Vbat,
}

impl SensorKey {
    /// Column and chart order
    pub const ALL: [SensorKey; 5] = [
        SensorKey::Temp,
        SensorKey::Hum,
        SensorKey::MqVolt,
        SensorKey::UvVolt,
        SensorKey::Vbat,
    ];

    /// Key used in the JSON `sensors` object
    pub fn key(self) -> &'static str {
        match self {
            SensorKey::Temp => "temp",
            SensorKey::Hum => "hum",
            SensorKey::MqVolt => "mqVolt",
            SensorKey::UvVolt => "uvVolt",
            SensorKey::Vbat => "vbat",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SensorKey::Temp => "Temp (°C)",
            SensorKey::Hum => "Humedad (%)",
            SensorKey::MqVolt => "MQ Volt",
            SensorKey::UvVolt => "UV Volt",
            SensorKey::Vbat => "Vbat (V)",
        }
    }

    /// Stroke color as a hex string
    pub fn color(self) -> &'static str {
        match self {
            SensorKey::Temp => "#e63946",
            SensorKey::Hum => "#457b9d",
            SensorKey::MqVolt => "#f4a261",
            SensorKey::UvVolt => "#2a9d8f",
            SensorKey::Vbat => "#1d3557",
        }
    }

    /// Identifier of the chart mount this sensor renders into
    pub fn mount_id(self) -> &'static str {
        match self {
            SensorKey::Temp => "chartTemp",
            SensorKey::Hum => "chartHum",
            SensorKey::MqVolt => "chartMQ",
            SensorKey::UvVolt => "chartUV",
            SensorKey::Vbat => "chartVbat",
        }
    }
}

impl fmt::Display for SensorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Parse a `#rrggbb` color into its components
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_ids_are_distinct() {
        let mut mounts: Vec<_> = SensorKey::ALL.iter().map(|k| k.mount_id()).collect();
        mounts.sort();
        mounts.dedup();
        assert_eq!(mounts.len(), 5);
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#e63946"), Some((0xe6, 0x39, 0x46)));
        assert_eq!(parse_hex_color("e63946"), None);
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn test_every_sensor_color_parses() {
        for key in SensorKey::ALL {
            assert!(parse_hex_color(key.color()).is_some(), "{}", key);
        }
    }
}
