//! Reading timestamps and their local display form.
//!
//! Stations post either epoch milliseconds or an ISO-8601 string. Both are
//! shown in the local timezone and the process locale (`LC_ALL`, `LC_TIME`,
//! then `LANG`); anything that cannot be interpreted renders as
//! [`INVALID_DATE`].

use chrono::{DateTime, Local, Locale, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::sync::OnceLock;

/// Display form of a missing or unparsable timestamp
pub const INVALID_DATE: &str = "Invalid Date";

/// strftime pattern used when none is configured: the locale's date and time
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%c";

/// Parse a POSIX locale name such as `es_ES.UTF-8` or `de_DE@euro`
pub fn parse_locale(name: &str) -> Option<Locale> {
    let base = name.split(['.', '@']).next()?.trim();
    match base {
        "" | "C" | "POSIX" => Some(Locale::POSIX),
        _ => Locale::try_from(base).ok(),
    }
}

/// Locale of the running process, POSIX when unset or unknown
pub fn system_locale() -> Locale {
    static LOCALE: OnceLock<Locale> = OnceLock::new();
    *LOCALE.get_or_init(|| {
        ["LC_ALL", "LC_TIME", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.is_empty())
            .and_then(|value| parse_locale(&value))
            .unwrap_or(Locale::POSIX)
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// Milliseconds since the Unix epoch
    Millis(i64),
    /// Milliseconds with a fractional part
    Fractional(f64),
    Text(String),
}

impl Timestamp {
    /// Resolve to an instant in the local timezone
    pub fn to_local(&self) -> Option<DateTime<Local>> {
        match self {
            Timestamp::Millis(ms) => from_millis(*ms),
            Timestamp::Fractional(ms) if ms.is_finite() => from_millis(ms.trunc() as i64),
            Timestamp::Fractional(_) => None,
            Timestamp::Text(text) => parse_text(text.trim()),
        }
    }

    /// Render with a strftime pattern in the process locale, falling back to
    /// the default pattern when `pattern` is not a valid format string
    pub fn format(&self, pattern: &str) -> String {
        self.format_in(pattern, system_locale())
    }

    pub fn format_in(&self, pattern: &str, locale: Locale) -> String {
        match self.to_local() {
            Some(dt) => format_with(&dt, pattern, locale),
            None => INVALID_DATE.to_string(),
        }
    }
}

impl From<i64> for Timestamp {
    fn from(ms: i64) -> Self {
        Timestamp::Millis(ms)
    }
}

impl From<&str> for Timestamp {
    fn from(text: &str) -> Self {
        Timestamp::Text(text.to_string())
    }
}

/// Format an optional timestamp; `None` renders as [`INVALID_DATE`]
pub fn format_timestamp(ts: Option<&Timestamp>, pattern: &str) -> String {
    ts.map(|t| t.format(pattern))
        .unwrap_or_else(|| INVALID_DATE.to_string())
}

fn from_millis(ms: i64) -> Option<DateTime<Local>> {
    DateTime::<Utc>::from_timestamp_millis(ms).map(|dt| dt.with_timezone(&Local))
}

fn parse_text(text: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Local));
    }

    // Date-time without an offset is wall-clock local time
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, pattern) {
            return Local.from_local_datetime(&naive).earliest();
        }
    }

    // Date-only forms are midnight UTC
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive).with_timezone(&Local))
}

fn format_with(dt: &DateTime<Local>, pattern: &str, locale: Locale) -> String {
    let mut out = String::new();
    if write!(out, "{}", dt.format_localized(pattern, locale)).is_ok() {
        return out;
    }
    dt.format_localized(DEFAULT_TIMESTAMP_FORMAT, locale)
        .to_string()
}
