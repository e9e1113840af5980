//! Shared types for the Ambiente sensor dashboard.
//!
//! Holds the reading model as served by the station endpoint, timestamp
//! formatting, the device health summary and the fetch error taxonomy.

pub mod error;
pub mod health;
pub mod reading;
pub mod sensor;
pub mod timestamp;

pub use error::FetchError;
pub use health::{HealthLevel, HealthSummary};
pub use reading::{DeviceMetrics, Reading, Sensors};
pub use sensor::SensorKey;
pub use timestamp::{format_timestamp, Timestamp, DEFAULT_TIMESTAMP_FORMAT, INVALID_DATE};

/// Path of the readings endpoint on the station server
pub const DEFAULT_DATA_PATH: &str = "/api/data";

/// Selector of the table body the table view renders into
pub const TABLE_SELECTOR: &str = "#readings tbody";

/// Route substring that selects the chart view
pub const CHART_ROUTE_MARKER: &str = "metricas";
