//! Chart view: one line chart per sensor over a shared timestamp axis.
//!
//! Chart instances are owned by the renderer, keyed by sensor. A live chart
//! is rebound in place; a chart the surface no longer knows is disposed and
//! recreated, so instances never pile up across refresh cycles.

use ambiente_shared::{Reading, SensorKey};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::fetcher::DataFetcher;
use crate::renderer::{RenderOutcome, Renderer};
use crate::surface::{ChartHandle, ChartSurface, LineChart, LineDataset};

/// Tick rotation that keeps dense timestamps legible
pub const X_TICK_ROTATION_DEG: u16 = 45;

/// Labels and the five aligned series of one batch, in fetch order
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrame {
    pub labels: Vec<String>,
    series: BTreeMap<SensorKey, Vec<Option<f64>>>,
}

impl ChartFrame {
    pub fn from_readings(readings: &[Reading], timestamp_format: &str) -> Self {
        let labels = readings
            .iter()
            .map(|r| r.formatted_ts(timestamp_format))
            .collect();
        let series = SensorKey::ALL
            .into_iter()
            .map(|key| (key, readings.iter().map(|r| r.sensor(key)).collect()))
            .collect();
        Self { labels, series }
    }

    pub fn series(&self, key: SensorKey) -> &[Option<f64>] {
        self.series.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn line_chart(&self, key: SensorKey) -> LineChart {
        LineChart {
            labels: self.labels.clone(),
            datasets: vec![LineDataset {
                label: key.label().to_string(),
                color: key.color().to_string(),
                points: self.series(key).to_vec(),
                fill: false,
            }],
            x_tick_rotation: X_TICK_ROTATION_DEG,
        }
    }
}

pub struct ChartRenderer<S> {
    fetcher: Arc<dyn DataFetcher>,
    surface: S,
    handles: BTreeMap<SensorKey, ChartHandle>,
    timestamp_format: String,
}

impl<S: ChartSurface> ChartRenderer<S> {
    pub fn new(fetcher: Arc<dyn DataFetcher>, surface: S, timestamp_format: &str) -> Self {
        Self {
            fetcher,
            surface,
            handles: BTreeMap::new(),
            timestamp_format: timestamp_format.to_string(),
        }
    }

    /// Charts this renderer currently owns
    pub fn live_handles(&self) -> usize {
        self.handles.len()
    }

    /// Bind one sensor's chart, returning whether a chart is now live
    fn bind(&mut self, key: SensorKey, chart: &LineChart) -> bool {
        if let Some(handle) = self.handles.get(&key).copied() {
            if self.surface.update(handle, chart) {
                return true;
            }
            self.surface.dispose(handle);
            self.handles.remove(&key);
        }

        match self.surface.create(key.mount_id(), chart) {
            Some(handle) => {
                self.handles.insert(key, handle);
                true
            }
            None => {
                debug!(mount = key.mount_id(), "Chart mount not found, skipping");
                false
            }
        }
    }
}

#[async_trait]
impl<S: ChartSurface> Renderer for ChartRenderer<S> {
    fn name(&self) -> &'static str {
        "chart"
    }

    async fn render(&mut self) -> RenderOutcome {
        let readings = self.fetcher.fetch().await;
        if readings.is_empty() {
            return RenderOutcome::EmptyDataset;
        }

        let frame = ChartFrame::from_readings(&readings, &self.timestamp_format);
        let mut bound = 0;
        for key in SensorKey::ALL {
            let chart = frame.line_chart(key);
            if self.bind(key, &chart) {
                bound += 1;
            }
        }

        debug!(bound, owned = self.live_handles(), "Chart cycle bound");
        if bound == 0 {
            RenderOutcome::MissingTarget
        } else {
            RenderOutcome::Rendered { items: bound }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ambiente_shared::DEFAULT_TIMESTAMP_FORMAT;

    #[test]
    fn test_frame_aligns_series_with_labels() {
        let readings = vec![
            Reading::new(1000).with_sensor(SensorKey::Temp, 21.0),
            Reading::new(2000),
            Reading::new(3000).with_sensor(SensorKey::Temp, 23.0),
        ];
        let frame = ChartFrame::from_readings(&readings, DEFAULT_TIMESTAMP_FORMAT);
        assert_eq!(frame.labels.len(), 3);
        for key in SensorKey::ALL {
            assert_eq!(frame.series(key).len(), 3);
        }
        assert_eq!(frame.series(SensorKey::Temp), &[Some(21.0), None, Some(23.0)]);
        assert_eq!(frame.series(SensorKey::Vbat), &[None, None, None]);
    }

    #[test]
    fn test_line_chart_styling() {
        let frame = ChartFrame::from_readings(&[Reading::new(1000)], DEFAULT_TIMESTAMP_FORMAT);
        let chart = frame.line_chart(SensorKey::Hum);
        assert_eq!(chart.x_tick_rotation, 45);
        assert_eq!(chart.datasets.len(), 1);
        assert_eq!(chart.datasets[0].label, "Humedad (%)");
        assert_eq!(chart.datasets[0].color, "#457b9d");
        assert!(!chart.datasets[0].fill);
    }
}
