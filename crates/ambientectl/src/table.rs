//! Table view: readings newest first, one row per reading.

use ambiente_shared::reading::cell_text;
use ambiente_shared::{Reading, SensorKey, TABLE_SELECTOR};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::fetcher::DataFetcher;
use crate::renderer::{RenderOutcome, Renderer};
use crate::surface::{TableRow, TableSurface};

/// Column headers in cell order
pub const COLUMNS: [&str; 7] = [
    "Fecha",
    "Dispositivo",
    "Temp (°C)",
    "Humedad (%)",
    "MQ Volt",
    "UV Volt",
    "Vbat (V)",
];

/// Project readings into rows, most recent (last fetched) first
pub fn project_rows(readings: &[Reading], timestamp_format: &str) -> Vec<TableRow> {
    readings
        .iter()
        .rev()
        .map(|reading| {
            let mut cells = Vec::with_capacity(COLUMNS.len());
            cells.push(reading.formatted_ts(timestamp_format));
            cells.push(reading.device_label().to_string());
            cells.extend(SensorKey::ALL.iter().map(|key| cell_text(reading.sensor(*key))));
            TableRow::new(cells)
        })
        .collect()
}

pub struct TableRenderer<S> {
    fetcher: Arc<dyn DataFetcher>,
    surface: S,
    selector: String,
    timestamp_format: String,
}

impl<S: TableSurface> TableRenderer<S> {
    pub fn new(fetcher: Arc<dyn DataFetcher>, surface: S, timestamp_format: &str) -> Self {
        Self {
            fetcher,
            surface,
            selector: TABLE_SELECTOR.to_string(),
            timestamp_format: timestamp_format.to_string(),
        }
    }
}

#[async_trait]
impl<S: TableSurface> Renderer for TableRenderer<S> {
    fn name(&self) -> &'static str {
        "table"
    }

    async fn render(&mut self) -> RenderOutcome {
        let readings = self.fetcher.fetch().await;

        if !self.surface.locate(&self.selector) {
            debug!(selector = %self.selector, "Table body not found, skipping cycle");
            return RenderOutcome::MissingTarget;
        }

        let rows = project_rows(&readings, &self.timestamp_format);
        let count = rows.len();
        self.surface.clear_rows(&self.selector);
        for row in rows {
            self.surface.append_row(&self.selector, row);
        }

        RenderOutcome::Rendered { items: count }
    }
}
