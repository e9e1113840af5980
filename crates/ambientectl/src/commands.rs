//! Command handlers for ambientectl.

use ambiente_shared::{HealthSummary, SensorKey, TABLE_SELECTOR};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::chart::ChartRenderer;
use crate::config::Config;
use crate::context::Mode;
use crate::fetcher::{DataFetcher, HttpFetcher};
use crate::output::{format_chart_summary, format_health, format_table};
use crate::renderer::{RenderOutcome, Renderer};
use crate::surface::{MemorySurface, SharedSurface};
use crate::table::TableRenderer;

/// Run one render cycle for the route's mode against a fresh page and
/// return the printable result
pub async fn render_once(
    fetcher: Arc<dyn DataFetcher>,
    config: &Config,
    route: &str,
    color: bool,
) -> (RenderOutcome, String) {
    let surface = SharedSurface::new(MemorySurface::dashboard());
    let mode = Mode::from_path(route, &config.chart_route_marker);

    let outcome = match mode {
        Mode::Table => {
            TableRenderer::new(fetcher, surface.clone(), &config.timestamp_format)
                .render()
                .await
        }
        Mode::Chart => {
            ChartRenderer::new(fetcher, surface.clone(), &config.timestamp_format)
                .render()
                .await
        }
    };
    info!(%mode, %outcome, route, "One-shot render finished");

    let page = surface.lock();
    let text = match mode {
        Mode::Table => format_table(page.rows(TABLE_SELECTOR), color),
        Mode::Chart => {
            let charts: Vec<_> = SensorKey::ALL
                .into_iter()
                .map(|key| (key, page.chart(key.mount_id())))
                .collect();
            format_chart_summary(&charts, color)
        }
    };
    (outcome, text)
}

/// Handle once command
pub async fn handle_once(config: &Config, route: Option<String>) -> Result<()> {
    let route = route.unwrap_or_else(|| config.initial_route.clone());
    let fetcher = Arc::new(HttpFetcher::from_config(config)?);
    let (_, text) = render_once(fetcher, config, &route, console::colors_enabled()).await;
    print!("{}", text);
    Ok(())
}

/// Handle status command
pub async fn handle_status(config: &Config, json: bool) -> Result<()> {
    let fetcher = HttpFetcher::from_config(config)?;
    let readings = fetcher.try_fetch().await?;
    let summary = HealthSummary::from_readings(&readings);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", format_health(&summary, console::colors_enabled()));
    }
    Ok(())
}
