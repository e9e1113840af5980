//! Event Loop - dashboard entry point and event handling

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

use super::render::draw_ui;
use super::state::DashboardState;
use crate::chart::ChartRenderer;
use crate::config::Config;
use crate::context::Route;
use crate::fetcher::{DataFetcher, HttpFetcher, RecordingFetcher};
use crate::scheduler::{RenderSlot, Scheduler};
use crate::surface::{MemorySurface, SharedSurface};
use crate::table::TableRenderer;

/// Redraw period; render cycles run between frames
const FRAME_INTERVAL: Duration = Duration::from_millis(50);

/// Run the dashboard until the user quits
pub async fn run(config: Config, initial_route: String) -> Result<()> {
    let surface = SharedSurface::new(MemorySurface::dashboard());
    let http: Arc<dyn DataFetcher> = Arc::new(HttpFetcher::from_config(&config)?);
    let fetcher: Arc<dyn DataFetcher> = Arc::new(RecordingFetcher::new(http, surface.clone()));
    let route = Route::new(&initial_route);

    let scheduler = Scheduler::new(
        Arc::new(route.clone()),
        &config.chart_route_marker,
        RenderSlot::new(TableRenderer::new(
            fetcher.clone(),
            surface.clone(),
            &config.timestamp_format,
        )),
        RenderSlot::new(ChartRenderer::new(
            fetcher,
            surface.clone(),
            &config.timestamp_format,
        )),
        config.refresh_interval(),
    );
    let mut state = DashboardState::new(
        route,
        surface,
        scheduler.refresh_handle(),
        &config.chart_route_marker,
        &config.endpoint(),
    );

    // Setup terminal with error recovery
    enable_raw_mode().map_err(|e| {
        anyhow::anyhow!(
            "Failed to enable raw mode: {}. Ensure you're running in a real terminal (TTY).",
            e
        )
    })?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| {
        let _ = disable_raw_mode();
        anyhow::anyhow!("Failed to initialize terminal: {}", e)
    })?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler_task = tokio::spawn(scheduler.run(shutdown_rx));
    info!(route = %initial_route, endpoint = %state.endpoint, "Dashboard started");

    let result = run_event_loop(&mut terminal, &mut state).await;

    // Restore terminal (always attempt cleanup)
    let cleanup_result = restore_terminal(&mut terminal);

    let _ = shutdown_tx.send(true);
    if let Err(e) = scheduler_task.await {
        warn!("Scheduler task ended abnormally: {}", e);
    }
    info!("Dashboard stopped");

    result.and(cleanup_result)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut DashboardState,
) -> Result<()> {
    loop {
        terminal.draw(|f| draw_ui(f, state))?;

        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    state.handle_key(key);
                }
            }
        }

        if state.should_quit {
            return Ok(());
        }

        tokio::time::sleep(FRAME_INTERVAL).await;
    }
}
