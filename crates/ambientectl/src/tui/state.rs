//! Dashboard state and keyboard handling

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::context::{ContextSource, Mode, Route};
use crate::surface::SharedSurface;

pub const TABLE_ROUTE: &str = "/datos";
pub const CHART_ROUTE: &str = "/metricas";

pub struct DashboardState {
    /// Current route, shared with the scheduler
    pub route: Route,
    /// Page the renderers draw into
    pub surface: SharedSurface,
    /// Wakes the scheduler for an immediate render
    pub refresh: Arc<Notify>,
    pub chart_marker: String,
    pub endpoint: String,
    pub should_quit: bool,
}

impl DashboardState {
    pub fn new(
        route: Route,
        surface: SharedSurface,
        refresh: Arc<Notify>,
        chart_marker: &str,
        endpoint: &str,
    ) -> Self {
        Self {
            route,
            surface,
            refresh,
            chart_marker: chart_marker.to_string(),
            endpoint: endpoint.to_string(),
            should_quit: false,
        }
    }

    pub fn mode(&self) -> Mode {
        Mode::from_path(&self.route.current_path(), &self.chart_marker)
    }

    fn navigate(&self, path: &str) {
        if self.route.current_path() != path {
            self.route.navigate(path);
            self.refresh.notify_one();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => self.should_quit = true,
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => self.should_quit = true,
            (KeyCode::Char('t'), _) => self.navigate(TABLE_ROUTE),
            (KeyCode::Char('m'), _) => self.navigate(CHART_ROUTE),
            (KeyCode::Char('r'), _) => self.refresh.notify_one(),
            _ => {}
        }
    }
}
