//! Page context: the route that decides between the table and chart views.

use std::sync::{Arc, PoisonError, RwLock};

/// Which renderer a route selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Table,
    Chart,
}

impl Mode {
    /// Chart mode when the route contains the marker, table mode otherwise
    pub fn from_path(path: &str, chart_marker: &str) -> Self {
        if !chart_marker.is_empty() && path.contains(chart_marker) {
            Mode::Chart
        } else {
            Mode::Table
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Table => write!(f, "table"),
            Mode::Chart => write!(f, "chart"),
        }
    }
}

/// Source of the current route, queried on every tick
pub trait ContextSource: Send + Sync {
    fn current_path(&self) -> String;
}

/// Route that never changes
#[derive(Debug, Clone)]
pub struct FixedRoute(pub String);

impl ContextSource for FixedRoute {
    fn current_path(&self) -> String {
        self.0.clone()
    }
}

/// Navigable route shared between the dashboard and the scheduler
#[derive(Debug, Clone, Default)]
pub struct Route {
    path: Arc<RwLock<String>>,
}

impl Route {
    pub fn new(path: &str) -> Self {
        Self {
            path: Arc::new(RwLock::new(path.to_string())),
        }
    }

    pub fn navigate(&self, path: &str) {
        let mut current = self.path.write().unwrap_or_else(PoisonError::into_inner);
        *current = path.to_string();
    }
}

impl ContextSource for Route {
    fn current_path(&self) -> String {
        self.path
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
