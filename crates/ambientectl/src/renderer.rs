//! Renderer contract shared by the table and chart views.

use async_trait::async_trait;
use std::fmt;

/// What one render cycle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Target updated; `items` is rows for the table, charts for the chart view
    Rendered { items: usize },
    /// Render target absent this cycle
    MissingTarget,
    /// Nothing fetched; prior rendering left untouched
    EmptyDataset,
}

impl fmt::Display for RenderOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderOutcome::Rendered { items } => write!(f, "rendered {}", items),
            RenderOutcome::MissingTarget => write!(f, "missing target"),
            RenderOutcome::EmptyDataset => write!(f, "empty dataset"),
        }
    }
}

/// One fetch-then-draw pass. The fetch is the only suspension point.
#[async_trait]
pub trait Renderer: Send {
    fn name(&self) -> &'static str;
    async fn render(&mut self) -> RenderOutcome;
}
