//! Two-state refresh scheduler.
//!
//! Every tick re-reads the route, picks the table or chart renderer and
//! starts one render cycle for it. Each renderer sits in a [`RenderSlot`]
//! whose lock doubles as the in-flight guard: a tick that finds its renderer
//! still busy is skipped instead of racing it.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::context::{ContextSource, Mode};
use crate::renderer::{RenderOutcome, Renderer};

/// A renderer plus its in-flight guard
#[derive(Clone)]
pub struct RenderSlot {
    renderer: Arc<Mutex<Box<dyn Renderer>>>,
}

impl RenderSlot {
    pub fn new(renderer: impl Renderer + 'static) -> Self {
        Self {
            renderer: Arc::new(Mutex::new(Box::new(renderer))),
        }
    }

    /// Start a render cycle unless one is already running
    pub fn try_start(&self) -> Option<JoinHandle<RenderOutcome>> {
        let mut guard = self.renderer.clone().try_lock_owned().ok()?;
        Some(tokio::spawn(async move {
            let outcome = guard.render().await;
            debug!(renderer = guard.name(), %outcome, "Render cycle finished");
            outcome
        }))
    }
}

/// Result of one scheduler tick
#[derive(Debug)]
pub enum Tick {
    Started(Mode, JoinHandle<RenderOutcome>),
    /// The selected renderer was still running
    Skipped(Mode),
}

impl Tick {
    pub fn mode(&self) -> Mode {
        match self {
            Tick::Started(mode, _) | Tick::Skipped(mode) => *mode,
        }
    }
}

pub struct Scheduler {
    context: Arc<dyn ContextSource>,
    chart_marker: String,
    table: RenderSlot,
    chart: RenderSlot,
    interval: Duration,
    refresh: Arc<Notify>,
    last_mode: Option<Mode>,
}

impl Scheduler {
    pub fn new(
        context: Arc<dyn ContextSource>,
        chart_marker: &str,
        table: RenderSlot,
        chart: RenderSlot,
        interval: Duration,
    ) -> Self {
        Self {
            context,
            chart_marker: chart_marker.to_string(),
            table,
            chart,
            interval,
            refresh: Arc::new(Notify::new()),
            last_mode: None,
        }
    }

    /// Notifying this handle runs a tick immediately
    pub fn refresh_handle(&self) -> Arc<Notify> {
        self.refresh.clone()
    }

    /// Mode selected by the route right now
    pub fn current_mode(&self) -> Mode {
        Mode::from_path(&self.context.current_path(), &self.chart_marker)
    }

    pub fn tick(&mut self) -> Tick {
        let mode = self.current_mode();
        if self.last_mode != Some(mode) {
            info!(
                from = ?self.last_mode,
                to = %mode,
                path = %self.context.current_path(),
                "Switching render mode"
            );
            self.last_mode = Some(mode);
        }

        let slot = match mode {
            Mode::Table => &self.table,
            Mode::Chart => &self.chart,
        };
        match slot.try_start() {
            Some(handle) => Tick::Started(mode, handle),
            None => {
                debug!(%mode, "Previous render cycle still in flight, skipping tick");
                Tick::Skipped(mode)
            }
        }
    }

    /// Render now and then on every interval until `shutdown` turns true
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let refresh = self.refresh.clone();

        info!(interval_ms = self.interval.as_millis() as u64, "Scheduler started");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick();
                }
                _ = refresh.notified() => {
                    self.tick();
                    ticker.reset();
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("Scheduler stopped");
    }
}
