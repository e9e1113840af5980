//! Render targets.
//!
//! Renderers only see the two narrow traits below: a table body addressed by
//! selector and a charting capability addressed by mount id. The dashboard,
//! the one-shot printer and the tests all render into [`MemorySurface`],
//! usually through the lock-sharing [`SharedSurface`].

use ambiente_shared::HealthSummary;
use chrono::{DateTime, Local};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One rendered table row, cells in column order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<String>,
}

impl TableRow {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }
}

pub trait TableSurface: Send {
    /// Whether the selector addresses a table body
    fn locate(&self, selector: &str) -> bool;
    fn clear_rows(&mut self, selector: &str);
    fn append_row(&mut self, selector: &str, row: TableRow);
}

/// One labeled series of a line chart; `None` points are gaps
#[derive(Debug, Clone, PartialEq)]
pub struct LineDataset {
    pub label: String,
    pub color: String,
    pub points: Vec<Option<f64>>,
    pub fill: bool,
}

/// Line chart bound to a shared label sequence
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub labels: Vec<String>,
    pub datasets: Vec<LineDataset>,
    /// Rotation of the x axis tick labels in degrees
    pub x_tick_rotation: u16,
}

/// Live chart instance owned by whoever created it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChartHandle(pub u64);

pub trait ChartSurface: Send {
    /// Construct a chart on a mount; `None` when the mount does not exist
    fn create(&mut self, mount: &str, chart: &LineChart) -> Option<ChartHandle>;
    /// Rebind a live chart to new data; false when the handle is no longer live
    fn update(&mut self, handle: ChartHandle, chart: &LineChart) -> bool;
    fn dispose(&mut self, handle: ChartHandle);
}

#[derive(Debug, Clone, PartialEq)]
pub struct MountedChart {
    pub mount: String,
    pub chart: LineChart,
}

/// In-memory page: table bodies, chart mounts and the charts living on them
#[derive(Debug, Default)]
pub struct MemorySurface {
    tables: BTreeMap<String, Vec<TableRow>>,
    mounts: BTreeSet<String>,
    charts: BTreeMap<ChartHandle, MountedChart>,
    next_handle: u64,
    last_fetch: Option<DateTime<Local>>,
    health: Option<HealthSummary>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page with the readings table and the five sensor chart mounts
    pub fn dashboard() -> Self {
        let mut surface = Self::new();
        surface.add_table(ambiente_shared::TABLE_SELECTOR);
        for key in ambiente_shared::SensorKey::ALL {
            surface.add_mount(key.mount_id());
        }
        surface
    }

    pub fn add_table(&mut self, selector: &str) {
        self.tables.entry(selector.to_string()).or_default();
    }

    pub fn remove_table(&mut self, selector: &str) {
        self.tables.remove(selector);
    }

    pub fn add_mount(&mut self, mount: &str) {
        self.mounts.insert(mount.to_string());
    }

    /// Remove a mount together with every chart living on it
    pub fn remove_mount(&mut self, mount: &str) {
        self.mounts.remove(mount);
        self.charts.retain(|_, mounted| mounted.mount != mount);
    }

    pub fn rows(&self, selector: &str) -> &[TableRow] {
        self.tables.get(selector).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Charts currently living on a mount, oldest first
    pub fn charts_on(&self, mount: &str) -> Vec<&LineChart> {
        self.charts
            .values()
            .filter(|mounted| mounted.mount == mount)
            .map(|mounted| &mounted.chart)
            .collect()
    }

    /// Most recent chart on a mount
    pub fn chart(&self, mount: &str) -> Option<&LineChart> {
        self.charts_on(mount).pop()
    }

    pub fn live_charts(&self) -> usize {
        self.charts.len()
    }

    pub fn record_fetch(&mut self, at: DateTime<Local>, health: HealthSummary) {
        self.last_fetch = Some(at);
        self.health = Some(health);
    }

    pub fn last_fetch(&self) -> Option<DateTime<Local>> {
        self.last_fetch
    }

    pub fn health(&self) -> Option<&HealthSummary> {
        self.health.as_ref()
    }
}

impl TableSurface for MemorySurface {
    fn locate(&self, selector: &str) -> bool {
        self.tables.contains_key(selector)
    }

    fn clear_rows(&mut self, selector: &str) {
        if let Some(rows) = self.tables.get_mut(selector) {
            rows.clear();
        }
    }

    fn append_row(&mut self, selector: &str, row: TableRow) {
        if let Some(rows) = self.tables.get_mut(selector) {
            rows.push(row);
        }
    }
}

impl ChartSurface for MemorySurface {
    fn create(&mut self, mount: &str, chart: &LineChart) -> Option<ChartHandle> {
        if !self.mounts.contains(mount) {
            return None;
        }
        self.next_handle += 1;
        let handle = ChartHandle(self.next_handle);
        self.charts.insert(
            handle,
            MountedChart {
                mount: mount.to_string(),
                chart: chart.clone(),
            },
        );
        Some(handle)
    }

    fn update(&mut self, handle: ChartHandle, chart: &LineChart) -> bool {
        match self.charts.get_mut(&handle) {
            Some(mounted) => {
                mounted.chart = chart.clone();
                true
            }
            None => false,
        }
    }

    fn dispose(&mut self, handle: ChartHandle) {
        self.charts.remove(&handle);
    }
}

/// [`MemorySurface`] shared between renderers and whoever draws it
#[derive(Debug, Clone, Default)]
pub struct SharedSurface {
    inner: Arc<Mutex<MemorySurface>>,
}

impl SharedSurface {
    pub fn new(surface: MemorySurface) -> Self {
        Self {
            inner: Arc::new(Mutex::new(surface)),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, MemorySurface> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TableSurface for SharedSurface {
    fn locate(&self, selector: &str) -> bool {
        self.lock().locate(selector)
    }

    fn clear_rows(&mut self, selector: &str) {
        self.lock().clear_rows(selector);
    }

    fn append_row(&mut self, selector: &str, row: TableRow) {
        self.lock().append_row(selector, row);
    }
}

impl ChartSurface for SharedSurface {
    fn create(&mut self, mount: &str, chart: &LineChart) -> Option<ChartHandle> {
        self.lock().create(mount, chart)
    }

    fn update(&mut self, handle: ChartHandle, chart: &LineChart) -> bool {
        self.lock().update(handle, chart)
    }

    fn dispose(&mut self, handle: ChartHandle) {
        self.lock().dispose(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(labels: &[&str]) -> LineChart {
        LineChart {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            datasets: Vec::new(),
            x_tick_rotation: 45,
        }
    }

    #[test]
    fn test_missing_mount_creates_nothing() {
        let mut surface = MemorySurface::new();
        assert_eq!(surface.create("chartTemp", &chart(&["a"])), None);
        assert_eq!(surface.live_charts(), 0);
    }

    #[test]
    fn test_update_and_dispose() {
        let mut surface = MemorySurface::dashboard();
        let handle = surface.create("chartTemp", &chart(&["a"])).unwrap();
        assert!(surface.update(handle, &chart(&["a", "b"])));
        assert_eq!(surface.chart("chartTemp").unwrap().labels.len(), 2);

        surface.dispose(handle);
        assert_eq!(surface.live_charts(), 0);
        assert!(!surface.update(handle, &chart(&["c"])));
    }

    #[test]
    fn test_removing_mount_drops_its_charts() {
        let mut surface = MemorySurface::dashboard();
        surface.create("chartHum", &chart(&["a"])).unwrap();
        surface.create("chartUV", &chart(&["a"])).unwrap();
        surface.remove_mount("chartHum");
        assert_eq!(surface.live_charts(), 1);
        assert!(surface.chart("chartHum").is_none());
    }

    #[test]
    fn test_rows_on_missing_table() {
        let mut surface = MemorySurface::new();
        assert!(!surface.locate("#readings tbody"));
        surface.append_row("#readings tbody", TableRow::new(vec!["x".into()]));
        assert!(surface.rows("#readings tbody").is_empty());
    }

    #[test]
    fn test_shared_surface_sees_same_state() {
        let shared = SharedSurface::new(MemorySurface::dashboard());
        let mut writer = shared.clone();
        writer.append_row("#readings tbody", TableRow::new(vec!["1".into()]));
        assert_eq!(shared.lock().rows("#readings tbody").len(), 1);
    }
}
