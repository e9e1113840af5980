//! Rendering - draws the page the renderers filled in

use ambiente_shared::sensor::parse_hex_color;
use ambiente_shared::{HealthLevel, SensorKey, TABLE_SELECTOR};
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Row, Table},
    Frame,
};

use super::layout::{chart_grid, compute_layout};
use super::state::DashboardState;
use crate::context::{ContextSource, Mode};
use crate::surface::{LineChart, MemorySurface, TableRow};
use crate::table::COLUMNS;

const VERSION: &str = env!("AMBIENTE_VERSION");

pub fn draw_ui(f: &mut Frame, state: &DashboardState) {
    let layout = compute_layout(f.size());
    let page = state.surface.lock();

    draw_header(f, layout.header, state);
    match state.mode() {
        Mode::Table => draw_table(f, layout.body, page.rows(TABLE_SELECTOR)),
        Mode::Chart => draw_charts(f, layout.body, &page),
    }
    draw_status_bar(f, layout.status_bar, &page);
}

fn draw_header(f: &mut Frame, area: Rect, state: &DashboardState) {
    let view = match state.mode() {
        Mode::Table => "table",
        Mode::Chart => "charts",
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " Ambiente ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("v{}", VERSION), Style::default().fg(Color::Gray)),
        Span::raw("  │  "),
        Span::styled(state.route.current_path(), Style::default().fg(Color::White)),
        Span::raw("  │  "),
        Span::styled(view, Style::default().fg(Color::Yellow)),
        Span::raw("  │  "),
        Span::styled(state.endpoint.clone(), Style::default().fg(Color::DarkGray)),
    ]));
    f.render_widget(header, area);
}

fn draw_table(f: &mut Frame, area: Rect, rows: &[TableRow]) {
    let widths = [
        Constraint::Length(30),
        Constraint::Length(14),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
    ];
    let header = Row::new(COLUMNS).style(
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD),
    );
    let body = rows.iter().map(|row| Row::new(row.cells.clone()));

    let table = Table::new(body, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Lecturas ({}) ", rows.len())),
    );
    f.render_widget(table, area);
}

fn draw_charts(f: &mut Frame, area: Rect, page: &MemorySurface) {
    let panes = chart_grid(area);
    for (key, pane) in SensorKey::ALL.into_iter().zip(panes) {
        draw_chart(f, pane, key, page.chart(key.mount_id()));
    }
}

/// Split a gapped series into contiguous runs of `(index, value)` points
pub fn segments(points: &[Option<f64>]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (i, point) in points.iter().enumerate() {
        match point {
            Some(v) => current.push((i as f64, *v)),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Y bounds with a little headroom; flat series get a unit band
pub fn value_bounds(points: &[Option<f64>]) -> Option<[f64; 2]> {
    let values = points.iter().flatten().copied();
    let (min, max) = values.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        None => Some((v, v)),
    })?;
    if (max - min).abs() < f64::EPSILON {
        return Some([min - 1.0, max + 1.0]);
    }
    let pad = (max - min) * 0.05;
    Some([min - pad, max + pad])
}

fn draw_chart(f: &mut Frame, area: Rect, key: SensorKey, chart: Option<&LineChart>) {
    let color = parse_hex_color(key.color())
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(Color::White);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(format!(" {} ", key.label()), Style::default().fg(color)));

    let Some(chart) = chart else {
        let waiting = Paragraph::new("Sin datos")
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(waiting, area);
        return;
    };

    let points: &[Option<f64>] = chart
        .datasets
        .first()
        .map(|d| d.points.as_slice())
        .unwrap_or(&[]);
    let runs = segments(points);
    let Some(y_bounds) = value_bounds(points) else {
        let empty = Paragraph::new("Sin valores")
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    };

    let datasets: Vec<Dataset> = runs
        .iter()
        .enumerate()
        .map(|(i, run)| {
            let dataset = Dataset::default()
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color))
                .data(run);
            if i == 0 {
                dataset.name(key.label())
            } else {
                dataset
            }
        })
        .collect();

    let last_index = chart.labels.len().saturating_sub(1).max(1) as f64;
    let x_labels: Vec<Span> = match (chart.labels.first(), chart.labels.last()) {
        (Some(first), Some(last)) if chart.labels.len() > 1 => vec![
            Span::raw(first.clone()),
            Span::raw(chart.labels[chart.labels.len() / 2].clone()),
            Span::raw(last.clone()),
        ],
        (Some(only), _) => vec![Span::raw(only.clone())],
        _ => Vec::new(),
    };
    let axis_style = Style::default().fg(Color::Gray);

    let widget = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(axis_style)
                .bounds([0.0, last_index])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(axis_style)
                .bounds(y_bounds)
                .labels(vec![
                    Span::raw(format!("{:.2}", y_bounds[0])),
                    Span::raw(format!("{:.2}", y_bounds[1])),
                ]),
        );
    f.render_widget(widget, area);
}

fn level_color(level: HealthLevel) -> Color {
    match level {
        HealthLevel::Good => Color::Green,
        HealthLevel::Warning => Color::Yellow,
        HealthLevel::Critical => Color::Red,
    }
}

fn draw_status_bar(f: &mut Frame, area: Rect, page: &MemorySurface) {
    let mut spans = Vec::new();
    match (page.last_fetch(), page.health()) {
        (Some(at), Some(health)) => {
            let overall = health.overall();
            spans.push(Span::styled(
                format!(" [{}]", overall),
                Style::default()
                    .fg(level_color(overall))
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(format!(
                " updated {}  {} readings  ",
                at.format("%H:%M:%S"),
                health.readings
            )));
            spans.push(Span::styled(
                format!("I2C {:.0} µs", health.i2c_latency_avg_us),
                Style::default().fg(level_color(health.i2c_level())),
            ));
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("WiFi {:.1}%", health.wifi_uptime_pct),
                Style::default().fg(level_color(health.wifi_level())),
            ));
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("resets {}", health.unexpected_resets),
                Style::default().fg(level_color(health.resets_level())),
            ));
        }
        _ => spans.push(Span::raw(" waiting for data")),
    }
    spans.push(Span::styled(
        "  │  t table  m charts  r refresh  q quit",
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
