//! Plain-text output for the one-shot commands.
//!
//! Builders return strings so callers decide where they go; color is applied
//! only when `color` is set.

use ambiente_shared::{HealthLevel, HealthSummary, SensorKey};
use console::{measure_text_width, pad_str, Alignment};
use owo_colors::OwoColorize;

use crate::surface::{LineChart, TableRow};
use crate::table::COLUMNS;

const KEY_WIDTH: usize = 20;

fn indicator(level: HealthLevel, color: bool) -> String {
    let tag = format!("[{}]", level);
    if !color {
        return tag;
    }
    match level {
        HealthLevel::Good => tag.bright_green().to_string(),
        HealthLevel::Warning => tag.yellow().to_string(),
        HealthLevel::Critical => tag.bright_red().to_string(),
    }
}

fn join_cells<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| pad_str(cell, *width, Alignment::Left, None).into_owned())
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Readings table with aligned columns
pub fn format_table(rows: &[TableRow], color: bool) -> String {
    let mut widths: Vec<usize> = COLUMNS.iter().map(|c| measure_text_width(c)).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(&row.cells) {
            *width = (*width).max(measure_text_width(cell));
        }
    }

    let header = join_cells(COLUMNS.iter().copied(), &widths);
    let mut out = String::new();
    if color {
        out.push_str(&header.bold().to_string());
    } else {
        out.push_str(&header);
    }
    out.push('\n');

    for row in rows {
        out.push_str(&join_cells(row.cells.iter().map(String::as_str), &widths));
        out.push('\n');
    }

    if rows.is_empty() {
        out.push_str("(no readings)\n");
    }
    out
}

/// Per-sensor summary of the charts on the dashboard mounts
pub fn format_chart_summary(charts: &[(SensorKey, Option<&LineChart>)], color: bool) -> String {
    let mut out = String::new();
    for (key, chart) in charts {
        let label = format!("{:width$}", key.label(), width = KEY_WIDTH);
        let label = if color { label.cyan().to_string() } else { label };

        let Some(chart) = chart else {
            out.push_str(&format!("{} (no chart)\n", label));
            continue;
        };
        let points: Vec<f64> = chart
            .datasets
            .iter()
            .flat_map(|d| d.points.iter().flatten().copied())
            .collect();
        let span = match (chart.labels.first(), chart.labels.last()) {
            (Some(first), Some(last)) => format!("{} .. {}", first, last),
            _ => String::new(),
        };

        if points.is_empty() {
            out.push_str(&format!(
                "{} {} points, all gaps  {}\n",
                label,
                chart.labels.len(),
                span
            ));
            continue;
        }

        let min = points.iter().copied().fold(f64::INFINITY, f64::min);
        let max = points.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let last = points[points.len() - 1];
        out.push_str(&format!(
            "{} {}/{} points  min {}  max {}  last {}  {}\n",
            label,
            points.len(),
            chart.labels.len(),
            min,
            max,
            last,
            span
        ));
    }
    out
}

fn kv(key: &str, value: &str) -> String {
    format!("{:width$} {}\n", key, value, width = KEY_WIDTH)
}

/// Health summary in key/value form
pub fn format_health(summary: &HealthSummary, color: bool) -> String {
    let mut out = String::new();
    out.push_str(&kv("overall", &indicator(summary.overall(), color)));
    out.push_str(&kv("readings", &summary.readings.to_string()));
    out.push_str(&kv(
        "i2c_latency_avg",
        &format!(
            "{:.0} µs  {}",
            summary.i2c_latency_avg_us,
            indicator(summary.i2c_level(), color)
        ),
    ));
    out.push_str(&kv(
        "wifi_uptime",
        &format!(
            "{:.1}%  {}",
            summary.wifi_uptime_pct,
            indicator(summary.wifi_level(), color)
        ),
    ));
    out.push_str(&kv(
        "unexpected_resets",
        &format!(
            "{}  {}",
            summary.unexpected_resets,
            indicator(summary.resets_level(), color)
        ),
    ));
    out.push_str(&kv("comm_errors", &summary.comm_errors.to_string()));
    out
}
