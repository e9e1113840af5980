//! ambientectl library - polls an Ambiente station and renders its readings.
//!
//! A [`scheduler::Scheduler`] re-reads the page route on every tick and runs
//! either the [`table::TableRenderer`] or the [`chart::ChartRenderer`]. Both
//! fetch through a [`fetcher::DataFetcher`] and draw into the narrow render
//! targets of [`surface`].

pub mod chart;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod fetcher;
pub mod logging;
pub mod output;
pub mod renderer;
pub mod scheduler;
pub mod surface;
pub mod table;
pub mod tui;
