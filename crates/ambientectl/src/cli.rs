//! CLI - Command-line argument parsing
//!
//! Defines the CLI structure using clap.
//! Keeps argument parsing separate from execution logic.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Ambiente station dashboard
#[derive(Parser, Debug)]
#[command(name = "ambientectl")]
#[command(about = "Ambiente - live sensor readings as a table or charts", long_about = None)]
#[command(version = env!("AMBIENTE_VERSION"))]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Station server base URL (overrides the config file)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Refresh period in milliseconds (overrides the config file)
    #[arg(long, global = true)]
    pub interval_ms: Option<u64>,

    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand (if not provided, starts the dashboard)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Interactive dashboard refreshing on a fixed interval
    Dashboard {
        /// Route to open (`/metricas` opens the charts)
        #[arg(long)]
        route: Option<String>,
    },

    /// Run one render cycle and print the result
    Once {
        /// Route deciding between table and charts
        #[arg(long)]
        route: Option<String>,
    },

    /// Device health summary of the current readings
    Status {
        /// Output JSON only
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_dashboard() {
        let cli = Cli::try_parse_from(["ambientectl"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ambientectl",
            "once",
            "--route",
            "/metricas",
            "--url",
            "http://station:8080",
            "--interval-ms",
            "1000",
        ])
        .unwrap();
        assert_eq!(cli.url.as_deref(), Some("http://station:8080"));
        assert_eq!(cli.interval_ms, Some(1000));
        assert_eq!(
            cli.command,
            Some(Commands::Once {
                route: Some("/metricas".to_string())
            })
        );
    }

    #[test]
    fn test_status_json() {
        let cli = Cli::try_parse_from(["ambientectl", "status", "--json"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Status { json: true }));
    }
}
