//! Ambiente Control - terminal dashboard for an Ambiente station

use ambientectl::cli::{Cli, Commands};
use ambientectl::config::Config;
use ambientectl::logging::{self, LogTarget};
use ambientectl::{commands, tui};
use anyhow::Result;
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Dashboard { route: None });

    // The dashboard owns the terminal, so it never logs to stderr
    let log_target = match &command {
        Commands::Dashboard { .. } => logging::dashboard_target(logging::discover_log_path()),
        _ => LogTarget::Stderr,
    };
    logging::init(&log_target).or_else(|_| logging::init(&LogTarget::Discard))?;

    let mut config = Config::load(cli.config.as_deref());
    config.apply_overrides(cli.url, cli.interval_ms);

    match command {
        Commands::Dashboard { route } => {
            let route = route.unwrap_or_else(|| config.initial_route.clone());
            tui::run(config, route).await
        }
        Commands::Once { route } => commands::handle_once(&config, route).await,
        Commands::Status { json } => commands::handle_status(&config, json).await,
    }
}
