//! Logging setup for ambientectl.
//!
//! The dashboard owns the terminal, so it logs to a file, or nowhere when no
//! file can be opened; one-shot commands log to stderr. `RUST_LOG` overrides
//! the default `info` filter.

use anyhow::{anyhow, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    Discard,
}

/// Discover log file path with fallback chain
///
/// Priority:
/// 1. $AMBIENTE_LOG_FILE environment variable (explicit override)
/// 2. $XDG_STATE_HOME/ambiente/ctl.log (XDG standard)
/// 3. ~/.local/state/ambiente/ctl.log (XDG fallback)
pub fn discover_log_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("AMBIENTE_LOG_FILE") {
        return Some(PathBuf::from(path));
    }

    if let Ok(xdg_state) = std::env::var("XDG_STATE_HOME") {
        return Some(PathBuf::from(xdg_state).join("ambiente").join("ctl.log"));
    }

    dirs::home_dir().map(|home| home.join(".local/state/ambiente/ctl.log"))
}

/// Open a log file for appending, creating its directory
pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Dashboard target: the log file when it can be opened, otherwise discard
pub fn dashboard_target(path: Option<PathBuf>) -> LogTarget {
    match path {
        Some(path) if open_log_file(&path).is_ok() => LogTarget::File(path),
        _ => LogTarget::Discard,
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber
pub fn init(target: &LogTarget) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter());

    match target {
        LogTarget::Stderr => builder
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| anyhow!("Failed to initialize logging: {}", e)),
        LogTarget::File(path) => {
            let file = open_log_file(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
        }
        LogTarget::Discard => builder
            .with_writer(std::io::sink)
            .try_init()
            .map_err(|e| anyhow!("Failed to initialize logging: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dashboard_target_creates_log_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state").join("ambiente").join("ctl.log");
        assert_eq!(dashboard_target(Some(path.clone())), LogTarget::File(path.clone()));
        assert!(path.exists());
    }

    #[test]
    fn test_dashboard_target_discards_when_unwritable() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let path = blocker.join("ctl.log");
        assert!(open_log_file(&path).is_err());
        assert_eq!(dashboard_target(Some(path)), LogTarget::Discard);
        assert_eq!(dashboard_target(None), LogTarget::Discard);
    }
}
