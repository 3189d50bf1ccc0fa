//! Logging setup
//!
//! Headless commands log to stderr. The terminal UI owns the screen, so it
//! logs to a file when one is given and stays silent otherwise.

use anyhow::Result;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Where log records go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    /// No subscriber is installed
    Off,
}

impl LogTarget {
    /// Target for a command: an explicit log file wins, otherwise stderr for
    /// headless commands and nothing for the terminal UI.
    pub fn for_command(log_file: Option<&Path>, interactive: bool) -> Self {
        match log_file {
            Some(path) => Self::File(path.to_path_buf()),
            None if interactive => Self::Off,
            None => Self::Stderr,
        }
    }

    fn default_directive(&self) -> &'static str {
        match self {
            Self::File(_) => "raflow=debug",
            Self::Stderr | Self::Off => "warn",
        }
    }
}

/// Filter from `RUST_LOG`, or `default` when unset or invalid.
fn make_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the global subscriber. Call once at startup; later calls are
/// ignored.
pub fn init_logging(target: &LogTarget) -> Result<()> {
    let filter = make_filter(target.default_directive());

    let installed = match target {
        LogTarget::Off => return Ok(()),
        LogTarget::Stderr => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(io::stderr)
                    .with_ansi(io::stderr().is_terminal())
                    .with_target(false),
            )
            .try_init()
            .is_ok(),
        LogTarget::File(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| anyhow::anyhow!("cannot open log file '{}': {e}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false),
                )
                .try_init()
                .is_ok()
        }
    };

    if installed {
        tracing::debug!(?target, "logging initialized");
    }
    Ok(())
}
