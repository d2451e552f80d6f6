//! File logging for the dynicon host
//!
//! Stdout carries the host protocol, so every event goes to a daily log file
//! under `<data_local_dir>/dynicon/logs/`. Verbosity comes from `DYNICON_LOG`:
//!
//! ```bash
//! DYNICON_LOG=debug dynicon serve
//! DYNICON_LOG=dynicon_app::switcher=trace dynicon serve
//! ```

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Environment variable holding an `EnvFilter` directive string
pub const LOG_ENV: &str = "DYNICON_LOG";

/// Workspace crates (`dynicon_*`) and the host library at info, the rest at warn
pub const DEFAULT_FILTER: &str = "dynicon=info,dynamic_icon=info,warn";

const LOG_FILE_PREFIX: &str = "dynicon.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Install the global subscriber and return the log directory
pub fn init() -> Result<PathBuf> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);
    let file_layer = fmt::layer()
        .with_writer(appender)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(fmt::time::ChronoLocal::new(TIMESTAMP_FORMAT.to_string()));

    tracing_subscriber::registry()
        .with(env_filter())
        .with(file_layer)
        .init();

    tracing::info!("dynicon logging to {}", log_dir.display());
    Ok(log_dir)
}

/// Filter from `DYNICON_LOG`, falling back to [`DEFAULT_FILTER`]
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dynicon")
        .join("logs")
}
