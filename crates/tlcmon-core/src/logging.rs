//! Logging setup
//!
//! stdout carries NDJSON results, so diagnostics go to a daily-rolling file.
//! `TLCMON_LOG` takes `EnvFilter` directives:
//!
//! ```bash
//! TLCMON_LOG=debug tlcmon MC.out
//! TLCMON_LOG=tlcmon_parser=trace tlcmon MC.out
//! ```

use std::path::{Path, PathBuf};

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{Error, Result};

/// Environment variable holding filter directives
pub const LOG_ENV: &str = "TLCMON_LOG";

/// Filter used when `TLCMON_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "tlc_monitor=info,tlcmon_app=info,tlcmon_parser=info,warn";

const LOG_FILE_PREFIX: &str = "tlcmon.log";

/// `dir` when given, else `<data_local_dir>/tlc-monitor/logs`
pub fn log_directory(dir: Option<&Path>) -> PathBuf {
    match dir {
        Some(dir) => dir.to_path_buf(),
        None => dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tlc-monitor")
            .join("logs"),
    }
}

fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the file subscriber and return the directory it writes to
pub fn init(dir: Option<&Path>) -> Result<PathBuf> {
    let log_dir = log_directory(dir);
    std::fs::create_dir_all(&log_dir)?;

    let appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);
    let filter = filter_from(std::env::var(LOG_ENV).ok().as_deref());

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .try_init()
        .map_err(|e| Error::Setup(format!("logging: {}", e)))?;

    tracing::info!(
        "TLC Monitor {} logging to {}",
        env!("CARGO_PKG_VERSION"),
        log_dir.display()
    );
    Ok(log_dir)
}
