//! Headless mode - NDJSON event output
//!
//! Every snapshot of the TLC run is written to stdout as one JSON object per
//! line, so the output can be consumed by scripts and editor integrations.
//!
//! # Event Format
//!
//! Each event has an "event" field indicating its type, along with
//! event-specific data.
//!
//! # Example Output
//!
//! ```json
//! {"event":"snapshot","result":{"model_name":"MC","state":"running","status":"starting",...},"timestamp":1704700001000}
//! {"event":"snapshot","result":{"model_name":"MC","state":"success","status":"finished",...},"timestamp":1704700002000}
//! {"event":"finished","status":"finished","state":"success","exit_code":0,"timestamp":1704700002000}
//! ```

pub mod runner;

use chrono::Utc;
use serde::Serialize;
use std::io::{self, Write};
use tlcmon_core::prelude::*;
use tlcmon_core::{CheckState, CheckStatus, ModelCheckResult};

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// Current state of the run
    Snapshot {
        result: ModelCheckResult,
        timestamp: i64,
    },

    /// The stream has ended; written after the final snapshot
    Finished {
        status: CheckStatus,
        state: CheckState,
        exit_code: i32,
        timestamp: i64,
    },

    /// Error occurred
    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },
}

impl HeadlessEvent {
    /// Emit this event to stdout as JSON
    pub fn emit(&self) {
        let mut stdout = io::stdout().lock();
        if let Err(e) = self.write_to(&mut stdout) {
            error!("Failed to write headless event to stdout: {}", e);
        }
    }

    /// Write this event as one NDJSON line
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        let json = serde_json::to_string(self)?;
        writeln!(out, "{}", json)?;
        out.flush()?;
        Ok(())
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    // ─────────────────────────────────────────────────────────
    // Convenience constructors
    // ─────────────────────────────────────────────────────────

    pub fn snapshot(result: ModelCheckResult) -> Self {
        Self::Snapshot {
            result,
            timestamp: Self::now(),
        }
    }

    pub fn finished(result: &ModelCheckResult) -> Self {
        Self::Finished {
            status: result.status,
            state: result.state,
            exit_code: runner::exit_code(result.state),
            timestamp: Self::now(),
        }
    }

    pub fn error(message: impl Into<String>, fatal: bool) -> Self {
        Self::Error {
            message: message.into(),
            fatal,
            timestamp: Self::now(),
        }
    }
}
