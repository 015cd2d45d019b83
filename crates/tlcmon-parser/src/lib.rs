//! # tlcmon-parser - TLC Output Parsing
//!
//! Turns the line-oriented output of `tlc -tool` into a [`ModelCheckResult`].
//!
//! Depends on [`tlcmon_core`] for domain types.
//!
//! ## Public API
//!
//! ### Result Building
//! - [`ModelCheckResultBuilder`] - Feed lines, read snapshots at any time
//!
//! ### Framing (`message`)
//! - [`MessageStack`] - Nested `STARTMSG` / `ENDMSG` frames
//! - [`classify_line()`] - Start marker, end marker or content
//!
//! ### Sub-grammars (`grammar`)
//! - [`grammar::parse_progress()`], [`grammar::parse_coverage()`],
//!   [`grammar::parse_trace_item()`] and friends
//!
//! ### Collaborators (`traits`)
//! - [`ValueParser`] / [`TlaValueParser`] - TLA+ values in error traces
//! - [`DiagnosticParser`] / [`SanyOutputParser`] - SANY console output
//!
//! [`ModelCheckResult`]: tlcmon_core::ModelCheckResult

pub mod builder;
pub mod codes;
pub mod grammar;
pub mod message;
pub mod sany;
pub mod time;
pub mod traits;
pub mod values;

pub use builder::{ModelCheckResultBuilder, UNEXPECTED_EXCEPTION};
pub use message::{classify_line, LineKind, Message, MessageStack};
pub use sany::SanyOutputParser;
pub use time::parse_date_time;
pub use traits::{DiagnosticParser, ValueParser};
pub use values::TlaValueParser;
