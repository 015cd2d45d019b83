//! tlcmon-app - Streaming driver and configuration for TLC Monitor
//!
//! This crate connects a line source to the result builder: the reader turns
//! any async byte stream into [`TlcEvent`](tlcmon_core::TlcEvent)s, the
//! driver feeds them to a [`ModelCheckResultBuilder`](tlcmon_parser::ModelCheckResultBuilder)
//! and emits debounced snapshots, and the config module loads the update
//! and output settings.

pub mod config;
pub mod driver;
pub mod reader;
pub mod scheduler;

// Re-export primary types
pub use config::{load_settings, OutputFormat, Settings, UpdateSettings};
pub use driver::StreamDriver;
pub use reader::read_lines;
pub use scheduler::{UpdateScheduler, UpdateState};
