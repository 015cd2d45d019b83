//! Configuration file parsing for TLC Monitor
//!
//! Supports:
//! - `.tlcmon/config.toml` - Update interval and output format

pub mod settings;
pub mod types;

pub use settings::{init_config_dir, load_settings};
pub use types::*;
