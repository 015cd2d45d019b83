//! TLC Monitor Library
//!
//! Follows the output of the TLC model checker and reports structured
//! results as NDJSON events or a plain-text summary.

pub mod headless;
pub mod report;

// Re-export main entry points
pub use headless::runner::{exit_code, model_name_for, run_headless, RunOptions};
