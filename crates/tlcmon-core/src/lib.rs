//! # tlcmon-core - Core Domain Types
//!
//! Foundation crate for TLC Monitor. Provides the model-checking result
//! types, stream events, error handling and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Check Results (`check`)
//! - [`ModelCheckResult`] - Immutable snapshot of a TLC run
//! - [`CheckStatus`] - Run phase (NotStarted, SanyParsing, ..., Finished)
//! - [`CheckState`] - Run outcome (Running, Success, Error, Stopped)
//! - [`StatRow`], [`CoverageItem`], [`ErrorTraceItem`], [`OutputLine`]
//!
//! ### Values (`value`)
//! - [`Value`] - Structured TLA+ value from an error-trace state
//!
//! ### Diagnostics (`diagnostic`)
//! - [`DiagnosticCollection`] - Messages captured from SANY
//!
//! ### Events (`events`)
//! - [`TlcEvent`] - Line / end-of-stream items fed to the driver
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use tlcmon_core::prelude::*;
//! ```

pub mod check;
pub mod diagnostic;
pub mod error;
pub mod events;
pub mod logging;
pub mod prelude;
pub mod value;

// Re-export commonly used types at crate root for convenience
pub use check::{
    CheckState, CheckStatus, CoverageItem, ErrorTraceItem, ModelCheckResult, OutputLine,
    SourceRange, StatRow, VariableValue,
};
pub use diagnostic::{Diagnostic, DiagnosticCollection, Severity};
pub use error::{Error, Result, ResultExt};
pub use events::TlcEvent;
pub use value::Value;
