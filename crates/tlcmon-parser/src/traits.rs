//! Collaborator seams used by the result builder
//!
//! The builder does not interpret TLA+ values or SANY output itself; it hands
//! the captured lines to these parsers. Default implementations live in
//! [`crate::values`] and [`crate::sany`].

use tlcmon_core::{DiagnosticCollection, Value};

/// Turns the text of a (possibly multi-line) TLA+ value into a [`Value`]
#[cfg_attr(test, mockall::automock)]
pub trait ValueParser: Send {
    fn parse_value(&self, lines: &[String]) -> Value;
}

/// Turns SANY's console output into diagnostics
#[cfg_attr(test, mockall::automock)]
pub trait DiagnosticParser: Send {
    /// Returns `None` when there is nothing to report
    fn parse_diagnostics(&self, lines: &[String]) -> Option<DiagnosticCollection>;
}
