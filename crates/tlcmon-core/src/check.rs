//! Model checking result types
//!
//! [`ModelCheckResult`] is the immutable snapshot handed to consumers. It is
//! assembled by the result builder in `tlcmon-parser` from TLC's `-tool`
//! output and carries everything known about a run at the moment it was
//! built: phase, outcome, statistics, coverage, errors and the error trace.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::diagnostic::DiagnosticCollection;
use crate::value::Value;

// ─────────────────────────────────────────────────────────────────────────────
// Status & Outcome
// ─────────────────────────────────────────────────────────────────────────────

/// Phase of a TLC run
///
/// Variants are declared in transition order; the derived `Ord` is what keeps
/// the builder from ever moving a run backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    #[default]
    NotStarted,
    Starting,
    SanyParsing,
    SanyFinished,
    Checkpointing,
    InitialStatesComputing,
    CheckingLiveness,
    CheckingLivenessFinal,
    ServerRunning,
    WorkersRegistered,
    Finished,
}

impl CheckStatus {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            CheckStatus::NotStarted => "Not started",
            CheckStatus::Starting => "Starting",
            CheckStatus::SanyParsing => "Parsing",
            CheckStatus::SanyFinished => "Parsing finished",
            CheckStatus::Checkpointing => "Checkpointing",
            CheckStatus::InitialStatesComputing => "Computing initial states",
            CheckStatus::CheckingLiveness => "Checking liveness",
            CheckStatus::CheckingLivenessFinal => "Checking final liveness",
            CheckStatus::ServerRunning => "Master waiting for workers",
            CheckStatus::WorkersRegistered => "Distributed workers registered",
            CheckStatus::Finished => "Finished",
        }
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Terminal disposition of a run, independent of [`CheckStatus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckState {
    #[default]
    Running,
    Success,
    Error,
    /// The stream closed before TLC reported it had finished
    Stopped,
}

impl std::fmt::Display for CheckState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckState::Running => write!(f, "running"),
            CheckState::Success => write!(f, "success"),
            CheckState::Error => write!(f, "error"),
            CheckState::Stopped => write!(f, "stopped"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rows
// ─────────────────────────────────────────────────────────────────────────────

/// Source location as reported by TLC (1-based lines and columns)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct SourceRange {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl SourceRange {
    pub fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// The zero range used by steps that have no source location
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl std::fmt::Display for SourceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}, col {} to line {}, col {}",
            self.start_line, self.start_col, self.end_line, self.end_col
        )
    }
}

/// One state-space exploration sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatRow {
    /// Elapsed time since the initial states were computed, `HH:MM:SS`
    pub time_stamp: String,
    /// Search depth reported by `Progress(N)`
    pub diameter: u64,
    pub total: u64,
    pub distinct: u64,
    pub queue_size: u64,
}

impl StatRow {
    pub fn new(
        time_stamp: impl Into<String>,
        diameter: u64,
        total: u64,
        distinct: u64,
        queue_size: u64,
    ) -> Self {
        Self {
            time_stamp: time_stamp.into(),
            diameter,
            total,
            distinct,
            queue_size,
        }
    }
}

/// Coverage counters for one action or expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageItem {
    pub module: String,
    pub action: String,
    pub range: SourceRange,
    pub total: u64,
    pub distinct: u64,
}

/// A variable assignment inside an error-trace state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableValue {
    pub name: String,
    pub value: Value,
}

impl VariableValue {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// One state of a counterexample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorTraceItem {
    pub num: u32,
    /// `Initial predicate`, `Stuttering`, or `<action> in <module>`
    pub title: String,
    pub module: Option<String>,
    pub action: Option<String>,
    pub range: SourceRange,
    pub variables: Vec<VariableValue>,
}

/// Plain console line with run-length deduplication
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputLine {
    pub text: String,
    pub count: u32,
}

impl OutputLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            count: 1,
        }
    }

    pub fn increment(&mut self) {
        self.count = self.count.saturating_add(1);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Snapshot
// ─────────────────────────────────────────────────────────────────────────────

/// Point-in-time snapshot of a TLC run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelCheckResult {
    pub model_name: String,
    pub state: CheckState,
    pub status: CheckStatus,
    pub process_info: Option<String>,
    pub stats: Vec<StatRow>,
    pub coverage: Vec<CoverageItem>,
    /// Each error is the raw text of one reported problem
    pub errors: Vec<Vec<String>>,
    pub error_trace: Vec<ErrorTraceItem>,
    pub sany_messages: Option<DiagnosticCollection>,
    pub start_date_time: Option<NaiveDateTime>,
    pub end_date_time: Option<NaiveDateTime>,
    /// Milliseconds, as reported by `Finished in Nms`
    pub duration: Option<u64>,
    pub workers_count: u32,
    pub fingerprint_collision_probability: Option<String>,
    pub output_lines: Vec<OutputLine>,
}

impl ModelCheckResult {
    /// An empty result for a run that has produced no output yet
    pub fn empty(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            state: CheckState::Running,
            status: CheckStatus::NotStarted,
            process_info: None,
            stats: Vec::new(),
            coverage: Vec::new(),
            errors: Vec::new(),
            error_trace: Vec::new(),
            sany_messages: None,
            start_date_time: None,
            end_date_time: None,
            duration: None,
            workers_count: 0,
            fingerprint_collision_probability: None,
            output_lines: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == CheckState::Running
    }

    /// Most recent statistics sample
    pub fn last_stat(&self) -> Option<&StatRow> {
        self.stats.last()
    }
}
