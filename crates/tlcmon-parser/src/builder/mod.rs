//! Incremental construction of [`ModelCheckResult`] from TLC output lines
//!
//! [`ModelCheckResultBuilder::add_line`] consumes one raw line at a time. Frame
//! markers drive the [`MessageStack`]; when a frame closes, its code selects
//! a sub-grammar from [`crate::grammar`] and the status/outcome state machine
//! is updated. Lines outside any frame are either SANY output (while SANY is
//! running) or plain console output.


use chrono::NaiveDateTime;
use tlcmon_core::{
    CheckState, CheckStatus, CoverageItem, DiagnosticCollection, ErrorTraceItem, ModelCheckResult,
    OutputLine, StatRow,
};
use tracing::{debug, trace};

use crate::codes::*;
use crate::grammar;
use crate::message::{classify_line, LineKind, Message, MessageStack};
use crate::sany::SanyOutputParser;
use crate::traits::{DiagnosticParser, ValueParser};
use crate::values::TlaValueParser;

/// First line of the wrapper TLC emits after a nested root-cause error
pub const UNEXPECTED_EXCEPTION: &str = "TLC threw an unexpected exception.";

/// Gradually builds a [`ModelCheckResult`] by processing TLC output lines
pub struct ModelCheckResultBuilder {
    model_name: String,
    state: CheckState,
    status: CheckStatus,
    start_date_time: Option<NaiveDateTime>,
    end_date_time: Option<NaiveDateTime>,
    duration: Option<u64>,
    process_info: Option<String>,
    stats: Vec<StatRow>,
    coverage: Vec<CoverageItem>,
    errors: Vec<Vec<String>>,
    error_trace: Vec<ErrorTraceItem>,
    messages: MessageStack,
    sany_lines: Vec<String>,
    sany_messages: Option<DiagnosticCollection>,
    output_lines: Vec<OutputLine>,
    workers_count: u32,
    /// Baseline for statistics elapsed time
    first_stat_time: Option<NaiveDateTime>,
    fingerprint_collision_probability: Option<String>,
    value_parser: Box<dyn ValueParser>,
    diagnostic_parser: Box<dyn DiagnosticParser>,
}

impl std::fmt::Debug for ModelCheckResultBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelCheckResultBuilder")
            .field("model_name", &self.model_name)
            .field("state", &self.state)
            .field("status", &self.status)
            .field("open_messages", &self.messages.depth())
            .finish_non_exhaustive()
    }
}

impl ModelCheckResultBuilder {
    /// Builder using the bundled TLA+ value and SANY output parsers
    pub fn new(model_name: impl Into<String>) -> Self {
        Self::with_parsers(
            model_name,
            Box::new(TlaValueParser),
            Box::new(SanyOutputParser),
        )
    }

    pub fn with_parsers(
        model_name: impl Into<String>,
        value_parser: Box<dyn ValueParser>,
        diagnostic_parser: Box<dyn DiagnosticParser>,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            state: CheckState::Running,
            status: CheckStatus::NotStarted,
            start_date_time: None,
            end_date_time: None,
            duration: None,
            process_info: None,
            stats: Vec::new(),
            coverage: Vec::new(),
            errors: Vec::new(),
            error_trace: Vec::new(),
            messages: MessageStack::new(),
            sany_lines: Vec::new(),
            sany_messages: None,
            output_lines: Vec::new(),
            workers_count: 0,
            first_stat_time: None,
            fingerprint_collision_probability: None,
            value_parser,
            diagnostic_parser,
        }
    }

    pub fn status(&self) -> CheckStatus {
        self.status
    }

    pub fn state(&self) -> CheckState {
        self.state
    }

    pub fn sany_messages(&self) -> Option<&DiagnosticCollection> {
        self.sany_messages.as_ref()
    }

    /// Process one raw line of TLC output
    pub fn add_line(&mut self, line: &str) {
        match classify_line(line) {
            LineKind::Start { code, prefix } => {
                if let Some(prefix) = prefix {
                    // Text before the marker belongs to the enclosing context
                    self.add_content_line(prefix);
                }
                self.messages.start(code);
            }
            LineKind::End => {
                let message = self.messages.finish();
                self.handle_message_end(message);
            }
            LineKind::Content(text) => self.add_content_line(text),
        }
    }

    /// The stream ended; a run that never reported `Finished` was stopped
    pub fn note_stream_ended(&mut self) {
        if self.status != CheckStatus::Finished {
            debug!("Stream closed in status {:?}, marking run stopped", self.status);
            self.state = CheckState::Stopped;
        }
    }

    /// Snapshot of the current state
    pub fn snapshot(&self) -> ModelCheckResult {
        ModelCheckResult {
            model_name: self.model_name.clone(),
            state: self.state,
            status: self.status,
            process_info: self.process_info.clone(),
            stats: self.stats.clone(),
            coverage: self.coverage.clone(),
            errors: self.errors.clone(),
            error_trace: self.error_trace.clone(),
            sany_messages: self.sany_messages.clone(),
            start_date_time: self.start_date_time,
            end_date_time: self.end_date_time,
            duration: self.duration,
            workers_count: self.workers_count,
            fingerprint_collision_probability: self.fingerprint_collision_probability.clone(),
            output_lines: self.output_lines.clone(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Line Handling
    // ─────────────────────────────────────────────────────────────────────────

    fn add_content_line(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }
        if self.messages.is_open() {
            self.messages.add_line(line);
        } else if self.status == CheckStatus::SanyParsing {
            self.sany_lines.push(line.to_string());
        } else {
            self.add_output_line(line);
        }
    }

    /// Consecutive identical lines collapse into one counted entry
    fn add_output_line(&mut self, line: &str) {
        match self.output_lines.last_mut() {
            Some(prev) if prev.text == line => prev.increment(),
            _ => self.output_lines.push(OutputLine::new(line)),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Message Dispatch
    // ─────────────────────────────────────────────────────────────────────────

    /// Move the status forward; a transition to an earlier phase is ignored
    fn advance_status(&mut self, status: CheckStatus) {
        if status > self.status {
            self.status = status;
        } else if status < self.status {
            debug!(
                "Ignoring status regression {:?} -> {:?}",
                self.status, status
            );
        }
    }

    fn handle_message_end(&mut self, message: Message) {
        // Any end marker means TLC is talking, even an unmatched one
        self.advance_status(CheckStatus::Starting);
        if message.is_none() {
            return;
        }
        trace!(
            "Message {} finished with {} line(s)",
            message.code(),
            message.lines().len()
        );

        let lines = message.lines();
        match message.code() {
            TLC_MODE_MC => {
                self.process_info = Some(lines.concat());
            }
            TLC_SANY_START => {
                self.advance_status(CheckStatus::SanyParsing);
            }
            TLC_SANY_END => {
                self.advance_status(CheckStatus::SanyFinished);
                self.parse_sany_output();
            }
            TLC_CHECKPOINT_START => {
                self.advance_status(CheckStatus::Checkpointing);
            }
            TLC_STARTING => {
                if let Some(start) = grammar::parse_starting(lines) {
                    self.start_date_time = Some(start);
                }
            }
            TLC_COMPUTING_INIT | TLC_COMPUTING_INIT_PROGRESS => {
                self.advance_status(CheckStatus::InitialStatesComputing);
            }
            TLC_INIT_GENERATED1 | TLC_INIT_GENERATED2 | TLC_INIT_GENERATED3
            | TLC_INIT_GENERATED4 => {
                if let Some(init) = grammar::parse_initial_states(lines) {
                    self.first_stat_time = Some(init.at);
                    self.stats.push(init.to_stat_row());
                }
            }
            TLC_CHECKING_TEMPORAL_PROPS => {
                let is_final = lines.first().is_some_and(|l| l.contains("complete"));
                self.advance_status(if is_final {
                    CheckStatus::CheckingLivenessFinal
                } else {
                    CheckStatus::CheckingLiveness
                });
            }
            TLC_DISTRIBUTED_SERVER_RUNNING => {
                self.advance_status(CheckStatus::ServerRunning);
            }
            TLC_DISTRIBUTED_WORKER_REGISTERED => {
                self.advance_status(CheckStatus::WorkersRegistered);
                self.workers_count += 1;
            }
            TLC_DISTRIBUTED_WORKER_DEREGISTERED => {
                self.workers_count = self.workers_count.saturating_sub(1);
            }
            TLC_PROGRESS_STATS => {
                if let Some(progress) = grammar::parse_progress(lines) {
                    self.stats.push(progress.to_stat_row(self.first_stat_time));
                }
            }
            TLC_COVERAGE_INIT => {
                self.coverage.clear();
                self.coverage.extend(grammar::parse_coverage(lines));
            }
            TLC_COVERAGE_NEXT => {
                self.coverage.extend(grammar::parse_coverage(lines));
            }
            GENERAL
            | TLC_INITIAL_STATE
            | TLC_NESTED_EXPRESSION
            | TLC_TEMPORAL_PROPERTY_VIOLATED
            | TLC_VALUE_ASSERT_FAILED => {
                self.add_error(message.into_lines());
            }
            TLC_STATE_PRINT1 | TLC_STATE_PRINT2 | TLC_STATE_PRINT3 => {
                if lines.is_empty() {
                    debug!("Error trace expected but message buffer is empty");
                } else if let Some(item) =
                    grammar::parse_trace_item(lines, self.value_parser.as_ref())
                {
                    self.error_trace.push(item);
                }
            }
            TLC_SUCCESS => {
                if let Some(probability) = grammar::parse_success(lines) {
                    self.fingerprint_collision_probability = Some(probability);
                }
                self.state = CheckState::Success;
            }
            TLC_FINISHED => {
                self.advance_status(CheckStatus::Finished);
                if let Some(finished) = grammar::parse_finished(lines) {
                    self.duration = Some(finished.duration_ms);
                    self.end_date_time = Some(finished.at);
                }
                if self.state != CheckState::Success {
                    self.state = CheckState::Error;
                }
            }
            code => {
                trace!("No handler for message code {}", code);
            }
        }
    }

    fn parse_sany_output(&mut self) {
        self.sany_messages = self.diagnostic_parser.parse_diagnostics(&self.sany_lines);
    }

    /// Record an error message
    ///
    /// TLC reports a root cause first and then wraps it in an "unexpected
    /// exception" message, so the wrapper is merged in front of the
    /// previous error instead of becoming a new one.
    fn add_error(&mut self, lines: Vec<String>) {
        if lines.is_empty() {
            return;
        }
        match self.errors.last_mut() {
            Some(prev) if lines[0] == UNEXPECTED_EXCEPTION => {
                let cause = std::mem::take(prev);
                *prev = lines;
                prev.extend(cause);
            }
            _ => self.errors.push(lines),
        }
    }
}
