//! Input stream events

/// One item of the line-delimited TLC output stream
///
/// `Closed` is the explicit end-of-stream signal. It is distinct from simply
/// receiving no more lines: only a close triggers finalization of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlcEvent {
    /// A line of TLC stdout, without the trailing newline
    Line(String),

    /// The stream has ended (EOF or process exit)
    Closed,
}

impl TlcEvent {
    pub fn line(text: impl Into<String>) -> Self {
        TlcEvent::Line(text.into())
    }
}
