//! Framing of TLC `-tool` messages
//!
//! TLC wraps each logical message in marker lines:
//!
//! ```text
//! @!@!@STARTMSG 2185:0 @!@!@
//! Starting... (2024-01-01 10:00:00)
//! @!@!@ENDMSG 2185 @!@!@
//! ```
//!
//! Messages nest (an error message can contain a nested expression message),
//! so [`MessageStack`] keeps the innermost open message plus every enclosing
//! one. [`classify_line`] decides what a raw line means for the stack.

use tracing::warn;

use crate::codes::{NONE, UNKNOWN};

const START_TOKEN: &str = "@!@!@STARTMSG ";
const END_TOKEN: &str = "@!@!@ENDMSG ";
const MARKER_TAIL: &str = " @!@!@";

// ─────────────────────────────────────────────────────────────────────────────
// Message
// ─────────────────────────────────────────────────────────────────────────────

/// A framed message and the lines collected while it was open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    code: i32,
    lines: Vec<String>,
}

impl Message {
    pub fn new(code: i32) -> Self {
        Self {
            code,
            lines: Vec::new(),
        }
    }

    /// The "no message" sentinel returned for an unmatched end marker
    pub fn none() -> Self {
        Self::new(NONE)
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn is_none(&self) -> bool {
        self.code == NONE
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MessageStack
// ─────────────────────────────────────────────────────────────────────────────

/// Tracks the hierarchy of open TLC messages
#[derive(Debug, Default)]
pub struct MessageStack {
    /// Innermost open message
    current: Option<Message>,
    /// Enclosing messages, most recent last
    previous: Vec<Message>,
}

impl MessageStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Code of the innermost open message, or [`NONE`]
    pub fn current_type(&self) -> i32 {
        self.current.as_ref().map_or(NONE, Message::code)
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Number of open messages
    pub fn depth(&self) -> usize {
        self.previous.len() + usize::from(self.current.is_some())
    }

    /// Open a new innermost message
    ///
    /// # Panics
    /// If `code` is [`NONE`]. Codes come from [`classify_line`], which never
    /// yields it, so this is an internal logic error.
    pub fn start(&mut self, code: i32) {
        assert!(code != NONE, "cannot start a message of type NONE");
        if let Some(open) = self.current.take() {
            self.previous.push(open);
        }
        self.current = Some(Message::new(code));
    }

    /// Close the innermost message and return it
    ///
    /// An end marker without an open message returns the sentinel.
    pub fn finish(&mut self) -> Message {
        match self.current.take() {
            Some(finished) => {
                self.current = self.previous.pop();
                finished
            }
            None => {
                warn!("Unexpected message end");
                Message::none()
            }
        }
    }

    /// Append a line to the innermost open message
    pub fn add_line(&mut self, line: impl Into<String>) {
        match self.current.as_mut() {
            Some(open) => open.lines.push(line.into()),
            None => warn!("Unexpected line when there's no current message"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Line Classification
// ─────────────────────────────────────────────────────────────────────────────

/// What a raw output line means for the message stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `@!@!@STARTMSG <code>[:<class>] @!@!@`, possibly preceded by text
    /// that belongs to the enclosing message
    Start { code: i32, prefix: Option<&'a str> },

    /// `@!@!@ENDMSG ... @!@!@`
    End,

    /// Anything else
    Content(&'a str),
}

/// Classify a raw line (start marker, end marker, or content)
pub fn classify_line(line: &str) -> LineKind<'_> {
    if let Some(kind) = parse_message_start(line) {
        return kind;
    }
    if is_message_end(line) {
        return LineKind::End;
    }
    LineKind::Content(line)
}

fn parse_message_start(line: &str) -> Option<LineKind<'_>> {
    let marker_idx = line.find(START_TOKEN)?;
    if !line.ends_with(MARKER_TAIL) {
        return None;
    }

    let prefix = (marker_idx > 0).then(|| &line[..marker_idx]);
    let body = &line[marker_idx..];

    Some(LineKind::Start {
        code: parse_code(body),
        prefix,
    })
}

/// Extract the code from `@!@!@STARTMSG <code>:<class> @!@!@`
fn parse_code(body: &str) -> i32 {
    // "@!@!@STARTMSG @!@!@" shares the space between both tokens
    if body.len() < START_TOKEN.len() + MARKER_TAIL.len() {
        return UNKNOWN;
    }
    let payload = &body[START_TOKEN.len()..body.len() - MARKER_TAIL.len()];
    let code = payload
        .split(':')
        .next()
        .and_then(|c| c.trim().parse::<i32>().ok())
        .unwrap_or(UNKNOWN);

    // NONE is reserved for the empty stack
    if code == NONE {
        UNKNOWN
    } else {
        code
    }
}

fn is_message_end(line: &str) -> bool {
    line.starts_with(END_TOKEN) && line.ends_with(MARKER_TAIL)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ─────────────────────────────────────────────────────────────────────────
    // Stack
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_empty_stack_reports_none() {
        let stack = MessageStack::new();
        assert_eq!(stack.current_type(), NONE);
        assert!(!stack.is_open());
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_nested_messages_restore_enclosing() {
        let mut stack = MessageStack::new();
        stack.start(2110);
        stack.add_line("outer 1");
        stack.start(2103);
        stack.add_line("inner");
        assert_eq!(stack.current_type(), 2103);
        assert_eq!(stack.depth(), 2);

        let inner = stack.finish();
        assert_eq!(inner.code(), 2103);
        assert_eq!(inner.lines(), &["inner".to_string()]);
        assert_eq!(stack.current_type(), 2110);

        stack.add_line("outer 2");
        let outer = stack.finish();
        assert_eq!(outer.lines(), &["outer 1".to_string(), "outer 2".to_string()]);
        assert_eq!(stack.current_type(), NONE);
    }

    #[test]
    fn test_unmatched_finish_returns_sentinel() {
        let mut stack = MessageStack::new();
        let msg = stack.finish();
        assert!(msg.is_none());
        assert!(msg.lines().is_empty());
        assert_eq!(stack.current_type(), NONE);
    }

    #[test]
    fn test_line_without_message_is_dropped() {
        let mut stack = MessageStack::new();
        stack.add_line("stray");
        stack.start(1000);
        assert!(stack.finish().lines().is_empty());
    }

    #[test]
    #[should_panic(expected = "NONE")]
    fn test_start_none_panics() {
        let mut stack = MessageStack::new();
        stack.start(NONE);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Classification
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_classify_start_marker() {
        assert_eq!(
            classify_line("@!@!@STARTMSG 2185:0 @!@!@"),
            LineKind::Start {
                code: 2185,
                prefix: None
            }
        );
    }

    #[test]
    fn test_classify_start_marker_without_class() {
        assert_eq!(
            classify_line("@!@!@STARTMSG 2200 @!@!@"),
            LineKind::Start {
                code: 2200,
                prefix: None
            }
        );
    }

    #[test]
    fn test_classify_start_marker_with_prefix() {
        assert_eq!(
            classify_line("foo@!@!@STARTMSG 1000:1 @!@!@"),
            LineKind::Start {
                code: 1000,
                prefix: Some("foo")
            }
        );
    }

    #[test]
    fn test_classify_start_marker_bad_code_is_unknown() {
        assert_eq!(
            classify_line("@!@!@STARTMSG abc:1 @!@!@"),
            LineKind::Start {
                code: UNKNOWN,
                prefix: None
            }
        );
        assert_eq!(
            classify_line("@!@!@STARTMSG -1:0 @!@!@"),
            LineKind::Start {
                code: UNKNOWN,
                prefix: None
            }
        );
        assert_eq!(
            classify_line("@!@!@STARTMSG @!@!@"),
            LineKind::Start {
                code: UNKNOWN,
                prefix: None
            }
        );
    }

    #[test]
    fn test_classify_start_requires_tail() {
        assert_eq!(
            classify_line("@!@!@STARTMSG 2185:0"),
            LineKind::Content("@!@!@STARTMSG 2185:0")
        );
    }

    #[test]
    fn test_classify_end_marker() {
        assert_eq!(classify_line("@!@!@ENDMSG 2185 @!@!@"), LineKind::End);
        assert_eq!(
            classify_line("x @!@!@ENDMSG 2185 @!@!@"),
            LineKind::Content("x @!@!@ENDMSG 2185 @!@!@")
        );
    }

    #[test]
    fn test_classify_content() {
        assert_eq!(
            classify_line("Progress(5) at 2024-01-01"),
            LineKind::Content("Progress(5) at 2024-01-01")
        );
    }
}
