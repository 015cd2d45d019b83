//! SANY output parser
//!
//! TLC runs SANY (the TLA+ front end) before model checking and echoes its
//! console output between the SANY start and end messages. The builder
//! captures those lines and hands them to a [`DiagnosticParser`]; this is the
//! default one. It understands:
//!
//! ```text
//! Parsing file /specs/Counter.tla
//! ***Parse Error***
//! Encountered "=" at line 5, column 3 and token "x"
//!
//! *** Errors: 1
//!
//! line 10, col 9 to line 10, col 9 of module Counter
//!
//! Unknown operator: `y'.
//! ```

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tlcmon_core::{Diagnostic, DiagnosticCollection, Severity, SourceRange};

use crate::traits::DiagnosticParser;

static PARSING_FILE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Parsing file (\S+)").expect("Invalid parsing file pattern regex")
});

static LOCATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^line (\d+), col (\d+) to line (\d+), col (\d+) of module (\w+)")
        .expect("Invalid location pattern regex")
});

static PARSE_ERROR_POSITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"at line (\d+), column (\d+)").expect("Invalid parse error position regex")
});

const PARSE_ERROR_MARKER: &str = "***Parse Error***";
const ERRORS_MARKER: &str = "*** Errors:";
const WARNINGS_MARKER: &str = "*** Warnings:";

/// Default [`DiagnosticParser`] for SANY's console output
#[derive(Debug, Clone, Copy, Default)]
pub struct SanyOutputParser;

impl DiagnosticParser for SanyOutputParser {
    fn parse_diagnostics(&self, lines: &[String]) -> Option<DiagnosticCollection> {
        if lines.is_empty() {
            return None;
        }
        Some(parse_sany_output(lines))
    }
}

/// A diagnostic whose message lines are still being collected
struct Pending {
    module: Option<String>,
    range: SourceRange,
    severity: Severity,
    message: Vec<String>,
}

impl Pending {
    fn into_diagnostic(self) -> Diagnostic {
        Diagnostic {
            module: self.module,
            range: self.range,
            severity: self.severity,
            message: self.message.join("\n"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Listing(Severity),
}

pub fn parse_sany_output(lines: &[String]) -> DiagnosticCollection {
    let mut collection = DiagnosticCollection::new();
    let mut section = Section::Preamble;
    let mut current_module: Option<String> = None;
    let mut pending: Option<Pending> = None;

    for raw in lines {
        let line = raw.trim();

        if line.is_empty() {
            // A blank line ends a message once it has some text
            if pending.as_ref().is_some_and(|p| !p.message.is_empty()) {
                flush(&mut collection, &mut pending);
            }
            continue;
        }

        if let Some(caps) = PARSING_FILE_PATTERN.captures(line) {
            flush(&mut collection, &mut pending);
            let path = caps[1].to_string();
            current_module = module_name(&path);
            collection.add_file(path);
            continue;
        }

        if line.starts_with(ERRORS_MARKER) || line.starts_with(WARNINGS_MARKER) {
            flush(&mut collection, &mut pending);
            section = if line.starts_with(ERRORS_MARKER) {
                Section::Listing(Severity::Error)
            } else {
                Section::Listing(Severity::Warning)
            };
            continue;
        }

        if line.starts_with(PARSE_ERROR_MARKER) {
            flush(&mut collection, &mut pending);
            pending = Some(Pending {
                module: current_module.clone(),
                range: SourceRange::default(),
                severity: Severity::Error,
                message: Vec::new(),
            });
            continue;
        }

        if let (Section::Listing(severity), Some(caps)) = (section, LOCATION_PATTERN.captures(line))
        {
            flush(&mut collection, &mut pending);
            let num = |i: usize| -> u32 { caps[i].parse().unwrap_or(0) };
            pending = Some(Pending {
                module: Some(caps[5].to_string()),
                range: SourceRange::new(num(1), num(2), num(3), num(4)),
                severity,
                message: Vec::new(),
            });
            continue;
        }

        if let Some(p) = pending.as_mut() {
            if p.range.is_empty() {
                if let Some(caps) = PARSE_ERROR_POSITION.captures(line) {
                    let line_no: u32 = caps[1].parse().unwrap_or(0);
                    let col: u32 = caps[2].parse().unwrap_or(0);
                    p.range = SourceRange::new(line_no, col, line_no, col);
                }
            }
            p.message.push(line.to_string());
        }
    }

    flush(&mut collection, &mut pending);
    collection
}

fn flush(collection: &mut DiagnosticCollection, pending: &mut Option<Pending>) {
    if let Some(p) = pending.take() {
        collection.add(p.into_diagnostic());
    }
}

/// `/specs/Counter.tla` -> `Counter`
fn module_name(path: &str) -> Option<String> {
    Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
}
