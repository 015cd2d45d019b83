//! Sub-grammars for the bodies of finished TLC messages
//!
//! Each function takes the lines of one message and returns the structured
//! fact it carries, or `None` when the expected line is missing or does not
//! match. A mismatch is never an error: TLC output is parsed best-effort.
//!
//! Some messages carry a preamble before the data line, so the line index is
//! always passed explicitly to [`match_line`].

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::{Captures, Regex};
use tlcmon_core::{CoverageItem, ErrorTraceItem, SourceRange, StatRow, VariableValue};

use crate::time::{elapsed_label, parse_date_time};
use crate::traits::ValueParser;

static STARTING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Starting\.\.\. \((\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})\)$")
        .expect("Invalid starting pattern regex")
});

static FINISHED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Finished in (\d+)ms at \((\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})\)$")
        .expect("Invalid finished pattern regex")
});

static SUCCESS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"calculated \(optimistic\):\s+val = (.+)$").expect("Invalid success pattern regex")
});

static INIT_GENERATED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^Finished computing initial states: ([\d,]+) distinct states? generated at (\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}).*$",
    )
    .expect("Invalid initial states pattern regex")
});

static PROGRESS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^Progress\(([\d,]+)\) at (\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}): ([\d,]+) states generated.*, ([\d,]+) distinct states found.*, ([\d,]+) states left on queue.*",
    )
    .expect("Invalid progress pattern regex")
});

static COVERAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^<(\w+) line (\d+), col (\d+) to line (\d+), col (\d+) of module (\w+)>: (\d+):(\d+)",
    )
    .expect("Invalid coverage pattern regex")
});

static SPECIAL_STEP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+): <([\w\s]+)>$").expect("Invalid special step pattern regex")
});

static ACTION_STEP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d+): <(\w+) line (\d+), col (\d+) to line (\d+), col (\d+) of module (\w+)>$",
    )
    .expect("Invalid action step pattern regex")
});

static VARIABLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/\\ (\w+) = (.+)$").expect("Invalid variable pattern regex")
});

/// TLC drops the `/\ ` when a state has a single variable
static SINGLE_VARIABLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+) = (.+)$").expect("Invalid single variable pattern regex")
});

/// Prefix of an assignment line inside a state print
const ASSIGNMENT_PREFIX: &str = "/\\ ";

// ─────────────────────────────────────────────────────────────────────────────
// Parsed Facts
// ─────────────────────────────────────────────────────────────────────────────

/// `Finished in Nms at (...)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedInfo {
    pub duration_ms: u64,
    pub at: NaiveDateTime,
}

/// `Finished computing initial states: N distinct states generated at ...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialStates {
    pub count: u64,
    pub at: NaiveDateTime,
}

impl InitialStates {
    /// The first statistics row: elapsed zero, count in every counter
    pub fn to_stat_row(&self) -> StatRow {
        StatRow::new("00:00:00", 0, self.count, self.count, self.count)
    }
}

/// `Progress(D) at ...: T states generated ..., N distinct states found ..., Q states left on queue`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub at: NaiveDateTime,
    pub diameter: u64,
    pub total: u64,
    pub distinct: u64,
    pub queue_size: u64,
}

impl Progress {
    /// Statistics row with the time elapsed since `base`
    pub fn to_stat_row(&self, base: Option<NaiveDateTime>) -> StatRow {
        StatRow::new(
            elapsed_label(base, self.at),
            self.diameter,
            self.total,
            self.distinct,
            self.queue_size,
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Match the line at `index` against `pattern`
pub fn match_line<'a>(lines: &'a [String], pattern: &Regex, index: usize) -> Option<Captures<'a>> {
    lines.get(index).and_then(|line| pattern.captures(line))
}

/// Parse `12,345` style numbers
pub fn parse_int_with_commas(s: &str) -> Option<u64> {
    s.replace(',', "").parse().ok()
}

fn cap_num<T: std::str::FromStr>(caps: &Captures<'_>, i: usize) -> Option<T> {
    caps.get(i)?.as_str().parse().ok()
}

fn cap_grouped(caps: &Captures<'_>, i: usize) -> Option<u64> {
    parse_int_with_commas(caps.get(i)?.as_str())
}

fn cap_range(caps: &Captures<'_>, first: usize) -> Option<SourceRange> {
    Some(SourceRange::new(
        cap_num(caps, first)?,
        cap_num(caps, first + 1)?,
        cap_num(caps, first + 2)?,
        cap_num(caps, first + 3)?,
    ))
}

// ─────────────────────────────────────────────────────────────────────────────
// Sub-grammars
// ─────────────────────────────────────────────────────────────────────────────

/// `Starting... (2024-01-01 10:00:00)`
pub fn parse_starting(lines: &[String]) -> Option<NaiveDateTime> {
    let caps = match_line(lines, &STARTING_PATTERN, 0)?;
    parse_date_time(&caps[1])
}

/// `Finished in 1234ms at (2024-01-01 10:00:01)`
pub fn parse_finished(lines: &[String]) -> Option<FinishedInfo> {
    let caps = match_line(lines, &FINISHED_PATTERN, 0)?;
    Some(FinishedInfo {
        duration_ms: cap_num(&caps, 1)?,
        at: parse_date_time(&caps[2])?,
    })
}

/// Fingerprint collision probability from the success message
///
/// The probability is on the fourth line, after the "no error has been
/// found" preamble.
pub fn parse_success(lines: &[String]) -> Option<String> {
    let caps = match_line(lines, &SUCCESS_PATTERN, 3)?;
    Some(caps[1].trim().to_string())
}

pub fn parse_initial_states(lines: &[String]) -> Option<InitialStates> {
    let caps = match_line(lines, &INIT_GENERATED_PATTERN, 0)?;
    Some(InitialStates {
        count: cap_grouped(&caps, 1)?,
        at: parse_date_time(&caps[2])?,
    })
}

pub fn parse_progress(lines: &[String]) -> Option<Progress> {
    let caps = match_line(lines, &PROGRESS_PATTERN, 0)?;
    Some(Progress {
        at: parse_date_time(&caps[2])?,
        diameter: cap_grouped(&caps, 1)?,
        total: cap_grouped(&caps, 3)?,
        distinct: cap_grouped(&caps, 4)?,
        queue_size: cap_grouped(&caps, 5)?,
    })
}

/// `<Next line 10, col 3 to line 12, col 20 of module Spec>: 42:17`, one row per matching line
pub fn parse_coverage(lines: &[String]) -> Vec<CoverageItem> {
    lines
        .iter()
        .filter_map(|line| {
            let caps = COVERAGE_PATTERN.captures(line)?;
            Some(CoverageItem {
                module: caps[6].to_string(),
                action: caps[1].to_string(),
                range: cap_range(&caps, 2)?,
                total: cap_num(&caps, 7)?,
                distinct: cap_num(&caps, 8)?,
            })
        })
        .collect()
}

/// One state of an error trace
///
/// Special steps (`1: <Initial predicate>`, `3: <Stuttering>`) have no
/// location; ordinary steps name the action, its range and its module.
pub fn parse_trace_item(lines: &[String], values: &dyn ValueParser) -> Option<ErrorTraceItem> {
    if let Some(caps) = match_line(lines, &SPECIAL_STEP_PATTERN, 0) {
        return Some(ErrorTraceItem {
            num: cap_num(&caps, 1)?,
            title: caps[2].to_string(),
            module: None,
            action: None,
            range: SourceRange::default(),
            variables: parse_trace_variables(lines, values),
        });
    }

    let caps = match_line(lines, &ACTION_STEP_PATTERN, 0)?;
    let action = caps[2].to_string();
    let module = caps[7].to_string();
    Some(ErrorTraceItem {
        num: cap_num(&caps, 1)?,
        title: format!("{} in {}", action, module),
        module: Some(module),
        action: Some(action),
        range: cap_range(&caps, 3)?,
        variables: parse_trace_variables(lines, values),
    })
}

/// Variable assignments following a state header
///
/// A value continues on the following lines until the next `/\ ` line;
/// continuation lines are trimmed before parsing.
pub fn parse_trace_variables(lines: &[String], values: &dyn ValueParser) -> Vec<VariableValue> {
    let mut variables = Vec::new();
    let mut i = 1;
    while i < lines.len() {
        let Some(caps) = VARIABLE_PATTERN.captures(&lines[i]) else {
            i += 1;
            continue;
        };
        let (value_lines, next) = collect_value_lines(lines, &caps[2], i + 1);
        variables.push(VariableValue::new(&caps[1], values.parse_value(&value_lines)));
        i = next;
    }

    if variables.is_empty() {
        if let Some(caps) = match_line(lines, &SINGLE_VARIABLE_PATTERN, 1) {
            let (value_lines, _) = collect_value_lines(lines, &caps[2], 2);
            variables.push(VariableValue::new(&caps[1], values.parse_value(&value_lines)));
        }
    }

    variables
}

/// Returns the value lines and the index of the first line after them
fn collect_value_lines(lines: &[String], first: &str, from: usize) -> (Vec<String>, usize) {
    let mut value_lines = vec![first.to_string()];
    let mut i = from;
    while i < lines.len() && !lines[i].starts_with(ASSIGNMENT_PREFIX) {
        value_lines.push(lines[i].trim().to_string());
        i += 1;
    }
    (value_lines, i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockValueParser;
    use tlcmon_core::Value;

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| s.to_string()).collect()
    }

    /// Value parser that records the joined text as a raw value
    fn raw_values() -> MockValueParser {
        let mut mock = MockValueParser::new();
        mock.expect_parse_value()
            .returning(|l: &[String]| Value::Raw(l.join("|")));
        mock
    }

    #[test]
    fn test_parse_int_with_commas() {
        assert_eq!(parse_int_with_commas("12,345"), Some(12345));
        assert_eq!(parse_int_with_commas("7"), Some(7));
        assert_eq!(parse_int_with_commas("1,000,000"), Some(1_000_000));
        assert_eq!(parse_int_with_commas(""), None);
    }

    #[test]
    fn test_match_line_out_of_range() {
        let l = lines(&["only one"]);
        assert!(match_line(&l, &SUCCESS_PATTERN, 3).is_none());
    }

    #[test]
    fn test_parse_starting() {
        let t = parse_starting(&lines(&["Starting... (2024-01-01 10:00:00)"])).unwrap();
        assert_eq!(t.to_string(), "2024-01-01 10:00:00");
        assert!(parse_starting(&lines(&["Starting..."])).is_none());
        assert!(parse_starting(&[]).is_none());
    }

    #[test]
    fn test_parse_finished() {
        let info =
            parse_finished(&lines(&["Finished in 2345ms at (2024-01-01 10:00:03)"])).unwrap();
        assert_eq!(info.duration_ms, 2345);
        assert_eq!(info.at.to_string(), "2024-01-01 10:00:03");
    }

    #[test]
    fn test_parse_success_reads_fourth_line() {
        let l = lines(&[
            "Model checking completed. No error has been found.",
            "  Estimates of the probability that TLC did not check all reachable states",
            "  because two distinct states had the same fingerprint:",
            "  calculated (optimistic):  val = 5.4E-15",
        ]);
        assert_eq!(parse_success(&l), Some("5.4E-15".to_string()));
        assert_eq!(parse_success(&l[..3]), None);
    }

    #[test]
    fn test_parse_initial_states() {
        let l = lines(&[
            "Finished computing initial states: 3 distinct states generated at 2024-01-01 10:00:00.",
        ]);
        let init = parse_initial_states(&l).unwrap();
        assert_eq!(init.count, 3);
        assert_eq!(init.to_stat_row(), StatRow::new("00:00:00", 0, 3, 3, 3));
    }

    #[test]
    fn test_parse_initial_states_singular() {
        let l = lines(&[
            "Finished computing initial states: 1 distinct state generated at 2024-01-01 10:00:00.",
        ]);
        assert_eq!(parse_initial_states(&l).unwrap().count, 1);
    }

    #[test]
    fn test_parse_progress() {
        let l = lines(&[
            "Progress(5) at 2024-01-01 10:00:05: 100 states generated, 80 distinct states found, 10 states left on queue",
        ]);
        let p = parse_progress(&l).unwrap();
        let base = parse_date_time("2024-01-01 10:00:00");
        assert_eq!(p.to_stat_row(base), StatRow::new("00:00:05", 5, 100, 80, 10));
        assert_eq!(p.to_stat_row(None).time_stamp, "??:??:??");
    }

    #[test]
    fn test_parse_progress_with_rates_and_grouping() {
        let l = lines(&[
            "Progress(12) at 2024-01-01 10:01:00: 1,234,567 states generated (617,283 s/min), 98,765 distinct states found (49,382 ds/min), 4,321 states left on queue.",
        ]);
        let p = parse_progress(&l).unwrap();
        assert_eq!(p.diameter, 12);
        assert_eq!(p.total, 1_234_567);
        assert_eq!(p.distinct, 98_765);
        assert_eq!(p.queue_size, 4_321);
    }

    #[test]
    fn test_parse_progress_mismatch() {
        assert!(parse_progress(&lines(&["Progress: unknown"])).is_none());
    }

    #[test]
    fn test_parse_coverage_rows() {
        let l = lines(&[
            "<Init line 5, col 1 to line 6, col 12 of module Counter>: 1:1",
            "not a coverage line",
            "<Next line 8, col 1 to line 9, col 20 of module Counter>: 42:17",
        ]);
        let rows = parse_coverage(&l);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].action, "Init");
        assert_eq!(rows[0].module, "Counter");
        assert_eq!(rows[1].range, SourceRange::new(8, 1, 9, 20));
        assert_eq!(rows[1].total, 42);
        assert_eq!(rows[1].distinct, 17);
    }

    #[test]
    fn test_parse_special_trace_item() {
        let l = lines(&["1: <Initial predicate>", "/\\ x = 0", "/\\ y = <<>>"]);
        let item = parse_trace_item(&l, &raw_values()).unwrap();
        assert_eq!(item.num, 1);
        assert_eq!(item.title, "Initial predicate");
        assert!(item.module.is_none());
        assert!(item.range.is_empty());
        assert_eq!(item.variables.len(), 2);
        assert_eq!(item.variables[1].name, "y");
        assert_eq!(item.variables[1].value, Value::Raw("<<>>".to_string()));
    }

    #[test]
    fn test_parse_action_trace_item() {
        let l = lines(&[
            "2: <Incr line 10, col 3 to line 12, col 20 of module Counter>",
            "/\\ x = 1",
        ]);
        let item = parse_trace_item(&l, &raw_values()).unwrap();
        assert_eq!(item.num, 2);
        assert_eq!(item.title, "Incr in Counter");
        assert_eq!(item.module.as_deref(), Some("Counter"));
        assert_eq!(item.action.as_deref(), Some("Incr"));
        assert_eq!(item.range, SourceRange::new(10, 3, 12, 20));
    }

    #[test]
    fn test_parse_trace_item_mismatch() {
        assert!(parse_trace_item(&lines(&["State 1"]), &raw_values()).is_none());
        assert!(parse_trace_item(&[], &raw_values()).is_none());
    }

    #[test]
    fn test_multiline_values_are_trimmed_and_joined() {
        let l = lines(&[
            "3: <Stuttering>",
            "/\\ queue = << [id |-> 1],",
            "              [id |-> 2] >>",
            "/\\ x = 2",
        ]);
        let vars = parse_trace_variables(&l, &raw_values());
        assert_eq!(vars.len(), 2);
        assert_eq!(
            vars[0].value,
            Value::Raw("<< [id |-> 1],|[id |-> 2] >>".to_string())
        );
        assert_eq!(vars[1].value, Value::Raw("2".to_string()));
    }

    #[test]
    fn test_single_variable_without_conjunction() {
        let l = lines(&["1: <Initial predicate>", "x = 0"]);
        let vars = parse_trace_variables(&l, &raw_values());
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].name, "x");
        assert_eq!(vars[0].value, Value::Raw("0".to_string()));
    }

    #[test]
    fn test_value_parser_called_once_per_variable() {
        let mut mock = MockValueParser::new();
        mock.expect_parse_value()
            .times(2)
            .returning(|_| Value::Int(0));
        let l = lines(&["1: <Initial predicate>", "/\\ a = 0", "/\\ b = 0"]);
        assert_eq!(parse_trace_variables(&l, &mock).len(), 2);
    }
}
