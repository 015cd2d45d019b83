//! Plain-text summary of a finished TLC run

use std::fmt::Write;

use tlcmon_core::{ModelCheckResult, Severity};

/// Render `result` as a human-readable report
pub fn render(result: &ModelCheckResult) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_report(&mut out, result);
    out
}

fn write_report(out: &mut String, result: &ModelCheckResult) -> std::fmt::Result {
    writeln!(out, "Model:    {}", result.model_name)?;
    writeln!(out, "Status:   {}", result.status)?;
    writeln!(out, "Outcome:  {}", result.state)?;
    if let Some(start) = result.start_date_time {
        writeln!(out, "Started:  {}", start)?;
    }
    if let Some(end) = result.end_date_time {
        match result.duration {
            Some(ms) => writeln!(out, "Finished: {} ({} ms)", end, ms)?,
            None => writeln!(out, "Finished: {}", end)?,
        }
    }
    if result.workers_count > 0 {
        writeln!(out, "Workers:  {}", result.workers_count)?;
    }
    if let Some(info) = &result.process_info {
        writeln!(out, "Mode:     {}", info)?;
    }
    if let Some(probability) = &result.fingerprint_collision_probability {
        writeln!(out, "Fingerprint collision probability: {}", probability)?;
    }

    if let Some(row) = result.last_stat() {
        writeln!(out)?;
        writeln!(
            out,
            "Statistics ({} sample{}):",
            result.stats.len(),
            if result.stats.len() == 1 { "" } else { "s" }
        )?;
        writeln!(
            out,
            "  {:<10} {:>8} {:>14} {:>14} {:>10}",
            "Time", "Diameter", "Found", "Distinct", "Queue"
        )?;
        writeln!(
            out,
            "  {:<10} {:>8} {:>14} {:>14} {:>10}",
            row.time_stamp, row.diameter, row.total, row.distinct, row.queue_size
        )?;
    }

    if !result.coverage.is_empty() {
        writeln!(out)?;
        writeln!(out, "Coverage:")?;
        for item in &result.coverage {
            writeln!(
                out,
                "  {} ({} {}): {} total, {} distinct",
                item.action, item.module, item.range, item.total, item.distinct
            )?;
        }
    }

    if let Some(sany) = result.sany_messages.as_ref().filter(|c| !c.is_empty()) {
        writeln!(out)?;
        writeln!(out, "SANY ({} error(s)):", sany.error_count())?;
        for d in &sany.diagnostics {
            let kind = match d.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            let module = d.module.as_deref().unwrap_or("?");
            writeln!(out, "  {} {} {}: {}", kind, module, d.range, d.message)?;
        }
    }

    for (i, lines) in result.errors.iter().enumerate() {
        writeln!(out)?;
        writeln!(out, "Error {}:", i + 1)?;
        for line in lines {
            writeln!(out, "  {}", line)?;
        }
    }

    if !result.error_trace.is_empty() {
        writeln!(out)?;
        writeln!(out, "Error trace:")?;
        for item in &result.error_trace {
            writeln!(out, "  {}: {}", item.num, item.title)?;
            for var in &item.variables {
                writeln!(out, "      {} = {}", var.name, var.value)?;
            }
        }
    }

    if !result.output_lines.is_empty() {
        writeln!(out)?;
        writeln!(out, "Output:")?;
        for line in &result.output_lines {
            if line.count > 1 {
                writeln!(out, "  {} (x{})", line.text, line.count)?;
            } else {
                writeln!(out, "  {}", line.text)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tlcmon_core::{
        CheckState, CheckStatus, ErrorTraceItem, OutputLine, SourceRange, StatRow, Value,
        VariableValue,
    };

    #[test]
    fn test_minimal_report() {
        let report = render(&ModelCheckResult::empty("MC"));
        assert!(report.contains("Model:    MC"));
        assert!(report.contains("Outcome:  running"));
        assert!(!report.contains("Statistics"));
        assert!(!report.contains("Error trace"));
    }

    #[test]
    fn test_full_report_sections() {
        let mut result = ModelCheckResult::empty("MC");
        result.status = CheckStatus::Finished;
        result.state = CheckState::Error;
        result.stats = vec![
            StatRow::new("00:00:00", 0, 1, 1, 1),
            StatRow::new("00:00:05", 5, 100, 80, 10),
        ];
        result.errors = vec![vec!["Invariant TypeOK is violated.".to_string()]];
        result.error_trace = vec![ErrorTraceItem {
            num: 1,
            title: "Initial predicate".to_string(),
            module: None,
            action: None,
            range: SourceRange::default(),
            variables: vec![VariableValue::new("x", Value::Int(0))],
        }];
        result.output_lines = vec![OutputLine {
            text: "tick".to_string(),
            count: 3,
        }];

        let report = render(&result);

        assert!(report.contains("Statistics (2 samples):"));
        assert!(report.contains("00:00:05"));
        assert!(report.contains("Error 1:\n  Invariant TypeOK is violated."));
        assert!(report.contains("  1: Initial predicate\n      x = 0"));
        assert!(report.contains("tick (x3)"));
    }
}
