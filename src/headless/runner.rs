//! Headless mode runner - reads TLC output and reports results

use std::path::{Path, PathBuf};

use tlcmon_app::{read_lines, OutputFormat, Settings, StreamDriver};
use tlcmon_core::prelude::*;
use tlcmon_core::{CheckState, ModelCheckResult};
use tokio::sync::mpsc;

use super::HeadlessEvent;
use crate::report;

/// Capacity of the line channel between reader and driver
const LINE_CHANNEL_CAPACITY: usize = 1024;

/// Model name used when reading from stdin
pub const STDIN_MODEL_NAME: &str = "stdin";

/// What to read and how to report it
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Captured TLC output; stdin when `None`
    pub input: Option<PathBuf>,
    pub model_name: String,
    pub settings: Settings,
}

impl RunOptions {
    pub fn new(input: Option<PathBuf>, settings: Settings) -> Self {
        let model_name = model_name_for(input.as_deref());
        Self {
            input,
            model_name,
            settings,
        }
    }
}

/// `/specs/MC.out` -> `MC`; `stdin` without a path
pub fn model_name_for(path: Option<&Path>) -> String {
    path.and_then(|p| p.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| STDIN_MODEL_NAME.to_string())
}

/// Process exit code for a run outcome
pub fn exit_code(state: CheckState) -> i32 {
    match state {
        CheckState::Success => 0,
        CheckState::Error => 1,
        CheckState::Stopped | CheckState::Running => 2,
    }
}

/// Follow one TLC run to the end of its output
///
/// In JSON mode every snapshot is written as an NDJSON event; in summary
/// mode only the final report is printed. Returns the final snapshot.
pub async fn run_headless(options: RunOptions) -> Result<ModelCheckResult> {
    info!("═══════════════════════════════════════════════════════");
    info!("TLC Monitor following model {}", options.model_name);
    match &options.input {
        Some(path) => info!("Input: {}", path.display()),
        None => info!("Input: stdin"),
    }
    info!("═══════════════════════════════════════════════════════");

    let (tx, rx) = mpsc::channel(LINE_CHANNEL_CAPACITY);

    let reader_task = match &options.input {
        Some(path) => {
            let file = tokio::fs::File::open(path).await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::input_not_found(path)
                } else {
                    Error::from(e)
                }
            })?;
            tokio::spawn(read_lines(file, tx))
        }
        None => tokio::spawn(read_lines(tokio::io::stdin(), tx)),
    };

    let format = options.settings.output.format;
    let driver = StreamDriver::for_model(
        options.model_name,
        &options.settings.updates,
        move |result| {
            if format == OutputFormat::Json {
                HeadlessEvent::snapshot(result).emit();
            }
        },
    );

    let result = driver.run(rx).await;

    match reader_task.await {
        Ok(Ok(count)) => debug!("Read {} line(s) of TLC output", count),
        Ok(Err(e)) => report_error(format, &e),
        Err(e) => {
            let e = Error::stream(format!("reader task failed: {}", e));
            error!("{}", e);
            report_error(format, &e);
        }
    }

    match format {
        OutputFormat::Json => HeadlessEvent::finished(&result).emit(),
        OutputFormat::Summary => print!("{}", report::render(&result)),
    }

    Ok(result)
}

/// Report an error on the channel matching the output format
pub fn report_error(format: OutputFormat, error: &Error) {
    match format {
        OutputFormat::Json => HeadlessEvent::error(error.to_string(), error.is_fatal()).emit(),
        OutputFormat::Summary => eprintln!("Error: {}", error),
    }
}
