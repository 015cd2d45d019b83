//! Streaming driver - feeds TLC output into the result builder and emits
//! debounced snapshots to a consumer

use tlcmon_core::prelude::*;
use tlcmon_core::{CheckStatus, ModelCheckResult, TlcEvent};
use tlcmon_parser::ModelCheckResultBuilder;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

use crate::config::UpdateSettings;
use crate::scheduler::UpdateScheduler;

/// Owns the result builder for one TLC run
///
/// Lines are processed strictly in arrival order. After each line a snapshot
/// emission is scheduled through [`UpdateScheduler`]; when the stream closes,
/// one final snapshot is always emitted.
pub struct StreamDriver<F>
where
    F: FnMut(ModelCheckResult) + Send,
{
    builder: ModelCheckResultBuilder,
    scheduler: UpdateScheduler,
    consumer: F,
    emitted: usize,
}

impl<F> StreamDriver<F>
where
    F: FnMut(ModelCheckResult) + Send,
{
    pub fn new(builder: ModelCheckResultBuilder, scheduler: UpdateScheduler, consumer: F) -> Self {
        Self {
            builder,
            scheduler,
            consumer,
            emitted: 0,
        }
    }

    /// Driver with a fresh builder for `model_name`
    pub fn for_model(model_name: impl Into<String>, settings: &UpdateSettings, consumer: F) -> Self {
        Self::new(
            ModelCheckResultBuilder::new(model_name),
            UpdateScheduler::from_settings(settings),
            consumer,
        )
    }

    /// Number of snapshots handed to the consumer so far
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Process one line and schedule an update
    pub fn handle_line(&mut self, line: &str) {
        self.builder.add_line(line);
        let started = self.builder.status() != CheckStatus::NotStarted;
        self.scheduler.note_change(started, Instant::now());
    }

    /// Emit the current snapshot if the pending update is due
    pub fn poll_update(&mut self) {
        if self.scheduler.is_due(Instant::now()) {
            self.emit();
        }
    }

    /// Finalize the run and emit the last snapshot
    ///
    /// Any pending update is cancelled so it cannot fire after this one.
    pub fn finish(mut self) -> ModelCheckResult {
        self.builder.note_stream_ended();
        if let Some(sany) = self.builder.sany_messages() {
            debug!(
                "SANY reported {} diagnostic(s) for {} file(s)",
                sany.diagnostics.len(),
                sany.files.len()
            );
        }

        let result = self.builder.snapshot();
        self.scheduler.flush_now();
        (self.consumer)(result.clone());
        self.emitted += 1;

        info!(
            "TLC run {} ended: {} / {} after {} update(s)",
            result.model_name, result.status, result.state, self.emitted
        );
        result
    }

    /// Drive the run from `rx` until the stream closes
    ///
    /// A dropped sender counts as a close. Returns the final snapshot.
    pub async fn run(mut self, mut rx: mpsc::Receiver<TlcEvent>) -> ModelCheckResult {
        loop {
            let deadline = self.scheduler.deadline();

            tokio::select! {
                biased;

                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.emit();
                }

                event = rx.recv() => match event {
                    Some(TlcEvent::Line(line)) => self.handle_line(&line),
                    Some(TlcEvent::Closed) => break,
                    None => {
                        warn!("TLC output channel dropped without end-of-stream signal");
                        break;
                    }
                },
            }
        }

        self.finish()
    }

    fn emit(&mut self) {
        self.scheduler.flush_now();
        trace!("Emitting snapshot in status {:?}", self.builder.status());
        (self.consumer)(self.builder.snapshot());
        self.emitted += 1;
    }
}
