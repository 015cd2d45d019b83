//! Update scheduling - coalesces rapid line arrivals into periodic snapshots

use std::time::Duration;

use tokio::time::Instant;

use crate::config::UpdateSettings;

/// Default minimum time between two streamed snapshots
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_millis(500);

/// Whether a snapshot emission is waiting to happen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateState {
    /// Nothing scheduled
    Idle,
    /// A snapshot is due at the given deadline
    Pending(Instant),
}

/// Debounce policy for snapshot emission
///
/// Each processed line calls [`note_change`](Self::note_change). The first
/// change seen after the run has started is due immediately; later ones are
/// due one interval after they are noted. While an emission is pending,
/// further changes are absorbed by it.
#[derive(Debug)]
pub struct UpdateScheduler {
    interval: Duration,
    /// Zero-delay emission for the first started change is still available
    first: bool,
    state: UpdateState,
}

impl Default for UpdateScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_UPDATE_INTERVAL, true)
    }
}

impl UpdateScheduler {
    pub fn new(interval: Duration, emit_first_immediately: bool) -> Self {
        Self {
            interval,
            first: emit_first_immediately,
            state: UpdateState::Idle,
        }
    }

    pub fn from_settings(settings: &UpdateSettings) -> Self {
        Self::new(settings.interval(), settings.emit_first_immediately)
    }

    /// Record that the result may have changed
    ///
    /// `started` tells whether the run has left `NotStarted`. Returns the
    /// deadline of the pending emission.
    pub fn note_change(&mut self, started: bool, now: Instant) -> Instant {
        if let UpdateState::Pending(deadline) = self.state {
            return deadline;
        }

        let delay = if self.first && started {
            self.first = false;
            Duration::ZERO
        } else {
            self.interval
        };

        let deadline = now + delay;
        self.state = UpdateState::Pending(deadline);
        deadline
    }

    /// Clear pending state; called whenever a snapshot is emitted
    pub fn flush_now(&mut self) {
        self.state = UpdateState::Idle;
    }

    pub fn state(&self) -> UpdateState {
        self.state
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            UpdateState::Idle => None,
            UpdateState::Pending(deadline) => Some(deadline),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, UpdateState::Pending(_))
    }

    /// Whether a pending emission is due at `now`
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline().is_some_and(|deadline| now >= deadline)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
