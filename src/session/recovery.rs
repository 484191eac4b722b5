//! Error recovery timer.
//!
//! Every reported error gets a fresh [`ErrorGeneration`]. The timer armed
//! for it carries that generation back when it fires, and the calculator
//! only clears if the active error still has the same generation. Timers
//! are never cancelled; stale ones are ignored when they fire.

use std::time::Duration;

use tokio::runtime::Handle;

use super::Event;

/// Identity of one error occurrence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ErrorGeneration(u64);

impl ErrorGeneration {
    /// The generation following this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Schedules a one-shot recovery for an error.
pub trait RecoveryTimer {
    /// Arrange for `Calculator::on_recovery_timeout(generation)` to run after `delay`.
    fn arm(&mut self, generation: ErrorGeneration, delay: Duration);
}

/// Timer backed by tokio tasks that report back over the event channel.
pub struct TokioRecoveryTimer {
    events: flume::Sender<Event>,
    handle: Handle,
}

impl TokioRecoveryTimer {
    /// Create a timer on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn new(events: flume::Sender<Event>) -> Self {
        Self {
            events,
            handle: Handle::current(),
        }
    }
}

impl RecoveryTimer for TokioRecoveryTimer {
    fn arm(&mut self, generation: ErrorGeneration, delay: Duration) {
        let events = self.events.clone();
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if events
                .send_async(Event::ErrorTimeout(generation))
                .await
                .is_err()
            {
                tracing::debug!(
                    generation = generation.get(),
                    "event loop gone, dropping recovery timeout"
                );
            }
        });
    }
}

/// Timer that only records what was armed. Firing is left to the caller.
#[derive(Clone, Debug, Default)]
pub struct ManualRecoveryTimer {
    armed: Vec<(ErrorGeneration, Duration)>,
}

impl ManualRecoveryTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timers armed so far, oldest first.
    pub fn armed(&self) -> &[(ErrorGeneration, Duration)] {
        &self.armed
    }

    /// Generation of the most recently armed timer.
    pub fn last_generation(&self) -> Option<ErrorGeneration> {
        self.armed.last().map(|(generation, _)| *generation)
    }

    /// Remove and return every armed timer.
    pub fn take_armed(&mut self) -> Vec<(ErrorGeneration, Duration)> {
        std::mem::take(&mut self.armed)
    }
}

impl RecoveryTimer for ManualRecoveryTimer {
    fn arm(&mut self, generation: ErrorGeneration, delay: Duration) {
        self.armed.push((generation, delay));
    }
}
