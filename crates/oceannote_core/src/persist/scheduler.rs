//! Single-slot write timer.
//!
//! # Responsibility
//! - Hold at most one pending deadline for the coordinator's write.
//! - Report when that deadline has passed so the host loop can fire it.
//!
//! # Invariants
//! - `schedule` replaces the pending deadline; it never adds a second one.
//! - `take_due` returns `true` at most once per armed deadline.

use crate::clock::Clock;
use std::time::Duration;

/// Restartable one-shot timer for a single deferred action.
///
/// The action itself belongs to the owner; the scheduler only decides when
/// it is due.
pub trait Scheduler {
    /// Arms the timer `delay` from now, replacing any pending deadline.
    fn schedule(&mut self, delay: Duration);
    /// Disarms the timer. Returns whether something was pending.
    fn cancel(&mut self) -> bool;
    fn is_pending(&self) -> bool;
    /// Time left before the pending deadline, `None` when idle.
    fn remaining(&self) -> Option<Duration>;
    /// Disarms and returns `true` if the pending deadline has been reached.
    fn take_due(&mut self) -> bool;
}

/// Scheduler measuring deadlines against an injected clock.
#[derive(Debug, Clone)]
pub struct ClockScheduler<C: Clock> {
    clock: C,
    deadline: Option<i64>,
}

impl<C: Clock> ClockScheduler<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            deadline: None,
        }
    }

    /// Pending deadline in clock milliseconds.
    pub fn deadline(&self) -> Option<i64> {
        self.deadline
    }
}

impl<C: Clock> Scheduler for ClockScheduler<C> {
    fn schedule(&mut self, delay: Duration) {
        let delay_ms = i64::try_from(delay.as_millis()).unwrap_or(i64::MAX);
        self.deadline = Some(self.clock.now_millis().saturating_add(delay_ms));
    }

    fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    fn remaining(&self) -> Option<Duration> {
        let deadline = self.deadline?;
        let left = deadline.saturating_sub(self.clock.now_millis()).max(0);
        Some(Duration::from_millis(left.unsigned_abs()))
    }

    fn take_due(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if self.clock.now_millis() >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
