//! Debounce utility
//!
//! Holds at most one pending value. Scheduling replaces the pending value and
//! pushes its deadline out; polling hands the value back once the deadline has
//! passed. Callers drive it with their own clock so it can sit inside a
//! frame-tick loop.

use std::time::{Duration, Instant};

/// Cancel-and-reschedule holder for a single pending value
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    deadline: Instant,
    value: T,
}

impl<T> Debouncer<T> {
    /// Create a debouncer that fires `delay` after the last schedule
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Configured delay
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending value and restart the delay from `now`
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            deadline: now + self.delay,
            value,
        });
    }

    /// Drop the pending value, if any
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    /// Whether a value is waiting to fire
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value will fire
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Take the pending value if its deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self.pending.as_ref().is_some_and(|p| now >= p.deadline);
        if due {
            self.pending.take().map(|p| p.value)
        } else {
            None
        }
    }
}
