use std::time::{Duration, Instant};

/// One-shot debounce timer polled from the event loop.
///
/// Arming replaces any pending deadline, so at most one firing is ever
/// outstanding. The timer carries a payload delivered when it fires.
#[derive(Debug, Clone)]
pub struct DebounceTimer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> DebounceTimer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Start (or restart) the timer at `now`.
    pub fn arm(&mut self, now: Instant, payload: T) {
        self.pending = Some((now + self.delay, payload));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn payload(&self) -> Option<&T> {
        self.pending.as_ref().map(|(_, payload)| payload)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    /// Disarm and return the payload if the deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.deadline().is_some_and(|deadline| now >= deadline) {
            self.pending.take().map(|(_, payload)| payload)
        } else {
            None
        }
    }
}
