//! Timer semantics for autosave debounce and readiness polling.
//!
//! The core never owns a clock or an event loop; the host drives these
//! state machines with its own notion of "now". That keeps the logic
//! deterministic and testable without a runtime.
//!
//! # Invariants
//! - A quiescence timer holds at most one pending deadline; each event
//!   replaces it.
//! - A retry poller stops on first success or when the attempt budget is
//!   exhausted, whichever comes first.

use std::time::{Duration, Instant};

/// Autosave debounce window: persistence waits this long after the last
/// keystroke.
pub const AUTOSAVE_QUIESCENCE: Duration = Duration::from_millis(400);

/// Readiness poll defaults: how often and how many times to re-check for
/// late-rendering host content.
pub const READINESS_POLL_INTERVAL: Duration = Duration::from_millis(300);
pub const READINESS_POLL_MAX_ATTEMPTS: u32 = 5;

/// Reset-on-event, fire-after-quiescence timer.
#[derive(Debug)]
pub struct QuiescenceTimer {
    window: Duration,
    deadline: Option<Instant>,
}

impl QuiescenceTimer {
    pub fn new(window: Duration) -> Self {
        Self { window, deadline: None }
    }

    /// Records an event (e.g. a keystroke), replacing any pending deadline.
    pub fn record_event(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Reports whether the quiescence window has elapsed, clearing the
    /// pending deadline when it has. At most one fire per recorded burst.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Drops any pending deadline without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

/// Outcome of a readiness poll attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDecision {
    /// Content not found yet; re-check at the given instant.
    Continue(Instant),
    /// Stop polling: content was found, or the budget ran out.
    Stop,
}

/// Bounded-retry fallback for hosts without a content-ready notification.
#[derive(Debug)]
pub struct RetryPoller {
    interval: Duration,
    max_attempts: u32,
    attempts: u32,
}

impl RetryPoller {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self { interval, max_attempts, attempts: 0 }
    }

    /// Records one attempt and decides whether to keep polling.
    pub fn record_attempt(&mut self, now: Instant, found: bool) -> PollDecision {
        self.attempts += 1;
        if found || self.attempts >= self.max_attempts {
            PollDecision::Stop
        } else {
            PollDecision::Continue(now + self.interval)
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

impl Default for RetryPoller {
    fn default() -> Self {
        Self::new(READINESS_POLL_MAX_ATTEMPTS, READINESS_POLL_INTERVAL)
    }
}
