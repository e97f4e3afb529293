//! Per-decision search limits: iteration count, wall clock, cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared cancellation flag.
///
/// Clones observe the same flag, so a driver can hand one clone to a search
/// and cancel it from another thread.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Limits for one search invocation.
///
/// Searches check the budget between iterations; an iteration in progress
/// always completes.
#[derive(Clone, Debug)]
pub struct SearchBudget {
    iterations: u32,
    time_limit: Option<Duration>,
    cancel: Option<CancelToken>,
}

impl SearchBudget {
    /// Budget of a fixed number of iterations.
    pub fn iterations(iterations: u32) -> Self {
        Self {
            iterations,
            time_limit: None,
            cancel: None,
        }
    }

    /// Also stop once `limit` has elapsed.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Also stop once `token` is cancelled.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Iteration cap.
    #[must_use]
    pub fn max_iterations(&self) -> u32 {
        self.iterations
    }

    /// Whether iteration number `done` (0-based) may start.
    #[must_use]
    pub fn allows(&self, done: u32, started: Instant) -> bool {
        if done >= self.iterations {
            return false;
        }
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return false;
        }
        match self.time_limit {
            Some(limit) => started.elapsed() < limit,
            None => true,
        }
    }
}
