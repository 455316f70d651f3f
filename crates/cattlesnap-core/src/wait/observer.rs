//! Poll observation and logging
//!
//! This module provides the `PollObserver` trait for monitoring waits and a
//! `TracingObserver` implementation that logs using the `tracing` crate.

use std::error::Error;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Observer trait for poll events
pub trait PollObserver: Send + Sync {
    /// Called before each check (1-indexed)
    fn on_check(&self, attempt: u32);

    /// Called when a check finds the condition not yet satisfied
    fn on_pending(&self, attempt: u32, elapsed: Duration);

    /// Called when the condition holds
    fn on_satisfied(&self, attempt: u32, elapsed: Duration);

    /// Called when the deadline passes
    fn on_timeout(&self, attempts: u32, timeout: Duration);

    /// Called when the condition returns an error and the wait is aborted
    fn on_condition_error(&self, attempt: u32, error: &dyn Error) {
        let _ = (attempt, error);
    }
}

/// An observer that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl PollObserver for NoOpObserver {
    fn on_check(&self, _attempt: u32) {}

    fn on_pending(&self, _attempt: u32, _elapsed: Duration) {}

    fn on_satisfied(&self, _attempt: u32, _elapsed: Duration) {}

    fn on_timeout(&self, _attempts: u32, _timeout: Duration) {}
}

/// An observer that logs poll events using the `tracing` crate
///
/// # Log Levels
///
/// - `on_check`, `on_pending`: TRACE / DEBUG
/// - `on_satisfied`: DEBUG
/// - `on_timeout`, `on_condition_error`: WARN
#[derive(Debug, Clone)]
pub struct TracingObserver {
    /// What is being waited for (for log context)
    operation: String,
}

impl TracingObserver {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new("wait")
    }
}

impl PollObserver for TracingObserver {
    fn on_check(&self, attempt: u32) {
        tracing::trace!(operation = %self.operation, attempt = attempt, "checking condition");
    }

    fn on_pending(&self, attempt: u32, elapsed: Duration) {
        tracing::debug!(
            operation = %self.operation,
            attempt = attempt,
            elapsed_ms = elapsed.as_millis() as u64,
            "condition not met yet"
        );
    }

    fn on_satisfied(&self, attempt: u32, elapsed: Duration) {
        tracing::debug!(
            operation = %self.operation,
            attempt = attempt,
            elapsed_ms = elapsed.as_millis() as u64,
            "condition met"
        );
    }

    fn on_timeout(&self, attempts: u32, timeout: Duration) {
        tracing::warn!(
            operation = %self.operation,
            attempts = attempts,
            timeout_ms = timeout.as_millis() as u64,
            "timed out waiting for condition"
        );
    }

    fn on_condition_error(&self, attempt: u32, error: &dyn Error) {
        tracing::warn!(
            operation = %self.operation,
            attempt = attempt,
            error = %error,
            "condition check failed, giving up"
        );
    }
}

/// An observer that counts poll events
///
/// Useful for testing.
#[derive(Debug, Default)]
pub struct StatsObserver {
    pub checks: AtomicU32,
    pub pending: AtomicU32,
    pub satisfied: AtomicU32,
    pub timeouts: AtomicU32,
    pub condition_errors: AtomicU32,
}

impl StatsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn checks(&self) -> u32 {
        self.checks.load(Ordering::SeqCst)
    }

    pub fn pending(&self) -> u32 {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn satisfied(&self) -> u32 {
        self.satisfied.load(Ordering::SeqCst)
    }

    pub fn timeouts(&self) -> u32 {
        self.timeouts.load(Ordering::SeqCst)
    }

    pub fn condition_errors(&self) -> u32 {
        self.condition_errors.load(Ordering::SeqCst)
    }
}

impl PollObserver for StatsObserver {
    fn on_check(&self, _attempt: u32) {
        self.checks.fetch_add(1, Ordering::SeqCst);
    }

    fn on_pending(&self, _attempt: u32, _elapsed: Duration) {
        self.pending.fetch_add(1, Ordering::SeqCst);
    }

    fn on_satisfied(&self, _attempt: u32, _elapsed: Duration) {
        self.satisfied.fetch_add(1, Ordering::SeqCst);
    }

    fn on_timeout(&self, _attempts: u32, _timeout: Duration) {
        self.timeouts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_condition_error(&self, _attempt: u32, _error: &dyn Error) {
        self.condition_errors.fetch_add(1, Ordering::SeqCst);
    }
}

impl<T: PollObserver + ?Sized> PollObserver for std::sync::Arc<T> {
    fn on_check(&self, attempt: u32) {
        (**self).on_check(attempt)
    }

    fn on_pending(&self, attempt: u32, elapsed: Duration) {
        (**self).on_pending(attempt, elapsed)
    }

    fn on_satisfied(&self, attempt: u32, elapsed: Duration) {
        (**self).on_satisfied(attempt, elapsed)
    }

    fn on_timeout(&self, attempts: u32, timeout: Duration) {
        (**self).on_timeout(attempts, timeout)
    }

    fn on_condition_error(&self, attempt: u32, error: &dyn Error) {
        (**self).on_condition_error(attempt, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Arc;

    #[test]
    fn test_stats_observer_counts() {
        let observer = StatsObserver::new();
        let error = io::Error::other("test");

        observer.on_check(1);
        observer.on_pending(1, Duration::from_millis(10));
        observer.on_check(2);
        observer.on_condition_error(2, &error);

        assert_eq!(observer.checks(), 2);
        assert_eq!(observer.pending(), 1);
        assert_eq!(observer.condition_errors(), 1);
        assert_eq!(observer.satisfied(), 0);
        assert_eq!(observer.timeouts(), 0);
    }

    #[test]
    fn test_tracing_observer_operation() {
        assert_eq!(TracingObserver::new("etcd restore").operation(), "etcd restore");
        assert_eq!(TracingObserver::default().operation(), "wait");
    }

    #[test]
    fn test_arc_observer() {
        let observer = Arc::new(StatsObserver::new());
        let shared = observer.clone();

        shared.on_check(1);
        shared.on_satisfied(1, Duration::ZERO);

        assert_eq!(observer.checks(), 1);
        assert_eq!(observer.satisfied(), 1);
    }
}
