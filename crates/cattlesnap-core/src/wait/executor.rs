//! Poll execution
//!
//! Runs a condition on a fixed interval until it holds, fails, or the
//! deadline passes.

use std::error::Error;
use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep_until, timeout_at, Instant};

use crate::config::PollSettings;

use super::error::PollError;
use super::observer::{NoOpObserver, PollObserver};

/// Poll `condition` every `interval` until it returns `Ok(true)` or `timeout`
/// elapses. The first check runs immediately.
///
/// Returns the number of checks made.
pub async fn poll_until<F, Fut, E>(
    interval: Duration,
    timeout: Duration,
    condition: F,
) -> Result<u32, PollError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
    E: Error,
{
    PollerBuilder::new()
        .with_interval(interval)
        .with_timeout(timeout)
        .build()
        .until(condition)
        .await
}

/// Builder for configuring a `Poller`
///
/// # Example
///
/// ```rust
/// use cattlesnap_core::wait::{PollerBuilder, TracingObserver};
/// use std::time::Duration;
///
/// let poller = PollerBuilder::new()
///     .with_interval(Duration::from_secs(5))
///     .with_timeout(Duration::from_secs(300))
///     .with_observer(TracingObserver::new("etcd snapshot"))
///     .build();
/// ```
pub struct PollerBuilder<O = NoOpObserver> {
    interval: Duration,
    timeout: Duration,
    immediate: bool,
    observer: O,
}

impl Default for PollerBuilder<NoOpObserver> {
    fn default() -> Self {
        Self::new()
    }
}

impl PollerBuilder<NoOpObserver> {
    pub fn new() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(60),
            immediate: true,
            observer: NoOpObserver,
        }
    }
}

impl<O> PollerBuilder<O> {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Take interval and timeout from configured settings
    pub fn with_settings(self, settings: &PollSettings) -> Self {
        self.with_interval(settings.interval())
            .with_timeout(settings.timeout())
    }

    /// Run the first check before waiting one interval. Enabled by default.
    pub fn with_immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }

    pub fn with_observer<O2>(self, observer: O2) -> PollerBuilder<O2> {
        PollerBuilder {
            interval: self.interval,
            timeout: self.timeout,
            immediate: self.immediate,
            observer,
        }
    }

    pub fn build(self) -> Poller<O> {
        Poller {
            interval: self.interval,
            timeout: self.timeout,
            immediate: self.immediate,
            observer: self.observer,
        }
    }
}

/// A fixed-interval poller
///
/// Use `PollerBuilder` to create an instance.
pub struct Poller<O> {
    interval: Duration,
    timeout: Duration,
    immediate: bool,
    observer: O,
}

impl<O> Poller<O>
where
    O: PollObserver,
{
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Wait until `condition` returns `Ok(true)`
    ///
    /// `Ok(false)` schedules another check after one interval. An `Err`
    /// aborts the wait immediately.
    pub async fn until<F, Fut, E>(&self, mut condition: F) -> Result<u32, PollError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool, E>>,
        E: Error,
    {
        let start = Instant::now();
        let deadline = start + self.timeout;
        let mut attempts = 0;

        if !self.immediate {
            sleep_until((start + self.interval).min(deadline)).await;
        }

        loop {
            if Instant::now() >= deadline {
                return Err(self.timed_out(attempts));
            }

            attempts += 1;
            self.observer.on_check(attempts);

            match timeout_at(deadline, condition()).await {
                Err(_) => return Err(self.timed_out(attempts - 1)),
                Ok(Ok(true)) => {
                    self.observer.on_satisfied(attempts, start.elapsed());
                    return Ok(attempts);
                }
                Ok(Ok(false)) => {
                    self.observer.on_pending(attempts, start.elapsed());
                }
                Ok(Err(err)) => {
                    self.observer.on_condition_error(attempts, &err);
                    return Err(PollError::condition(attempts, err));
                }
            }

            sleep_until((Instant::now() + self.interval).min(deadline)).await;
        }
    }

    fn timed_out<E>(&self, attempts: u32) -> PollError<E> {
        self.observer.on_timeout(attempts, self.timeout);
        PollError::timeout(attempts, self.timeout)
    }
}
