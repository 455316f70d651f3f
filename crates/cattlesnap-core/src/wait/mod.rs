//! Fixed-interval polling
//!
//! Waits for a remote condition by re-checking it on a fixed interval until
//! it holds or a deadline passes.
//!
//! # Features
//!
//! - Optional immediate first check
//! - Deadline covers both the sleeps and an in-flight check
//! - Condition errors abort the wait; callers that want to ride out
//!   transient failures map them to `Ok(false)`
//! - Observable checks via the `PollObserver` trait
//!
//! # Example
//!
//! ```rust,no_run
//! use cattlesnap_core::wait::{poll_until, PollError};
//! use std::time::Duration;
//!
//! async fn example() -> Result<u32, PollError<std::io::Error>> {
//!     poll_until(Duration::from_secs(5), Duration::from_secs(300), || async {
//!         // Check remote state here
//!         Ok(true)
//!     })
//!     .await
//! }
//! ```

mod error;
mod executor;
mod observer;

pub use error::PollError;
pub use executor::{poll_until, Poller, PollerBuilder};
pub use observer::{NoOpObserver, PollObserver, StatsObserver, TracingObserver};

#[cfg(test)]
mod tests;
