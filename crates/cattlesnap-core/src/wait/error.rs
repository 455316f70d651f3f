//! Error types for polling

use std::error::Error;
use std::fmt;
use std::time::Duration;

/// Errors that end a wait without the condition holding
///
/// Generic over `E`, the error type returned by the condition.
#[derive(Debug)]
pub enum PollError<E> {
    /// The deadline passed before the condition held
    Timeout {
        /// Number of checks that completed
        attempts: u32,
        /// The deadline that was exceeded
        timeout: Duration,
    },

    /// The condition itself failed
    Condition {
        /// The check that failed (1-indexed)
        attempt: u32,
        /// The error returned by the condition
        source: E,
    },
}

impl<E: fmt::Display> fmt::Display for PollError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollError::Timeout { attempts, timeout } => write!(
                f,
                "timed out after {:.1}s waiting for condition ({} checks)",
                timeout.as_secs_f64(),
                attempts
            ),
            PollError::Condition { attempt, source } => {
                write!(f, "condition failed on check {}: {}", attempt, source)
            }
        }
    }
}

impl<E: Error + 'static> Error for PollError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PollError::Condition { source, .. } => Some(source),
            PollError::Timeout { .. } => None,
        }
    }
}

impl<E> PollError<E> {
    pub fn timeout(attempts: u32, timeout: Duration) -> Self {
        PollError::Timeout { attempts, timeout }
    }

    pub fn condition(attempt: u32, source: E) -> Self {
        PollError::Condition { attempt, source }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, PollError::Timeout { .. })
    }

    /// Number of checks made before the wait ended
    pub fn attempts(&self) -> u32 {
        match self {
            PollError::Timeout { attempts, .. } => *attempts,
            PollError::Condition { attempt, .. } => *attempt,
        }
    }

    /// Consume the error and return the condition error, if any
    pub fn into_source(self) -> Option<E> {
        match self {
            PollError::Condition { source, .. } => Some(source),
            PollError::Timeout { .. } => None,
        }
    }
}
