//! Core building blocks for cattlesnap
//!
//! - [`config`]: test configuration (Rancher connection and wait windows)
//! - [`defaults`]: well-known names, intervals and timeouts
//! - [`wait`]: fixed-interval "poll until condition or timeout"
//! - [`error`]: the crate error type

pub mod config;
pub mod defaults;
pub mod error;
pub mod wait;

pub use config::{PollSettings, RancherConfig, SnapshotWaits, TestConfig, CONFIG_ENV_VAR};
pub use error::{Error, Result};
