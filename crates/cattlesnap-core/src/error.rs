//! Error types for cattlesnap-core

use thiserror::Error;

/// Result type alias using cattlesnap-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for cattlesnap
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// No configuration path was given and the environment does not name one
    #[error("No configuration file given. Pass --config or set {var}")]
    ConfigPathUnset { var: String },

    /// Invalid configuration contents
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create a config path unset error
    pub fn config_path_unset(var: impl Into<String>) -> Self {
        Self::ConfigPathUnset { var: var.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
