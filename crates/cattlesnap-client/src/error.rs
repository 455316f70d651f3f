//! Error types for the Rancher API client

use serde::Deserialize;
use thiserror::Error;

/// Result type alias using the client's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the Rancher API client
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level failure (connect, TLS, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{method} {url} returned {status}: {message}")]
    Api {
        method: String,
        url: String,
        status: u16,
        message: String,
    },

    /// A lookup by name found nothing
    #[error("{kind} '{name}' not found")]
    NotFound { kind: String, name: String },

    /// Response or object body could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A request URL could not be built
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The admin token cannot be sent as a header
    #[error("Invalid API token: {0}")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),

    /// Connection settings were rejected
    #[error(transparent)]
    Config(#[from] cattlesnap_core::Error),
}

impl Error {
    pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Build an API error from a failed response body
    ///
    /// Rancher error bodies carry a `message`; anything else is passed
    /// through verbatim.
    pub fn api(method: &str, url: &str, status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ApiErrorBody>(body)
            .ok()
            .and_then(|b| b.message.filter(|m| !m.is_empty()))
            .unwrap_or_else(|| {
                if body.is_empty() {
                    "(no response body)".to_string()
                } else {
                    body.to_string()
                }
            });

        Self::Api {
            method: method.to_string(),
            url: url.to_string(),
            status,
            message,
        }
    }

    /// Whether the error means the resource does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound { .. } => true,
            Error::Api { status, .. } => *status == 404,
            _ => false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_uses_rancher_message() {
        let body = r#"{"type":"error","status":"404","code":"NotFound","message":"clusters.management.cattle.io \"c-x\" not found"}"#;
        let err = Error::api("GET", "https://r/v3/clusters/c-x", 404, body);
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "GET https://r/v3/clusters/c-x returned 404: clusters.management.cattle.io \"c-x\" not found"
        );
    }

    #[test]
    fn test_api_error_plain_body() {
        let err = Error::api("PUT", "https://r/v1/x", 409, "conflict");
        assert!(!err.is_not_found());
        assert!(err.to_string().ends_with("409: conflict"));

        let err = Error::api("GET", "https://r/v1/x", 500, "");
        assert!(err.to_string().ends_with("(no response body)"));
    }

    #[test]
    fn test_not_found() {
        let err = Error::not_found("cluster", "downstream");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "cluster 'downstream' not found");
    }
}
