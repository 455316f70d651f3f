//! Error types for snapshot operations

use cattlesnap_core::wait::PollError;
use thiserror::Error;

/// Result type alias using SnapshotError
pub type Result<T> = std::result::Result<T, SnapshotError>;

#[derive(Error, Debug)]
pub enum SnapshotError {
    /// A lookup or mutating API call failed
    #[error(transparent)]
    Client(#[from] cattlesnap_client::Error),

    /// Waiting for the cluster or snapshots to settle failed
    #[error("{operation}: {source}")]
    Wait {
        operation: String,
        #[source]
        source: PollError<cattlesnap_client::Error>,
    },

    /// Restore requested on a provisioning cluster without an RKE config
    #[error("Cluster '{cluster}' has no rkeConfig; it is not an RKE2/K3s cluster")]
    MissingRkeConfig { cluster: String },

    /// The management cluster's driver maps to neither flavor
    #[error("Cannot determine snapshot flavor of cluster '{cluster}' (driver: {driver})")]
    UnknownFlavor { cluster: String, driver: String },
}

impl SnapshotError {
    pub fn wait(
        operation: impl Into<String>,
        source: PollError<cattlesnap_client::Error>,
    ) -> Self {
        Self::Wait {
            operation: operation.into(),
            source,
        }
    }

    /// Whether the error is a wait that ran out of time
    pub fn is_timeout(&self) -> bool {
        matches!(self, SnapshotError::Wait { source, .. } if source.is_timeout())
    }
}
