//! Flavor-neutral snapshot types

use cattlesnap_client::{EtcdBackup, RestoreRkeConfig, SteveApiObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which API a cluster's snapshots are driven through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterFlavor {
    /// RKE1, via the management API
    Rke1,
    /// RKE2 or K3s, via provisioning cluster directives
    Rke2,
}

impl std::fmt::Display for ClusterFlavor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClusterFlavor::Rke1 => write!(f, "rke1"),
            ClusterFlavor::Rke2 => write!(f, "rke2"),
        }
    }
}

impl std::str::FromStr for ClusterFlavor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rke1" | "rke" => Ok(ClusterFlavor::Rke1),
            "rke2" | "k3s" | "rke2k3s" => Ok(ClusterFlavor::Rke2),
            _ => Err(format!(
                "Unknown cluster flavor: {}. Supported: rke1, rke2, k3s",
                s
            )),
        }
    }
}

/// A snapshot summarized across flavors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotInfo {
    /// ID used to fetch the snapshot
    pub id: String,

    /// Snapshot name; what an RKE2/K3s restore refers to
    pub name: String,

    /// Owning cluster as reported by the snapshot, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,

    pub state: String,
}

impl From<&EtcdBackup> for SnapshotInfo {
    fn from(backup: &EtcdBackup) -> Self {
        Self {
            id: backup.id.clone(),
            name: backup.name.clone(),
            cluster: Some(backup.cluster_id.clone()).filter(|c| !c.is_empty()),
            created: DateTime::parse_from_rfc3339(&backup.created)
                .ok()
                .map(|t| t.with_timezone(&Utc)),
            state: backup.state.clone(),
        }
    }
}

impl From<&SteveApiObject> for SnapshotInfo {
    fn from(obj: &SteveApiObject) -> Self {
        Self {
            id: obj.id.clone(),
            name: obj.metadata.name.clone(),
            cluster: obj
                .spec
                .get("clusterName")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            created: obj.metadata.creation_timestamp,
            state: obj.state_name().to_string(),
        }
    }
}

/// What to restore and how much configuration to roll back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreRequest {
    /// Backup ID (RKE1) or snapshot name (RKE2/K3s)
    pub snapshot: String,

    pub restore_rke_config: RestoreRkeConfig,
}

impl RestoreRequest {
    pub fn new(snapshot: impl Into<String>) -> Self {
        Self {
            snapshot: snapshot.into(),
            restore_rke_config: RestoreRkeConfig::None,
        }
    }

    pub fn with_restore_rke_config(mut self, config: RestoreRkeConfig) -> Self {
        self.restore_rke_config = config;
        self
    }
}
