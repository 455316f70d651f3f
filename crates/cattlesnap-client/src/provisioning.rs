//! Typed view of `provisioning.cattle.io.cluster` objects
//!
//! Only the fields the snapshot helpers touch are typed. Everything else in
//! `spec` and `rkeConfig` is kept verbatim so an update does not drop it.

use crate::error::Result;
use crate::management::RestoreRkeConfig;
use crate::steve::{convert_to_k8s_type, ObjectMeta, SteveApiObject};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Steve type of provisioning clusters
pub const PROVISIONING_STEVE_RESOURCE_TYPE: &str = "provisioning.cattle.io.cluster";

/// Steve type of RKE2/K3s etcd snapshots
pub const ETCD_SNAPSHOT_STEVE_TYPE: &str = "rke.cattle.io.etcdsnapshot";

/// A provisioning (RKE2/K3s) cluster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningCluster {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default)]
    pub metadata: ObjectMeta,

    #[serde(default)]
    pub spec: ClusterSpec,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub status: Value,
}

impl ProvisioningCluster {
    /// Typed view of a Steve object
    pub fn from_steve(obj: &SteveApiObject) -> Result<Self> {
        convert_to_k8s_type(&serde_json::to_value(obj)?)
    }

    pub fn state_name(&self) -> &str {
        self.metadata.state_name()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rke_config: Option<RkeConfig>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RkeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etcd_snapshot_create: Option<EtcdSnapshotCreate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etcd_snapshot_restore: Option<EtcdSnapshotRestore>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Directive asking the cluster to take an etcd snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtcdSnapshotCreate {
    /// Bumped to re-trigger the snapshot
    #[serde(default)]
    pub generation: i64,
}

/// Directive asking the cluster to restore an etcd snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtcdSnapshotRestore {
    /// Name of the `rke.cattle.io.etcdsnapshot` to restore
    #[serde(default)]
    pub name: String,

    /// Bumped to re-trigger the restore
    #[serde(default)]
    pub generation: i64,

    #[serde(
        rename = "restoreRKEConfig",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub restore_rke_config: Option<RestoreRkeConfig>,
}

impl EtcdSnapshotRestore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generation: 0,
            restore_rke_config: None,
        }
    }

    pub fn with_restore_rke_config(mut self, config: RestoreRkeConfig) -> Self {
        self.restore_rke_config = Some(config);
        self
    }
}

/// The subset of provisioning cluster status the helpers read
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningClusterStatus {
    #[serde(default)]
    pub ready: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,

    #[serde(default)]
    pub conditions: Vec<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProvisioningClusterStatus {
    /// Typed status of a Steve object; an absent status reads as default
    pub fn from_steve(obj: &SteveApiObject) -> Result<Self> {
        if obj.status.is_null() {
            return Ok(Self::default());
        }
        convert_to_k8s_type(&obj.status)
    }
}
