//! Rancher API client for cattlesnap
//!
//! Two API styles are exposed:
//!
//! - **Management** (`/v3`): norman resources such as `cluster` and
//!   `etcdBackup`, with actions like `backupEtcd`.
//! - **Steve** (`/v1`): Kubernetes objects such as
//!   `provisioning.cattle.io.cluster` and `rke.cattle.io.etcdsnapshot`,
//!   optionally proxied to a downstream cluster.
//!
//! # Example
//!
//! ```ignore
//! use cattlesnap_client::{get_cluster_id_by_name, RancherClient};
//! use cattlesnap_core::RancherConfig;
//!
//! let client = RancherClient::new(&RancherConfig::new("rancher.example.com", token))?;
//! let id = get_cluster_id_by_name(&client, "downstream").await?;
//! let cluster = client.management().clusters().by_id(&id).await?;
//! println!("{} is {}", cluster.name, cluster.state);
//! ```

mod client;
pub mod clusters;
pub mod error;
pub mod management;
pub mod provisioning;
pub mod steve;

pub use client::RancherClient;
pub use clusters::{get_cluster_id_by_name, get_provisioning_cluster_by_name};
pub use error::{Error, Result};
pub use management::{
    Cluster, EtcdBackup, ListOpts, RestoreFromEtcdBackupInput, RestoreRkeConfig, RKE1_DRIVER,
};
pub use provisioning::{
    EtcdSnapshotCreate, EtcdSnapshotRestore, ProvisioningCluster, ProvisioningClusterStatus,
    RkeConfig, ETCD_SNAPSHOT_STEVE_TYPE, PROVISIONING_STEVE_RESOURCE_TYPE,
};
pub use steve::{convert_to_k8s_type, ObjectMeta, SteveApiObject, SteveClient, SteveState};
