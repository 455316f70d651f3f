//! etcd snapshot helpers for Rancher-managed clusters
//!
//! This crate lists, creates and restores etcd snapshots of downstream
//! clusters for integration tests, for both cluster flavors Rancher manages:
//!
//! - **RKE1** - backups are `etcdBackup` resources, driven through the
//!   `backupEtcd` and `restoreFromEtcdBackup` cluster actions
//! - **RKE2/K3s** - snapshots are `rke.cattle.io.etcdsnapshot` objects,
//!   requested by bumping generation counters on the provisioning cluster
//!
//! Create and restore block until Rancher reports the result, polling at
//! the intervals configured in [`SnapshotWaits`].
//!
//! # Example
//!
//! ```ignore
//! use cattlesnap_client::RancherClient;
//! use cattlesnap_core::TestConfig;
//! use cattlesnap_snapshots::{create_snapshot_provider, detect_cluster_flavor, RestoreRequest};
//!
//! let config = TestConfig::load(None)?;
//! let client = RancherClient::new(&config.rancher)?;
//!
//! let flavor = detect_cluster_flavor(&client, "downstream").await?;
//! let provider = create_snapshot_provider(flavor, client, config.waits);
//!
//! provider.create("downstream").await?;
//! for snapshot in provider.list("downstream").await? {
//!     println!("  - {} ({})", snapshot.name, snapshot.state);
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! SnapshotProvider (trait)
//! ├── Rke1Snapshots
//! └── Rke2Snapshots
//! ```
//!
//! The free functions in [`rke1`] and [`rke2`] are usable on their own when a
//! test needs the flavor-specific types.

pub mod error;
pub mod rke1;
pub mod rke2;
pub mod traits;
pub mod types;

pub use cattlesnap_core::SnapshotWaits;
pub use error::{Result, SnapshotError};
pub use rke1::{create_rke1_snapshot, list_rke1_snapshots, restore_rke1_snapshot, Rke1Snapshots};
pub use rke2::{
    create_rke2_snapshot, list_rke2_snapshots, request_snapshot_create,
    request_snapshot_restore, restore_rke2_snapshot, Rke2Snapshots,
};
pub use traits::SnapshotProvider;
pub use types::{ClusterFlavor, RestoreRequest, SnapshotInfo};

use cattlesnap_client::{Error as ClientError, RancherClient, RKE1_DRIVER};
use tracing::debug;

/// Create a snapshot provider for a cluster flavor
///
/// # Example
///
/// ```ignore
/// use cattlesnap_snapshots::{create_snapshot_provider, ClusterFlavor, SnapshotWaits};
///
/// let provider = create_snapshot_provider(ClusterFlavor::Rke1, client, SnapshotWaits::default());
/// println!("Using provider: {}", provider.name());
/// ```
pub fn create_snapshot_provider(
    flavor: ClusterFlavor,
    client: RancherClient,
    waits: SnapshotWaits,
) -> Box<dyn SnapshotProvider> {
    match flavor {
        ClusterFlavor::Rke1 => Box::new(Rke1Snapshots::new(client).with_waits(waits)),
        ClusterFlavor::Rke2 => Box::new(Rke2Snapshots::new(client).with_waits(waits)),
    }
}

/// Map a management cluster driver to a snapshot flavor
pub fn flavor_for_driver(driver: &str) -> Option<ClusterFlavor> {
    match driver {
        RKE1_DRIVER => Some(ClusterFlavor::Rke1),
        "rke2" | "k3s" => Some(ClusterFlavor::Rke2),
        _ => None,
    }
}

/// Detect a cluster's snapshot flavor from its management cluster driver
pub async fn detect_cluster_flavor(
    client: &RancherClient,
    cluster_name: &str,
) -> Result<ClusterFlavor> {
    let clusters = client
        .management()
        .clusters()
        .list_by_name(cluster_name)
        .await?;

    let cluster = clusters
        .into_iter()
        .find(|c| c.name == cluster_name)
        .ok_or_else(|| ClientError::not_found("cluster", cluster_name))?;

    let driver = cluster.driver.unwrap_or_default();
    debug!("Cluster '{}' uses driver '{}'", cluster_name, driver);

    flavor_for_driver(&driver).ok_or(SnapshotError::UnknownFlavor {
        cluster: cluster_name.to_string(),
        driver,
    })
}
