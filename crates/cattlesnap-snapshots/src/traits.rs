//! Snapshot provider trait
//!
//! Both cluster flavors expose the same list/create/restore lifecycle; only
//! the API calls and the status fields they poll differ.

use crate::error::Result;
use crate::types::{ClusterFlavor, RestoreRequest, SnapshotInfo};
use async_trait::async_trait;

/// Drives etcd snapshots of one cluster flavor
///
/// # Example
///
/// ```ignore
/// use cattlesnap_snapshots::{create_snapshot_provider, ClusterFlavor, RestoreRequest};
///
/// let provider = create_snapshot_provider(ClusterFlavor::Rke2, client, waits);
/// provider.create("downstream").await?;
///
/// let snapshots = provider.list("downstream").await?;
/// if let Some(oldest) = snapshots.first() {
///     provider.restore("downstream", &RestoreRequest::new(&oldest.name)).await?;
/// }
/// ```
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// Provider name ("rke1" or "rke2")
    fn name(&self) -> &'static str;

    fn flavor(&self) -> ClusterFlavor;

    /// List the cluster's snapshots in the flavor's natural order
    /// (RKE1 newest first, RKE2/K3s oldest first)
    async fn list(&self, cluster_name: &str) -> Result<Vec<SnapshotInfo>>;

    /// Take a snapshot and wait until it is active
    async fn create(&self, cluster_name: &str) -> Result<()>;

    /// Restore a snapshot and wait until the cluster is active again
    async fn restore(&self, cluster_name: &str, request: &RestoreRequest) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rke1::Rke1Snapshots;
    use crate::rke2::Rke2Snapshots;
    use cattlesnap_client::RancherClient;
    use cattlesnap_core::RancherConfig;

    #[test]
    fn test_providers_as_trait_objects() {
        let client =
            RancherClient::new(&RancherConfig::new("rancher.example.com", "token-x:y")).unwrap();
        let providers: Vec<Box<dyn SnapshotProvider>> = vec![
            Box::new(Rke1Snapshots::new(client.clone())),
            Box::new(Rke2Snapshots::new(client)),
        ];

        let names: Vec<_> = providers.iter().map(|p| (p.name(), p.flavor())).collect();
        assert_eq!(
            names,
            vec![("rke1", ClusterFlavor::Rke1), ("rke2", ClusterFlavor::Rke2)]
        );
    }
}
