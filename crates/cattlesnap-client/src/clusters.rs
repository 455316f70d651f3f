//! Cluster lookups shared by the snapshot helpers

use crate::client::RancherClient;
use crate::error::{Error, Result};
use crate::provisioning::{ProvisioningCluster, PROVISIONING_STEVE_RESOURCE_TYPE};
use crate::steve::SteveApiObject;
use tracing::debug;

/// Resolve a management cluster name to its ID (e.g. "c-abc12", "local")
pub async fn get_cluster_id_by_name(client: &RancherClient, cluster_name: &str) -> Result<String> {
    let clusters = client.management().clusters().list_by_name(cluster_name).await?;

    let cluster = clusters
        .into_iter()
        .find(|c| c.name == cluster_name)
        .ok_or_else(|| Error::not_found("cluster", cluster_name))?;

    debug!("Resolved cluster '{}' to {}", cluster_name, cluster.id);
    Ok(cluster.id)
}

/// Fetch a provisioning cluster, returning both its typed view and the raw
/// Steve object (needed to update it)
pub async fn get_provisioning_cluster_by_name(
    client: &RancherClient,
    cluster_name: &str,
    namespace: &str,
) -> Result<(ProvisioningCluster, SteveApiObject)> {
    let id = format!("{}/{}", namespace, cluster_name);
    let obj = client
        .steve()
        .steve_type(PROVISIONING_STEVE_RESOURCE_TYPE)
        .by_id(&id)
        .await?;

    let cluster = ProvisioningCluster::from_steve(&obj)?;
    Ok((cluster, obj))
}
