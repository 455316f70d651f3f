//! RKE2/K3s snapshots through provisioning cluster directives
//!
//! Snapshots and restores are requested by writing `etcdSnapshotCreate` or
//! `etcdSnapshotRestore` into the provisioning cluster's `rkeConfig`. Each
//! directive carries a generation that must move forward for the request to
//! be picked up again. Snapshots are `rke.cattle.io.etcdsnapshot` objects on
//! the management (`local`) cluster.

use crate::error::{Result, SnapshotError};
use crate::traits::SnapshotProvider;
use crate::types::{ClusterFlavor, RestoreRequest, SnapshotInfo};
use async_trait::async_trait;
use cattlesnap_client::steve::SteveTypeClient;
use cattlesnap_client::{
    get_cluster_id_by_name, get_provisioning_cluster_by_name, EtcdSnapshotCreate,
    EtcdSnapshotRestore, ProvisioningCluster, ProvisioningClusterStatus, RancherClient,
    RkeConfig, SteveApiObject, ETCD_SNAPSHOT_STEVE_TYPE, PROVISIONING_STEVE_RESOURCE_TYPE,
};
use cattlesnap_core::defaults::{ACTIVE_STATE, FLEET_NAMESPACE, LOCAL_CLUSTER_NAME};
use cattlesnap_core::wait::{PollerBuilder, TracingObserver};
use cattlesnap_core::{PollSettings, SnapshotWaits};
use tracing::{debug, info};

/// List an RKE2/K3s cluster's snapshots, oldest first
pub async fn list_rke2_snapshots(
    client: &RancherClient,
    cluster_name: &str,
) -> Result<Vec<SteveApiObject>> {
    let local_cluster_id = get_cluster_id_by_name(client, LOCAL_CLUSTER_NAME).await?;
    let steve = client.steve().proxy_downstream(&local_cluster_id);

    let all = steve.steve_type(ETCD_SNAPSHOT_STEVE_TYPE).list().await?;

    let mut snapshots: Vec<SteveApiObject> = all
        .into_iter()
        .filter(|s| s.metadata.name.contains(cluster_name))
        .collect();

    snapshots.sort_by(|a, b| {
        a.metadata
            .creation_timestamp
            .cmp(&b.metadata.creation_timestamp)
    });

    Ok(snapshots)
}

/// Request a new snapshot by moving `etcdSnapshotCreate.generation` forward
///
/// A cluster without `rkeConfig` gets one holding only the directive.
/// Returns the new generation.
pub fn request_snapshot_create(cluster: &mut ProvisioningCluster) -> i64 {
    let rke_config = cluster.spec.rke_config.get_or_insert_with(RkeConfig::default);
    let generation = rke_config
        .etcd_snapshot_create
        .map(|c| c.generation + 1)
        .unwrap_or(1);

    rke_config.etcd_snapshot_create = Some(EtcdSnapshotCreate { generation });
    generation
}

/// Install a restore directive, moving its generation past the previous one
///
/// A generation already set on `restore` is kept when it is higher.
/// Returns the generation written.
pub fn request_snapshot_restore(
    cluster: &mut ProvisioningCluster,
    restore: &EtcdSnapshotRestore,
) -> Result<i64> {
    let cluster_name = cluster.metadata.name.clone();
    let rke_config = cluster
        .spec
        .rke_config
        .as_mut()
        .ok_or(SnapshotError::MissingRkeConfig {
            cluster: cluster_name,
        })?;

    let generation = rke_config
        .etcd_snapshot_restore
        .as_ref()
        .map(|r| r.generation + 1)
        .unwrap_or(1)
        .max(restore.generation);

    rke_config.etcd_snapshot_restore = Some(EtcdSnapshotRestore {
        generation,
        ..restore.clone()
    });
    Ok(generation)
}

/// Take a snapshot of an RKE2/K3s cluster and wait until one of its
/// snapshots and the cluster itself are active
///
/// The first check runs right after the update. An older snapshot of the
/// cluster that is already active satisfies the wait, even when Rancher has
/// not started the new one yet.
pub async fn create_rke2_snapshot(
    client: &RancherClient,
    cluster_name: &str,
    waits: &SnapshotWaits,
) -> Result<()> {
    let (mut cluster, existing) =
        get_provisioning_cluster_by_name(client, cluster_name, FLEET_NAMESPACE).await?;

    let generation = request_snapshot_create(&mut cluster);

    info!("Creating snapshot...");
    debug!("etcdSnapshotCreate generation {}", generation);
    client
        .steve()
        .steve_type(PROVISIONING_STEVE_RESOURCE_TYPE)
        .update(&existing, &cluster)
        .await?;

    PollerBuilder::new()
        .with_settings(&waits.create)
        .with_observer(TracingObserver::new("rke2 snapshot create"))
        .build()
        .until(move || async move {
            Ok::<_, cattlesnap_client::Error>(snapshot_active(client, cluster_name).await)
        })
        .await
        .map_err(|e| SnapshotError::wait("waiting for RKE2/K3s snapshot to become active", e))?;

    info!("All snapshots in the cluster are in an active state!");
    Ok(())
}

/// Read failures count as "not yet"
async fn snapshot_active(client: &RancherClient, cluster_name: &str) -> bool {
    let steve = client.steve();
    let snapshots = steve.steve_type(ETCD_SNAPSHOT_STEVE_TYPE);

    let listed = match snapshots.list().await {
        Ok(listed) => listed,
        Err(e) => {
            debug!("Listing etcd snapshots failed, retrying: {}", e);
            return false;
        }
    };

    match get_provisioning_cluster_by_name(client, cluster_name, FLEET_NAMESPACE).await {
        Ok((cluster, _)) if cluster.state_name() == ACTIVE_STATE => {}
        Ok((cluster, _)) => {
            debug!("Cluster {} is {}", cluster_name, cluster.state_name());
            return false;
        }
        Err(e) => {
            debug!("Fetching cluster {} failed, retrying: {}", cluster_name, e);
            return false;
        }
    }

    for snapshot in listed
        .iter()
        .filter(|s| s.metadata.name.contains(cluster_name))
    {
        match snapshots.by_id(&snapshot.id).await {
            Ok(s) if s.state_name() == ACTIVE_STATE => return true,
            Ok(_) => {}
            Err(e) => {
                debug!("Fetching snapshot {} failed, retrying: {}", snapshot.id, e);
                return false;
            }
        }
    }

    false
}

/// Restore an RKE2/K3s cluster from a snapshot and wait for it to go through
/// an update and come back active
///
/// Unlike the other waits, read failures while waiting abort the restore.
pub async fn restore_rke2_snapshot(
    client: &RancherClient,
    restore: &EtcdSnapshotRestore,
    cluster_name: &str,
    waits: &SnapshotWaits,
) -> Result<()> {
    let (mut cluster, existing) =
        get_provisioning_cluster_by_name(client, cluster_name, FLEET_NAMESPACE).await?;

    let generation = request_snapshot_restore(&mut cluster, restore)?;

    info!("Restoring snapshot: {}", restore.name);
    debug!("etcdSnapshotRestore generation {}", generation);

    let steve = client.steve();
    let clusters = steve.steve_type(PROVISIONING_STEVE_RESOURCE_TYPE);
    let updated = clusters.update(&existing, &cluster).await?;

    let cluster_id = if updated.id.is_empty() {
        existing.id.as_str()
    } else {
        updated.id.as_str()
    };

    wait_for_provisioning_state(
        &clusters,
        cluster_id,
        false,
        &waits.rke2_restore_start,
        "waiting for RKE2/K3s cluster to start restoring",
    )
    .await?;

    wait_for_provisioning_state(
        &clusters,
        cluster_id,
        true,
        &waits.rke2_restore_complete,
        "waiting for RKE2/K3s cluster to become active after restore",
    )
    .await?;

    info!("Cluster {} restored and active", cluster_name);
    Ok(())
}

/// Poll a provisioning cluster until its active-ness equals `active`
async fn wait_for_provisioning_state(
    clusters: &SteveTypeClient<'_>,
    cluster_id: &str,
    active: bool,
    settings: &PollSettings,
    operation: &str,
) -> Result<()> {
    PollerBuilder::new()
        .with_settings(settings)
        .with_observer(TracingObserver::new(operation))
        .build()
        .until(move || async move {
            let obj = clusters.by_id(cluster_id).await?;
            // A status that no longer parses means the object is not what we expect
            ProvisioningClusterStatus::from_steve(&obj)?;
            Ok::<_, cattlesnap_client::Error>((obj.state_name() == ACTIVE_STATE) == active)
        })
        .await
        .map_err(|e| SnapshotError::wait(operation, e))?;

    Ok(())
}

/// RKE2/K3s snapshot provider
#[derive(Debug, Clone)]
pub struct Rke2Snapshots {
    client: RancherClient,
    waits: SnapshotWaits,
}

impl Rke2Snapshots {
    pub fn new(client: RancherClient) -> Self {
        Self {
            client,
            waits: SnapshotWaits::default(),
        }
    }

    pub fn with_waits(mut self, waits: SnapshotWaits) -> Self {
        self.waits = waits;
        self
    }

    /// Snapshots with their full Steve representation
    pub async fn snapshot_objects(&self, cluster_name: &str) -> Result<Vec<SteveApiObject>> {
        list_rke2_snapshots(&self.client, cluster_name).await
    }
}

#[async_trait]
impl SnapshotProvider for Rke2Snapshots {
    fn name(&self) -> &'static str {
        "rke2"
    }

    fn flavor(&self) -> ClusterFlavor {
        ClusterFlavor::Rke2
    }

    async fn list(&self, cluster_name: &str) -> Result<Vec<SnapshotInfo>> {
        let snapshots = self.snapshot_objects(cluster_name).await?;
        Ok(snapshots.iter().map(SnapshotInfo::from).collect())
    }

    async fn create(&self, cluster_name: &str) -> Result<()> {
        create_rke2_snapshot(&self.client, cluster_name, &self.waits).await
    }

    async fn restore(&self, cluster_name: &str, request: &RestoreRequest) -> Result<()> {
        // Accept a Steve ID ("namespace/name") as well as a bare name
        let name = request
            .snapshot
            .rsplit('/')
            .next()
            .unwrap_or(&request.snapshot);

        let restore =
            EtcdSnapshotRestore::new(name).with_restore_rke_config(request.restore_rke_config);
        restore_rke2_snapshot(&self.client, &restore, cluster_name, &self.waits).await
    }
}
