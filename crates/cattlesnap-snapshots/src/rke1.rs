//! RKE1 snapshots through the management API
//!
//! Backups are `etcdBackup` resources named after the owning cluster ID.
//! Creating and restoring are cluster actions; progress is read from the
//! `state` field of the backups and of the cluster.

use crate::error::{Result, SnapshotError};
use crate::traits::SnapshotProvider;
use crate::types::{ClusterFlavor, RestoreRequest, SnapshotInfo};
use async_trait::async_trait;
use cattlesnap_client::{
    get_cluster_id_by_name, EtcdBackup, ListOpts, RancherClient, RestoreFromEtcdBackupInput,
};
use cattlesnap_core::defaults::ACTIVE_STATE;
use cattlesnap_core::wait::{PollerBuilder, TracingObserver};
use cattlesnap_core::{PollSettings, SnapshotWaits};
use tracing::{debug, info};

fn cluster_filter(cluster_id: &str) -> ListOpts {
    ListOpts::new().filter("clusterId", cluster_id)
}

/// List an RKE1 cluster's backups, newest first
pub async fn list_rke1_snapshots(
    client: &RancherClient,
    cluster_name: &str,
) -> Result<Vec<EtcdBackup>> {
    let cluster_id = get_cluster_id_by_name(client, cluster_name).await?;

    let backups = client
        .management()
        .etcd_backups()
        .list_all(&cluster_filter(&cluster_id))
        .await?;

    let mut snapshots: Vec<EtcdBackup> = backups
        .into_iter()
        .filter(|b| b.name.contains(&cluster_id))
        .collect();

    snapshots.sort_by(|a, b| b.created.cmp(&a.created));

    Ok(snapshots)
}

/// Take a one-off backup of an RKE1 cluster and wait until every backup of
/// the cluster is active
pub async fn create_rke1_snapshot(
    client: &RancherClient,
    cluster_name: &str,
    waits: &SnapshotWaits,
) -> Result<()> {
    let cluster_id = get_cluster_id_by_name(client, cluster_name).await?;
    let clusters = client.management().clusters();
    let cluster = clusters.by_id(&cluster_id).await?;

    info!("Creating snapshot...");
    clusters.action_backup_etcd(&cluster).await?;

    let cluster_id = cluster_id.as_str();
    PollerBuilder::new()
        .with_settings(&waits.create)
        .with_observer(TracingObserver::new("rke1 snapshot create"))
        .build()
        .until(move || async move {
            Ok::<_, cattlesnap_client::Error>(all_backups_active(client, cluster_id).await)
        })
        .await
        .map_err(|e| SnapshotError::wait("waiting for RKE1 snapshots to become active", e))?;

    info!("All snapshots in the cluster are in an active state!");
    Ok(())
}

/// Read failures count as "not yet"
async fn all_backups_active(client: &RancherClient, cluster_id: &str) -> bool {
    let backups = client.management().etcd_backups();

    let listed = match backups.list_all(&cluster_filter(cluster_id)).await {
        Ok(listed) => listed,
        Err(e) => {
            debug!("Listing etcd backups failed, retrying: {}", e);
            return false;
        }
    };

    for backup in &listed {
        match backups.by_id(&backup.id).await {
            Ok(b) if b.state == ACTIVE_STATE => {}
            Ok(b) => {
                debug!("Backup {} is {}", b.id, b.state);
                return false;
            }
            Err(e) => {
                debug!("Fetching backup {} failed, retrying: {}", backup.id, e);
                return false;
            }
        }
    }

    true
}

/// Restore an RKE1 cluster from a backup and wait for it to go through an
/// update and come back active
pub async fn restore_rke1_snapshot(
    client: &RancherClient,
    cluster_name: &str,
    input: &RestoreFromEtcdBackupInput,
    waits: &SnapshotWaits,
) -> Result<()> {
    let cluster_id = get_cluster_id_by_name(client, cluster_name).await?;
    let clusters = client.management().clusters();
    let cluster = clusters.by_id(&cluster_id).await?;

    info!("Restoring snapshot: {}", input.etcd_backup_id);
    clusters
        .action_restore_from_etcd_backup(&cluster, input)
        .await?;

    wait_for_cluster_state(
        client,
        &cluster.id,
        false,
        &waits.rke1_restore_start,
        "waiting for RKE1 cluster to start restoring",
    )
    .await?;

    wait_for_cluster_state(
        client,
        &cluster.id,
        true,
        &waits.rke1_restore_complete,
        "waiting for RKE1 cluster to become active after restore",
    )
    .await?;

    info!("Cluster {} restored and active", cluster_name);
    Ok(())
}

/// Poll the management cluster until its active-ness equals `active`
async fn wait_for_cluster_state(
    client: &RancherClient,
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
            match client.management().clusters().by_id(cluster_id).await {
                Ok(cluster) => Ok::<_, cattlesnap_client::Error>(
                    (cluster.state == ACTIVE_STATE) == active,
                ),
                Err(e) => {
                    debug!("Fetching cluster {} failed, retrying: {}", cluster_id, e);
                    Ok(false)
                }
            }
        })
        .await
        .map_err(|e| SnapshotError::wait(operation, e))?;

    Ok(())
}

/// RKE1 snapshot provider
#[derive(Debug, Clone)]
pub struct Rke1Snapshots {
    client: RancherClient,
    waits: SnapshotWaits,
}

impl Rke1Snapshots {
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

    /// Backups with their full management representation
    pub async fn backups(&self, cluster_name: &str) -> Result<Vec<EtcdBackup>> {
        list_rke1_snapshots(&self.client, cluster_name).await
    }
}

#[async_trait]
impl SnapshotProvider for Rke1Snapshots {
    fn name(&self) -> &'static str {
        "rke1"
    }

    fn flavor(&self) -> ClusterFlavor {
        ClusterFlavor::Rke1
    }

    async fn list(&self, cluster_name: &str) -> Result<Vec<SnapshotInfo>> {
        let backups = self.backups(cluster_name).await?;
        Ok(backups.iter().map(SnapshotInfo::from).collect())
    }

    async fn create(&self, cluster_name: &str) -> Result<()> {
        create_rke1_snapshot(&self.client, cluster_name, &self.waits).await
    }

    async fn restore(&self, cluster_name: &str, request: &RestoreRequest) -> Result<()> {
        let input = RestoreFromEtcdBackupInput::new(&request.snapshot)
            .with_restore_rke_config(request.restore_rke_config);
        restore_rke1_snapshot(&self.client, cluster_name, &input, &self.waits).await
    }
}
