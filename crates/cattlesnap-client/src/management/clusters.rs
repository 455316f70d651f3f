use super::types::{Cluster, ListOpts, RestoreFromEtcdBackupInput};
use super::{collection_url, resource_url};
use crate::client::RancherClient;
use crate::error::Result;
use url::Url;

const COLLECTION: &str = "clusters";

/// Operations on management clusters
#[derive(Debug, Clone, Copy)]
pub struct ClusterOperations<'a> {
    client: &'a RancherClient,
}

impl<'a> ClusterOperations<'a> {
    pub(crate) fn new(client: &'a RancherClient) -> Self {
        Self { client }
    }

    /// List every cluster matching `opts`
    pub async fn list_all(&self, opts: &ListOpts) -> Result<Vec<Cluster>> {
        let url = collection_url(self.client, COLLECTION, opts)?;
        self.client.list_all(url).await
    }

    /// List clusters whose name equals `name`
    pub async fn list_by_name(&self, name: &str) -> Result<Vec<Cluster>> {
        self.list_all(&ListOpts::new().filter("name", name)).await
    }

    pub async fn by_id(&self, id: &str) -> Result<Cluster> {
        let url = resource_url(self.client, COLLECTION, id)?;
        self.client.get_json(url).await
    }

    /// Trigger a one-off etcd backup of an RKE1 cluster
    pub async fn action_backup_etcd(&self, cluster: &Cluster) -> Result<()> {
        let url = self.action_url(cluster, "backupEtcd")?;
        self.client.post_action(url, None::<&()>).await
    }

    /// Restore an RKE1 cluster from one of its etcd backups
    pub async fn action_restore_from_etcd_backup(
        &self,
        cluster: &Cluster,
        input: &RestoreFromEtcdBackupInput,
    ) -> Result<()> {
        let url = self.action_url(cluster, "restoreFromEtcdBackup")?;
        self.client.post_action(url, Some(input)).await
    }

    /// Action URL advertised by the resource, or the conventional one
    fn action_url(&self, cluster: &Cluster, action: &str) -> Result<Url> {
        if let Some(link) = cluster.actions.get(action) {
            return Ok(Url::parse(link)?);
        }

        let mut url = resource_url(self.client, COLLECTION, &cluster.id)?;
        url.query_pairs_mut().append_pair("action", action);
        Ok(url)
    }
}
