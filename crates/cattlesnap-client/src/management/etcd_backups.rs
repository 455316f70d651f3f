use super::types::{EtcdBackup, ListOpts};
use super::{collection_url, resource_url};
use crate::client::RancherClient;
use crate::error::Result;

const COLLECTION: &str = "etcdbackups";

/// Operations on RKE1 etcd backups
#[derive(Debug, Clone, Copy)]
pub struct EtcdBackupOperations<'a> {
    client: &'a RancherClient,
}

impl<'a> EtcdBackupOperations<'a> {
    pub(crate) fn new(client: &'a RancherClient) -> Self {
        Self { client }
    }

    /// List every backup matching `opts`, across all pages
    pub async fn list_all(&self, opts: &ListOpts) -> Result<Vec<EtcdBackup>> {
        let url = collection_url(self.client, COLLECTION, opts)?;
        self.client.list_all(url).await
    }

    pub async fn by_id(&self, id: &str) -> Result<EtcdBackup> {
        let url = resource_url(self.client, COLLECTION, id)?;
        self.client.get_json(url).await
    }
}
