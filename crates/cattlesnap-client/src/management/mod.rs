//! Management (`/v3`) API accessors

mod clusters;
mod etcd_backups;
pub mod types;

pub use clusters::ClusterOperations;
pub use etcd_backups::EtcdBackupOperations;
pub use types::{
    Cluster, EtcdBackup, ListOpts, RestoreFromEtcdBackupInput, RestoreRkeConfig, RKE1_DRIVER,
};

use crate::client::RancherClient;
use crate::error::Result;
use url::Url;

/// Entry point for management resources
#[derive(Debug, Clone, Copy)]
pub struct Management<'a> {
    client: &'a RancherClient,
}

impl<'a> Management<'a> {
    pub(crate) fn new(client: &'a RancherClient) -> Self {
        Self { client }
    }

    pub fn clusters(&self) -> ClusterOperations<'a> {
        ClusterOperations::new(self.client)
    }

    pub fn etcd_backups(&self) -> EtcdBackupOperations<'a> {
        EtcdBackupOperations::new(self.client)
    }
}

/// URL of a `/v3` collection with list filters applied
fn collection_url(client: &RancherClient, collection: &str, opts: &ListOpts) -> Result<Url> {
    let mut url = client.url(&format!("/v3/{}", collection))?;
    if !opts.filters.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &opts.filters {
            pairs.append_pair(key, value);
        }
    }
    Ok(url)
}

/// URL of a single `/v3` resource
fn resource_url(client: &RancherClient, collection: &str, id: &str) -> Result<Url> {
    client.url(&format!("/v3/{}/{}", collection, id))
}
