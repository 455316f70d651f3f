//! Steve (`/v1`) API accessors
//!
//! Steve serves Kubernetes objects of the management cluster under `/v1`.
//! Downstream clusters are reached through the `/k8s/clusters/<id>` proxy.

pub mod types;

pub use types::{convert_to_k8s_type, ObjectMeta, SteveApiObject, SteveState};

use crate::client::RancherClient;
use crate::error::Result;
use serde::Serialize;
use url::Url;

/// Steve client rooted at one cluster
#[derive(Debug, Clone)]
pub struct SteveClient {
    client: RancherClient,
    /// Path prefix in front of `/v1`, empty for the management cluster
    prefix: String,
}

impl SteveClient {
    pub(crate) fn new(client: RancherClient) -> Self {
        Self {
            client,
            prefix: String::new(),
        }
    }

    /// Steve client for a downstream cluster, reached through the proxy
    pub fn proxy_downstream(&self, cluster_id: &str) -> SteveClient {
        SteveClient {
            client: self.client.clone(),
            prefix: format!("/k8s/clusters/{}", cluster_id),
        }
    }

    /// Accessor for one resource type, e.g. `provisioning.cattle.io.cluster`
    pub fn steve_type(&self, type_name: impl Into<String>) -> SteveTypeClient<'_> {
        SteveTypeClient {
            steve: self,
            type_name: type_name.into(),
        }
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.client.url(&format!("{}/v1/{}", self.prefix, path))
    }
}

/// Operations on one Steve resource type
#[derive(Debug, Clone)]
pub struct SteveTypeClient<'a> {
    steve: &'a SteveClient,
    type_name: String,
}

impl SteveTypeClient<'_> {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// List every object of this type, across all pages
    pub async fn list(&self) -> Result<Vec<SteveApiObject>> {
        let url = self.steve.url(&self.type_name)?;
        self.steve.client.list_all(url).await
    }

    /// Fetch one object by `namespace/name` (or `name` when cluster scoped)
    pub async fn by_id(&self, id: &str) -> Result<SteveApiObject> {
        let url = self.steve.url(&format!("{}/{}", self.type_name, id))?;
        self.steve.client.get_json(url).await
    }

    /// Replace `existing` with `updated`, returning the stored object
    pub async fn update<T: Serialize + ?Sized>(
        &self,
        existing: &SteveApiObject,
        updated: &T,
    ) -> Result<SteveApiObject> {
        let url = self.steve.url(&format!("{}/{}", self.type_name, existing.id))?;
        self.steve.client.put_json(url, updated).await
    }
}
