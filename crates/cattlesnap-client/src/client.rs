//! HTTP plumbing shared by the management and Steve accessors

use crate::error::{Error, Result};
use crate::management::Management;
use crate::steve::SteveClient;
use cattlesnap_core::RancherConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use url::Url;

const USER_AGENT: &str = concat!("cattlesnap/", env!("CARGO_PKG_VERSION"));

/// Client for a Rancher management server
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct RancherClient {
    http: reqwest::Client,
    base_url: String,
}

impl RancherClient {
    /// Create a client authenticated with the configured admin token
    pub fn new(config: &RancherConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.admin_token))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .danger_accept_invalid_certs(config.insecure)
            .build()?;

        let base_url = config.base_url();
        // Fail early on hosts that can never form a request URL
        Url::parse(&base_url)?;

        Ok(Self { http, base_url })
    }

    /// Base URL requests are made against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Management (`/v3`) API accessor
    pub fn management(&self) -> Management<'_> {
        Management::new(self)
    }

    /// Steve (`/v1`) API accessor for the management cluster
    pub fn steve(&self) -> SteveClient {
        SteveClient::new(self.clone())
    }

    /// Build an absolute URL from a server-relative path
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.send(Method::GET, url, None::<&()>).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn put_json<B, T>(&self, url: Url, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::PUT, url, Some(body)).await?;
        Ok(response.json().await?)
    }

    /// POST to an action URL, discarding the response body
    pub(crate) async fn post_action<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: Option<&B>,
    ) -> Result<()> {
        self.send(Method::POST, url, body).await?;
        Ok(())
    }

    /// Fetch every page of a collection, following `pagination.next`
    pub(crate) async fn list_all<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(url);

        while let Some(url) = next.take() {
            let page: Collection<T> = self.get_json(url.clone()).await?;
            items.extend(page.data);

            if let Some(link) = page.pagination.and_then(|p| p.next) {
                let link = Url::parse(&link)?;
                if link != url {
                    next = Some(link);
                }
            }
        }

        trace!("Collected {} items", items.len());
        Ok(items)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<reqwest::Response> {
        debug!("{} {}", method, url);

        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(Error::api(method.as_str(), url.as_str(), status.as_u16(), &body))
    }
}

/// A page of a Rancher (norman or Steve) collection
#[derive(Debug, Deserialize)]
pub(crate) struct Collection<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Pagination {
    #[serde(default)]
    pub next: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_base_url() {
        let client = RancherClient::new(&RancherConfig::new("rancher.example.com", "t")).unwrap();
        assert_eq!(client.base_url(), "https://rancher.example.com");
        assert_eq!(
            client.url("/v3/clusters").unwrap().as_str(),
            "https://rancher.example.com/v3/clusters"
        );
    }

    #[test]
    fn test_client_rejects_empty_token() {
        let err = RancherClient::new(&RancherConfig::new("rancher.example.com", "")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_collection_without_pagination() {
        let page: Collection<serde_json::Value> =
            serde_json::from_str(r#"{"type":"collection","data":[{"id":"a"}]}"#).unwrap();
        assert_eq!(page.data.len(), 1);
        assert!(page.pagination.is_none());
    }
}
