//! Shared helpers for client integration tests

#![allow(dead_code)]

use cattlesnap_client::RancherClient;
use cattlesnap_core::RancherConfig;
use serde_json::{json, Value};
use wiremock::MockServer;

pub const TEST_TOKEN: &str = "token-test:secret";

/// Client pointed at the mock server
pub fn client_for(server: &MockServer) -> RancherClient {
    RancherClient::new(&RancherConfig::new(server.uri(), TEST_TOKEN)).unwrap()
}

/// Bearer header value the client is expected to send
pub fn bearer() -> String {
    format!("Bearer {}", TEST_TOKEN)
}

/// A norman collection body
pub fn collection(data: Vec<Value>) -> Value {
    json!({ "type": "collection", "data": data })
}

pub fn management_cluster(id: &str, name: &str, state: &str) -> Value {
    json!({
        "id": id,
        "type": "cluster",
        "name": name,
        "state": state,
        "driver": "rancherKubernetesEngine"
    })
}

pub fn etcd_backup(id: &str, name: &str, cluster_id: &str, created: &str) -> Value {
    json!({
        "id": id,
        "type": "etcdBackup",
        "name": name,
        "clusterId": cluster_id,
        "created": created,
        "state": "active",
        "manual": true
    })
}
