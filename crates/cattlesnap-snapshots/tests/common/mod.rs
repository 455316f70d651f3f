//! Shared helpers for snapshot integration tests

#![allow(dead_code)]

use cattlesnap_client::RancherClient;
use cattlesnap_core::{PollSettings, RancherConfig, SnapshotWaits};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "token-test:secret";

pub fn client_for(server: &MockServer) -> RancherClient {
    RancherClient::new(&RancherConfig::new(server.uri(), TEST_TOKEN)).unwrap()
}

/// Short waits so the poll loops finish in milliseconds
pub fn fast_waits() -> SnapshotWaits {
    SnapshotWaits::uniform(PollSettings {
        interval_ms: 10,
        timeout_ms: 2_000,
    })
}

/// Waits that give up quickly, for timeout tests
pub fn short_waits() -> SnapshotWaits {
    SnapshotWaits::uniform(PollSettings {
        interval_ms: 10,
        timeout_ms: 200,
    })
}

pub fn collection(data: Vec<Value>) -> Value {
    json!({ "type": "collection", "data": data })
}

pub fn ok_json(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

pub fn management_cluster(id: &str, name: &str, state: &str, driver: &str) -> Value {
    json!({
        "id": id,
        "type": "cluster",
        "name": name,
        "state": state,
        "driver": driver
    })
}

pub fn etcd_backup(id: &str, cluster_id: &str, created: &str, state: &str) -> Value {
    json!({
        "id": id,
        "type": "etcdBackup",
        "name": id,
        "clusterId": cluster_id,
        "created": created,
        "state": state,
        "manual": true
    })
}

/// Provisioning cluster in `fleet-default`; `rke_config` of `None` omits the key
pub fn provisioning_cluster(name: &str, state: &str, rke_config: Option<Value>) -> Value {
    let mut spec = json!({ "kubernetesVersion": "v1.30.4+rke2r1" });
    if let Some(rke_config) = rke_config {
        spec["rkeConfig"] = rke_config;
    }

    json!({
        "id": format!("fleet-default/{}", name),
        "type": "provisioning.cattle.io.cluster",
        "apiVersion": "provisioning.cattle.io/v1",
        "kind": "Cluster",
        "metadata": {
            "name": name,
            "namespace": "fleet-default",
            "resourceVersion": "100",
            "state": { "name": state }
        },
        "spec": spec,
        "status": { "ready": state == "active", "clusterName": "c-m-xyz" }
    })
}

pub fn etcd_snapshot(name: &str, created: &str, state: &str) -> Value {
    json!({
        "id": format!("fleet-default/{}", name),
        "type": "rke.cattle.io.etcdsnapshot",
        "metadata": {
            "name": name,
            "namespace": "fleet-default",
            "creationTimestamp": created,
            "state": { "name": state }
        },
        "spec": { "clusterName": "downstream" }
    })
}

/// Answer `/v3/clusters?name=<name>` with a single cluster
pub async fn mount_cluster_lookup(server: &MockServer, cluster: Value) {
    let name = cluster["name"].as_str().unwrap_or_default().to_string();
    Mock::given(method("GET"))
        .and(path("/v3/clusters"))
        .and(query_param("name", name.as_str()))
        .respond_with(ok_json(collection(vec![cluster])))
        .mount(server)
        .await;
}
