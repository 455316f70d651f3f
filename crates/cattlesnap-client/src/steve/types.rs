//! Steve (`/v1`) object types

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// A Kubernetes object as served by Steve
///
/// `spec` and `status` stay untyped; use [`convert_to_k8s_type`] for a typed
/// view. Unknown top-level fields (`apiVersion`, `kind`, ...) round-trip
/// through `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SteveApiObject {
    /// `namespace/name` for namespaced objects, `name` otherwise
    #[serde(default)]
    pub id: String,

    #[serde(rename = "type", default)]
    pub type_name: String,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub links: HashMap<String, String>,

    #[serde(default)]
    pub metadata: ObjectMeta,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub spec: Value,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub status: Value,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SteveApiObject {
    /// Summarized state name, e.g. "active", "updating"
    pub fn state_name(&self) -> &str {
        self.metadata.state_name()
    }
}

/// Object metadata with Steve's summarized state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<SteveState>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ObjectMeta {
    pub fn state_name(&self) -> &str {
        self.state.as_ref().map(|s| s.name.as_str()).unwrap_or("")
    }
}

/// Steve's summary of an object's condition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteveState {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub error: bool,

    #[serde(default)]
    pub transitioning: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Convert an untyped Steve body (whole object, spec or status) into `T`
pub fn convert_to_k8s_type<T: DeserializeOwned>(value: &Value) -> Result<T> {
    Ok(serde_json::from_value(value.clone())?)
}
