//! Memcached Custom Resource Definition

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Smallest cluster size accepted by the schema
pub const MIN_SIZE: i32 = 1;

/// Largest cluster size accepted by the schema
pub const MAX_SIZE: i32 = 5;

/// Memcached resource specification
#[derive(CustomResource, Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "cache.example.com",
    version = "v1alpha1",
    kind = "Memcached",
    plural = "memcacheds",
    singular = "memcached",
    shortname = "mc",
    namespaced,
    status = "MemcachedStatus",
    printcolumn = r#"{"name": "Size", "type": "integer", "jsonPath": ".spec.size"}"#,
    printcolumn = r#"{"name": "Nodes", "type": "string", "jsonPath": ".status.nodes"}"#,
    printcolumn = r#"{"name": "Age", "type": "date", "jsonPath": ".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct MemcachedSpec {
    /// Desired number of memcached replicas
    #[schemars(range(min = 1, max = 5))]
    pub size: i32,
}

/// Memcached status
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemcachedStatus {
    /// Names of the pods currently running for this cluster
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<String>,
}

impl Memcached {
    /// Reject sizes the schema would not admit
    pub fn validate(&self) -> Result<()> {
        let size = self.spec.size;
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(Error::validation(format!(
                "Invalid size {}: must be between {} and {}",
                size, MIN_SIZE, MAX_SIZE
            )));
        }
        Ok(())
    }

    /// Pod names currently published in status
    pub fn nodes(&self) -> &[String] {
        self.status
            .as_ref()
            .map(|s| s.nodes.as_slice())
            .unwrap_or_default()
    }
}
