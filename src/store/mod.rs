//! Cluster store capability
//!
//! The reconciler never talks to the API server directly. It holds a
//! [`ClusterStore`] and issues every read and write through it, which keeps
//! the engine testable against an in-memory double.

mod kube_store;

pub use kube_store::KubeStore;

use std::collections::BTreeMap;

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Pod;

use crate::crd::Memcached;
use crate::error::Result;

/// Read and write access to the objects a Memcached reconcile touches
///
/// Getters return `Ok(None)` when the object does not exist. Writers that
/// modify an existing object send the resource version of the object passed
/// in; a concurrent modification surfaces as [`crate::Error::Conflict`].
#[async_trait]
pub trait ClusterStore: Send + Sync {
    /// Fetch a Memcached by namespace and name
    async fn get_memcached(&self, namespace: &str, name: &str) -> Result<Option<Memcached>>;

    /// Fetch a Deployment by namespace and name
    async fn get_deployment(&self, namespace: &str, name: &str) -> Result<Option<Deployment>>;

    /// Create a Deployment
    async fn create_deployment(&self, deployment: &Deployment) -> Result<Deployment>;

    /// Set the replica count of an existing Deployment, leaving the rest untouched
    async fn scale_deployment(&self, deployment: &Deployment, replicas: i32) -> Result<()>;

    /// List pods in a namespace matching every given label
    async fn list_pods(
        &self,
        namespace: &str,
        labels: &BTreeMap<String, String>,
    ) -> Result<Vec<Pod>>;

    /// Replace the published node list of a Memcached
    async fn update_memcached_status(&self, memcached: &Memcached, nodes: &[String]) -> Result<()>;
}

/// Render labels as a label selector string (`k1=v1,k2=v2`)
pub fn label_selector(labels: &BTreeMap<String, String>) -> String {
    labels
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(",")
}
