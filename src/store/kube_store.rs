//! ClusterStore backed by the Kubernetes API server

use std::collections::BTreeMap;

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Pod;
use kube::{
    api::{ListParams, Patch, PatchParams, PostParams},
    Api, Client, ResourceExt,
};
use serde_json::{json, Value};

use super::{label_selector, ClusterStore};
use crate::crd::Memcached;
use crate::error::{Error, Result};

/// API server backed store
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
    field_manager: String,
}

impl KubeStore {
    /// Create a store writing as the given field manager
    pub fn new(client: Client, field_manager: impl Into<String>) -> Self {
        Self {
            client,
            field_manager: field_manager.into(),
        }
    }

    fn post_params(&self) -> PostParams {
        PostParams {
            field_manager: Some(self.field_manager.clone()),
            ..Default::default()
        }
    }

    fn patch_params(&self) -> PatchParams {
        PatchParams {
            field_manager: Some(self.field_manager.clone()),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ClusterStore for KubeStore {
    async fn get_memcached(&self, namespace: &str, name: &str) -> Result<Option<Memcached>> {
        let api: Api<Memcached> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.get_opt(name).await?)
    }

    async fn get_deployment(&self, namespace: &str, name: &str) -> Result<Option<Deployment>> {
        let api: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.get_opt(name).await?)
    }

    async fn create_deployment(&self, deployment: &Deployment) -> Result<Deployment> {
        let namespace = namespace_of(deployment.namespace(), "Deployment")?;
        let api: Api<Deployment> = Api::namespaced(self.client.clone(), &namespace);
        api.create(&self.post_params(), deployment)
            .await
            .map_err(|e| write_error(e, "Deployment", deployment.name_any()))
    }

    async fn scale_deployment(&self, deployment: &Deployment, replicas: i32) -> Result<()> {
        let name = deployment.name_any();
        let namespace = namespace_of(deployment.namespace(), "Deployment")?;
        let api: Api<Deployment> = Api::namespaced(self.client.clone(), &namespace);

        let patch = guarded_patch(
            deployment.resource_version(),
            "spec",
            json!({ "replicas": replicas }),
        );
        api.patch(&name, &self.patch_params(), &Patch::Merge(patch))
            .await
            .map_err(|e| write_error(e, "Deployment", name.clone()))?;

        Ok(())
    }

    async fn list_pods(
        &self,
        namespace: &str,
        labels: &BTreeMap<String, String>,
    ) -> Result<Vec<Pod>> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let params = ListParams::default().labels(&label_selector(labels));
        Ok(api.list(&params).await?.items)
    }

    async fn update_memcached_status(&self, memcached: &Memcached, nodes: &[String]) -> Result<()> {
        let name = memcached.name_any();
        let namespace = namespace_of(memcached.namespace(), "Memcached")?;
        let api: Api<Memcached> = Api::namespaced(self.client.clone(), &namespace);

        let patch = guarded_patch(
            memcached.resource_version(),
            "status",
            json!({ "nodes": nodes }),
        );
        api.patch_status(&name, &self.patch_params(), &Patch::Merge(patch))
            .await
            .map_err(|e| write_error(e, "Memcached", name.clone()))?;

        Ok(())
    }
}

/// Merge patch for one top level field, pinned to a resource version
///
/// The API server rejects a merge patch whose `metadata.resourceVersion`
/// no longer matches with 409 Conflict.
fn guarded_patch(resource_version: Option<String>, field: &str, body: Value) -> Value {
    let mut patch = json!({ field: body });
    if let Some(rv) = resource_version {
        patch["metadata"] = json!({ "resourceVersion": rv });
    }
    patch
}

fn namespace_of(namespace: Option<String>, kind: &str) -> Result<String> {
    namespace.ok_or_else(|| Error::validation(format!("{} has no namespace", kind)))
}

fn write_error(err: kube::Error, kind: &'static str, name: String) -> Error {
    match err {
        kube::Error::Api(api_err) if api_err.code == 409 => Error::Conflict { kind, name },
        other => Error::Kube(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::error::ErrorResponse;

    fn api_error(code: u16) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: "the object has been modified".to_string(),
            reason: "Conflict".to_string(),
            code,
        })
    }

    #[test]
    fn patch_carries_resource_version() {
        let patch = guarded_patch(Some("42".to_string()), "spec", json!({ "replicas": 3 }));
        assert_eq!(
            patch,
            json!({
                "metadata": { "resourceVersion": "42" },
                "spec": { "replicas": 3 }
            })
        );
    }

    #[test]
    fn patch_without_version_is_unguarded() {
        let patch = guarded_patch(None, "status", json!({ "nodes": ["a"] }));
        assert_eq!(patch, json!({ "status": { "nodes": ["a"] } }));
    }

    #[test]
    fn conflict_status_maps_to_conflict() {
        let err = write_error(api_error(409), "Deployment", "cache".to_string());
        assert!(matches!(err, Error::Conflict { kind: "Deployment", .. }));
    }

    #[test]
    fn other_status_stays_kube_error() {
        let err = write_error(api_error(500), "Deployment", "cache".to_string());
        assert!(matches!(err, Error::Kube(_)));
    }
}
