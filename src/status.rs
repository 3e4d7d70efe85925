//! Status synchronizer
//!
//! Computes the set of running members of a Memcached and decides whether
//! the published `status.nodes` is stale.

use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;

use crate::crd::Memcached;
use crate::error::{Error, Result};
use crate::resources::labels_for;
use crate::store::ClusterStore;

/// List the pods belonging to a Memcached, sorted by name
pub async fn observe_members(store: &dyn ClusterStore, memcached: &Memcached) -> Result<Vec<String>> {
    let namespace = memcached
        .namespace()
        .ok_or_else(|| Error::validation("Memcached has no namespace"))?;
    let pods = store
        .list_pods(&namespace, &labels_for(&memcached.name_any()))
        .await?;

    let mut names = pod_names(&pods);
    names.sort();
    Ok(names)
}

/// Names of the given pods, skipping unnamed ones
pub fn pod_names(pods: &[Pod]) -> Vec<String> {
    pods.iter()
        .filter_map(|pod| pod.metadata.name.clone())
        .collect()
}

/// Whether the stored node list differs from the observed one
///
/// Both sides are compared as sorted sequences; the order persisted in
/// status is not stable across writes.
pub fn needs_update(observed: &[String], stored: &[String]) -> bool {
    sorted(observed) != sorted(stored)
}

fn sorted(names: &[String]) -> Vec<&str> {
    let mut names: Vec<&str> = names.iter().map(String::as_str).collect();
    names.sort_unstable();
    names
}
