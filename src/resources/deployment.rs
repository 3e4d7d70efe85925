//! Deployment builder
//!
//! Image, command and port are fixed; only the replica count follows the
//! Memcached spec.

use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{Container, ContainerPort, PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use kube::{Resource, ResourceExt};

use crate::crd::Memcached;
use crate::error::{Error, Result};

/// Application label key
pub const LABEL_APP: &str = "app";

/// Label key carrying the owning Memcached name
pub const LABEL_CLUSTER: &str = "memcached_cr";

/// Memcached container image
pub const CONTAINER_IMAGE: &str = "memcached:1.6.39-alpine";

/// Container and port name
pub const CONTAINER_NAME: &str = "memcached";

/// Memcached listen port
pub const CONTAINER_PORT: i32 = 11211;

/// Memcached start command
pub const CONTAINER_COMMAND: [&str; 5] = ["memcached", "--memory-limit=64", "-o", "modern", "-v"];

/// Labels selecting the pods of one Memcached
pub fn labels_for(name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        (LABEL_APP.to_string(), CONTAINER_NAME.to_string()),
        (LABEL_CLUSTER.to_string(), name.to_string()),
    ])
}

/// Build the Deployment a Memcached should own
///
/// The Deployment carries a controller owner reference back to the
/// Memcached, so it is garbage collected with it and its events are routed
/// to the owner's reconcile. Fails when the owner has no uid yet.
pub fn build_deployment(memcached: &Memcached) -> Result<Deployment> {
    let name = memcached.name_any();
    let owner = memcached.controller_owner_ref(&()).ok_or_else(|| {
        Error::owner_reference(format!(
            "Memcached '{}' has no uid, cannot own a Deployment",
            name
        ))
    })?;
    let labels = labels_for(&name);

    Ok(Deployment {
        metadata: ObjectMeta {
            name: Some(name),
            namespace: memcached.namespace(),
            labels: Some(labels.clone()),
            owner_references: Some(vec![owner]),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(memcached.spec.size),
            selector: LabelSelector {
                match_labels: Some(labels.clone()),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![memcached_container()],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    })
}

fn memcached_container() -> Container {
    Container {
        name: CONTAINER_NAME.to_string(),
        image: Some(CONTAINER_IMAGE.to_string()),
        command: Some(CONTAINER_COMMAND.iter().map(|s| s.to_string()).collect()),
        ports: Some(vec![ContainerPort {
            container_port: CONTAINER_PORT,
            name: Some(CONTAINER_NAME.to_string()),
            ..Default::default()
        }]),
        ..Default::default()
    }
}
