//! Desired-state builders for resources owned by a Memcached
//!
//! Everything here is pure: the same Memcached always yields the same
//! labels and the same Deployment, which the reconciler relies on to find
//! the child workload and its pods on every pass.

mod deployment;

pub use deployment::{
    build_deployment, labels_for, CONTAINER_COMMAND, CONTAINER_IMAGE, CONTAINER_NAME,
    CONTAINER_PORT, LABEL_APP, LABEL_CLUSTER,
};
