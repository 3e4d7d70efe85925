//! Custom Resource Definitions for the Memcached Operator

mod memcached;

pub use memcached::*;

use kube::CustomResourceExt;

use crate::error::Result;

/// Generate all CRD YAML manifests
pub fn generate_crds() -> Result<Vec<String>> {
    Ok(vec![serde_yaml::to_string(&Memcached::crd())?])
}
