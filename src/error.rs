//! Error types for the Memcached Operator

use std::time::Duration;

use thiserror::Error;

/// Result type alias using the operator's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Operator error types
///
/// A missing Memcached or a missing Deployment is not an error: the store
/// reports both as `None` and the reconciler handles them locally.
#[derive(Error, Debug)]
pub enum Error {
    /// Kubernetes API error (network, availability, permissions)
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    /// Optimistic concurrency check failed on write
    #[error("Conflict writing {kind} '{name}': object was modified since it was read")]
    Conflict { kind: &'static str, name: String },

    /// Reconciliation pass exceeded its deadline
    #[error("Reconciliation timed out after {0:?}")]
    Timeout(Duration),

    /// Owner reference could not be attached to the desired Deployment
    #[error("Owner reference error: {0}")]
    OwnerReference(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// YAML rendering error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Create an owner reference error
    pub fn owner_reference(msg: impl Into<String>) -> Self {
        Error::OwnerReference(msg.into())
    }

    /// Whether a fresh pass could succeed without a spec change
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Kube(_) | Error::Conflict { .. } | Error::Timeout(_) => true,
            Error::OwnerReference(_) => true,
            Error::Validation(_) | Error::Yaml(_) => false,
        }
    }

    /// Short label used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Kube(_) => "kube",
            Error::Conflict { .. } => "conflict",
            Error::Timeout(_) => "timeout",
            Error::OwnerReference(_) => "owner_reference",
            Error::Validation(_) => "validation",
            Error::Yaml(_) => "serialization",
        }
    }
}
