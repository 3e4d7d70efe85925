//! Kubernetes controllers for the Memcached CRD
//!
//! This module contains the controller implementations that watch for CRD changes
//! and trigger reconciliation.

mod memcached_controller;

pub use memcached_controller::{error_policy, requeue_after, run as run_memcached_controller};

use std::sync::Arc;

use kube::Client;

use crate::config::OperatorConfig;
use crate::reconcilers::Reconciler;
use crate::store::KubeStore;

/// Shared context for all controllers
pub struct Context {
    /// Kubernetes client
    pub client: Client,

    /// Operator configuration
    pub config: OperatorConfig,

    /// Memcached convergence engine
    pub reconciler: Reconciler,
}

impl Context {
    /// Create a new context backed by the API server
    pub fn new(client: Client, config: OperatorConfig) -> Self {
        let store = KubeStore::new(client.clone(), config.field_manager.clone());
        let reconciler = Reconciler::new(Arc::new(store), config.reconcile_timeout());
        Self {
            client,
            config,
            reconciler,
        }
    }
}
