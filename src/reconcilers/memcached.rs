//! Memcached reconciler
//!
//! One pass reads the Memcached and its Deployment, then issues at most one
//! write and returns:
//!
//! 1. Memcached gone: nothing to do, the Deployment is garbage collected
//!    through its owner reference.
//! 2. Deployment missing: create it.
//! 3. Replica count drifted: scale it.
//! 4. Otherwise: refresh `status.nodes` if the running pods changed.
//!
//! Writes in steps 2 and 3 produce a Deployment event that triggers the
//! next pass, so convergence spans several short passes instead of one
//! looping pass.

use std::sync::Arc;
use std::time::Duration;

use kube::runtime::controller::Action;
use kube::ResourceExt;
use tracing::{debug, info, instrument};

use crate::error::{Error, Result};
use crate::resources::build_deployment;
use crate::status::{needs_update, observe_members};
use crate::store::ClusterStore;

/// What a single pass did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The Memcached no longer exists
    Absent,
    /// The Deployment was created with this many replicas
    Created { replicas: i32 },
    /// The Deployment replica count was corrected
    Scaled { from: Option<i32>, to: i32 },
    /// `status.nodes` was replaced with these names
    StatusUpdated { nodes: Vec<String> },
    /// Nothing to change
    InSync { members: usize },
}

impl Outcome {
    /// Requeue policy after a successful pass
    ///
    /// Every write emits a watch event of its own, so no pass asks to be
    /// requeued.
    pub fn action(&self) -> Action {
        Action::await_change()
    }

    /// Short label used for metrics
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Absent => "absent",
            Outcome::Created { .. } => "create",
            Outcome::Scaled { .. } => "scale",
            Outcome::StatusUpdated { .. } => "status",
            Outcome::InSync { .. } => "noop",
        }
    }

    /// Number of running members seen by the pass, when it got that far
    pub fn members(&self) -> Option<usize> {
        match self {
            Outcome::StatusUpdated { nodes } => Some(nodes.len()),
            Outcome::InSync { members } => Some(*members),
            _ => None,
        }
    }
}

/// Convergence engine for Memcached resources
///
/// Holds no state between passes; every decision is made from a fresh read
/// of the store.
#[derive(Clone)]
pub struct Reconciler {
    store: Arc<dyn ClusterStore>,
    timeout: Duration,
}

impl Reconciler {
    /// Create a reconciler over a store with a per-pass deadline
    pub fn new(store: Arc<dyn ClusterStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Run one pass for the Memcached `namespace/name`
    ///
    /// A pass cut short by the deadline leaves the store as of its last
    /// completed call and returns [`Error::Timeout`].
    #[instrument(skip(self))]
    pub async fn reconcile(&self, namespace: &str, name: &str) -> Result<Outcome> {
        tokio::time::timeout(self.timeout, self.converge(namespace, name))
            .await
            .map_err(|_| Error::Timeout(self.timeout))?
    }

    async fn converge(&self, namespace: &str, name: &str) -> Result<Outcome> {
        let Some(memcached) = self.store.get_memcached(namespace, name).await? else {
            debug!("Memcached not found, assuming deleted");
            return Ok(Outcome::Absent);
        };
        memcached.validate()?;

        let desired = memcached.spec.size;

        let Some(deployment) = self.store.get_deployment(namespace, name).await? else {
            let deployment = build_deployment(&memcached)?;
            info!(replicas = desired, "Creating Deployment");
            self.store.create_deployment(&deployment).await?;
            return Ok(Outcome::Created { replicas: desired });
        };

        let current = deployment.spec.as_ref().and_then(|s| s.replicas);
        if current != Some(desired) {
            info!(
                current = ?current,
                desired = desired,
                "Replica count drifted, scaling Deployment"
            );
            self.store.scale_deployment(&deployment, desired).await?;
            return Ok(Outcome::Scaled {
                from: current,
                to: desired,
            });
        }

        let observed = observe_members(self.store.as_ref(), &memcached).await?;
        if needs_update(&observed, memcached.nodes()) {
            info!(nodes = ?observed, "Updating Memcached status");
            self.store
                .update_memcached_status(&memcached, &observed)
                .await?;
            return Ok(Outcome::StatusUpdated { nodes: observed });
        }

        debug!(
            name = %memcached.name_any(),
            members = observed.len(),
            "Memcached in sync"
        );
        Ok(Outcome::InSync {
            members: observed.len(),
        })
    }
}
