//! Memcached controller
//!
//! Watches Memcached resources and the Deployments they own, and triggers
//! reconciliation for the owning Memcached on any change.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use k8s_openapi::api::apps::v1::Deployment;
use kube::{
    api::ListParams,
    runtime::{
        controller::{Action, Controller},
        watcher::Config as WatcherConfig,
    },
    Api, ResourceExt,
};
use tracing::{error, info, instrument};

use crate::controllers::Context;
use crate::crd::Memcached;
use crate::error::{Error, Result};
use crate::metrics;
use crate::reconcilers::Outcome;

/// Run the Memcached controller
pub async fn run(context: Arc<Context>) {
    let client = context.client.clone();
    let (memcacheds, deployments): (Api<Memcached>, Api<Deployment>) =
        match &context.config.watch_namespace {
            Some(ns) => (
                Api::namespaced(client.clone(), ns),
                Api::namespaced(client.clone(), ns),
            ),
            None => (Api::all(client.clone()), Api::all(client)),
        };

    // Verify CRD is installed
    if let Err(e) = memcacheds.list(&ListParams::default().limit(1)).await {
        error!("Memcached CRD not installed: {}", e);
        return;
    }

    info!(
        namespace = context.config.watch_namespace.as_deref().unwrap_or("*"),
        "Starting Memcached controller"
    );

    Controller::new(memcacheds, WatcherConfig::default())
        .owns(deployments, WatcherConfig::default())
        .shutdown_on_signal()
        .run(reconcile, error_policy, context)
        .for_each(|result| async move {
            match result {
                Ok((obj, _action)) => {
                    info!(
                        name = %obj.name,
                        namespace = obj.namespace.as_deref().unwrap_or("default"),
                        "Reconciled Memcached"
                    );
                }
                Err(e) => {
                    error!(error = %e, "Reconciliation error");
                }
            }
        })
        .await;
}

/// Main reconciliation function
#[instrument(skip(ctx), fields(name = %obj.name_any(), namespace = obj.namespace()))]
async fn reconcile(obj: Arc<Memcached>, ctx: Arc<Context>) -> Result<Action> {
    let _timer = metrics::RECONCILE_DURATION.start_timer();
    metrics::RECONCILIATIONS.inc();

    let name = obj.name_any();
    let namespace = obj.namespace().unwrap_or_else(|| "default".to_string());

    // The watch cache may lag; the reconciler re-reads from the API server
    let outcome = ctx.reconciler.reconcile(&namespace, &name).await?;

    record_outcome(&namespace, &name, &outcome);

    Ok(outcome.action())
}

/// Export what a successful pass did
///
/// A deleted Memcached drops its member gauge so the series does not
/// outlive the cluster.
fn record_outcome(namespace: &str, name: &str, outcome: &Outcome) {
    metrics::ACTIONS.with_label_values(&[outcome.label()]).inc();

    if let Some(members) = outcome.members() {
        metrics::OBSERVED_MEMBERS
            .with_label_values(&[namespace, name])
            .set(members as f64);
    } else if *outcome == Outcome::Absent {
        // Not found when no pass ever observed members
        let _ = metrics::OBSERVED_MEMBERS.remove_label_values(&[namespace, name]);
    }
}

/// Error policy for the controller
pub fn error_policy(obj: Arc<Memcached>, error: &Error, _ctx: Arc<Context>) -> Action {
    let name = obj.name_any();
    error!(
        name = %name,
        error = %error,
        retryable = error.is_retryable(),
        "Reconciliation failed, scheduling retry"
    );
    metrics::RECONCILIATION_ERRORS
        .with_label_values(&[error.kind()])
        .inc();

    Action::requeue(requeue_after(error))
}

/// Backoff before retrying a failed pass
pub fn requeue_after(error: &Error) -> Duration {
    match error {
        Error::Conflict { .. } => Duration::from_secs(1),
        Error::Timeout(_) => Duration::from_secs(5),
        Error::Kube(_) => Duration::from_secs(30),
        Error::OwnerReference(_) | Error::Validation(_) => Duration::from_secs(300),
        _ => Duration::from_secs(30),
    }
}
