//! Reconcilers for the Memcached CRD
//!
//! This module contains the convergence logic for each CRD type.
//! Reconcilers are responsible for:
//! - Creating the owned Deployment
//! - Correcting replica drift
//! - Publishing observed members into status

pub mod memcached;

pub use memcached::{Outcome, Reconciler};
