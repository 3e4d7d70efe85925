//! Memcached Kubernetes Operator
//!
//! This operator keeps `Memcached` custom resources converged with an owned
//! Deployment and publishes the running pod names into the resource status.

pub mod config;
pub mod controllers;
pub mod crd;
pub mod error;
pub mod metrics;
pub mod reconcilers;
pub mod resources;
pub mod status;
pub mod store;

pub use error::{Error, Result};
