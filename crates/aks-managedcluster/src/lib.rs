//! Managed cluster reconciliation for Azure Kubernetes Service
//!
//! This crate provides:
//! - `ManagedClusterSpec`, the desired state a controller hands in on every call
//! - A builder that turns the spec into the complete provider resource
//! - `ManagedClustersClient`, the provider client seam (mocked in tests)
//! - `ManagedClusterService`, which decides between no-op, create and update
//!   and never mutates a cluster that is mid-operation

#![deny(missing_docs)]

pub mod builder;
pub mod client;
pub mod constants;
pub mod diff;
pub mod resource;
pub mod service;
pub mod spec;

pub use builder::{build_managed_cluster, derive_dns_service_ip, ProfileDefaults};
pub use client::ManagedClustersClient;
pub use diff::{normalized_diff, FieldChange};
pub use resource::{ManagedCluster, ProvisioningState};
pub use service::{ManagedClusterService, ReconcileOutcome};
pub use spec::{ManagedClusterSpec, PoolSpec};

#[cfg(test)]
pub use client::MockManagedClustersClient;

// Re-export common error types
pub use aks_common::{ClientError, Error, Result};
