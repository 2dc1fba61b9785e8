//! Managed clusters client abstraction
//!
//! The reconciler only talks to the provider through this trait, so tests can
//! mock the control plane while production wires in an SDK-backed client.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

#[cfg(test)]
use mockall::automock;

use aks_common::ClientError;

use crate::resource::ManagedCluster;

/// Trait abstracting the provider's managed cluster operations
///
/// Every method receives the caller's cancellation token unchanged and must
/// return `ClientError::Cancelled` once it fires. `NotFound` must be reported
/// as `ClientError::NotFound`, not folded into a generic request failure.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ManagedClustersClient: Send + Sync {
    /// Fetch a managed cluster
    async fn get(
        &self,
        cancel: &CancellationToken,
        resource_group: &str,
        name: &str,
    ) -> Result<ManagedCluster, ClientError>;

    /// Create or replace a managed cluster
    ///
    /// Returns once the provider has accepted the request; provisioning
    /// continues asynchronously and shows up in `provisioning_state`.
    async fn create_or_update(
        &self,
        cancel: &CancellationToken,
        resource_group: &str,
        name: &str,
        cluster: &ManagedCluster,
    ) -> Result<(), ClientError>;

    /// Delete a managed cluster
    async fn delete(
        &self,
        cancel: &CancellationToken,
        resource_group: &str,
        name: &str,
    ) -> Result<(), ClientError>;

    /// Fetch the cluster's kubeconfig
    async fn get_credentials(
        &self,
        cancel: &CancellationToken,
        resource_group: &str,
        name: &str,
    ) -> Result<Vec<u8>, ClientError>;
}
