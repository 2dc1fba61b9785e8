//! Managed cluster reconciliation
//!
//! Observe the provider's copy of the cluster, build the desired copy from the
//! spec, and issue at most one mutating call per invocation. The service keeps
//! no state between calls; the control loop re-invokes it until the cluster
//! converges.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use aks_common::{Error, Result};

use crate::builder::{build_managed_cluster, ProfileDefaults};
use crate::client::ManagedClustersClient;
use crate::diff::normalized_diff;
use crate::resource::ManagedCluster;
use crate::spec::ManagedClusterSpec;

/// What a successful reconcile did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The existing cluster already matches the spec
    NoOp,
    /// The cluster did not exist and a create was submitted
    Created,
    /// The cluster existed with differing updatable fields and an update was submitted
    Updated,
}

/// Reconciles managed clusters against a provider client
pub struct ManagedClusterService {
    client: Arc<dyn ManagedClustersClient>,
    defaults: ProfileDefaults,
}

impl ManagedClusterService {
    /// Create a service using the standard profile defaults
    pub fn new(client: Arc<dyn ManagedClustersClient>) -> Self {
        Self::with_defaults(client, ProfileDefaults::default())
    }

    /// Create a service with custom profile defaults
    pub fn with_defaults(
        client: Arc<dyn ManagedClustersClient>,
        defaults: ProfileDefaults,
    ) -> Self {
        Self { client, defaults }
    }

    /// Fetch the provider's copy of the cluster described by `spec`
    #[instrument(
        name = "managedclusters.Service.Get",
        skip(self, cancel, spec),
        fields(cluster = %spec.name, resource_group = %spec.resource_group_name)
    )]
    pub async fn get(
        &self,
        cancel: &CancellationToken,
        spec: &ManagedClusterSpec,
    ) -> Result<ManagedCluster> {
        self.client
            .get(cancel, &spec.resource_group_name, &spec.name)
            .await
            .map_err(|e| {
                Error::provider_for(
                    &spec.name,
                    &spec.resource_group_name,
                    "failed to get managed cluster",
                    e,
                )
            })
    }

    /// Fetch the kubeconfig for a cluster
    #[instrument(
        name = "managedclusters.Service.GetCredentials",
        skip(self, cancel, group, name),
        fields(cluster = %name, resource_group = %group)
    )]
    pub async fn get_credentials(
        &self,
        cancel: &CancellationToken,
        group: &str,
        name: &str,
    ) -> Result<Vec<u8>> {
        self.client
            .get_credentials(cancel, group, name)
            .await
            .map_err(|e| {
                Error::provider_for(name, group, "failed to get managed cluster credentials", e)
            })
    }

    /// Idempotently create or update a managed cluster, if possible
    ///
    /// Returns `Error::Blocked` without touching the provider while the
    /// existing cluster is mid-operation.
    #[instrument(
        name = "managedclusters.Service.Reconcile",
        skip(self, cancel, spec),
        fields(cluster = %spec.name, resource_group = %spec.resource_group_name)
    )]
    pub async fn reconcile(
        &self,
        cancel: &CancellationToken,
        spec: &ManagedClusterSpec,
    ) -> Result<ReconcileOutcome> {
        let desired = build_managed_cluster(spec, &self.defaults)?;

        let existing = match self
            .client
            .get(cancel, &spec.resource_group_name, &spec.name)
            .await
        {
            Ok(existing) => existing,
            Err(e) if e.is_not_found() => {
                info!(
                    location = %spec.location,
                    version = %spec.version,
                    "creating managed cluster"
                );
                self.client
                    .create_or_update(cancel, &spec.resource_group_name, &spec.name, &desired)
                    .await
                    .map_err(|e| {
                        Error::provider_for(
                            &spec.name,
                            &spec.resource_group_name,
                            "failed to create managed cluster",
                            e,
                        )
                    })?;
                return Ok(ReconcileOutcome::Created);
            }
            Err(e) => {
                return Err(Error::provider_for(
                    &spec.name,
                    &spec.resource_group_name,
                    "failed to get existing managed cluster",
                    e,
                ))
            }
        };

        match &existing.properties.provisioning_state {
            Some(state) if state.is_terminal() => {}
            state => {
                let state = state.as_ref().map_or("Unknown", |s| s.as_str());
                warn!(state = %state, "managed cluster is not in a terminal provisioning state");
                return Err(Error::blocked(&spec.name, state));
            }
        }

        let changes = normalized_diff(&desired, &existing);
        if changes.is_empty() {
            debug!("managed cluster is up to date");
            return Ok(ReconcileOutcome::NoOp);
        }

        for change in &changes {
            info!(change = %change, "update required (+new -old)");
        }
        self.client
            .create_or_update(cancel, &spec.resource_group_name, &spec.name, &desired)
            .await
            .map_err(|e| {
                Error::provider_for(
                    &spec.name,
                    &spec.resource_group_name,
                    "failed to update managed cluster",
                    e,
                )
            })?;

        Ok(ReconcileOutcome::Updated)
    }

    /// Delete a managed cluster; an already-absent cluster counts as deleted
    #[instrument(
        name = "managedclusters.Service.Delete",
        skip(self, cancel, spec),
        fields(cluster = %spec.name, resource_group = %spec.resource_group_name)
    )]
    pub async fn delete(
        &self,
        cancel: &CancellationToken,
        spec: &ManagedClusterSpec,
    ) -> Result<()> {
        info!("deleting managed cluster");
        match self
            .client
            .delete(cancel, &spec.resource_group_name, &spec.name)
            .await
        {
            Ok(()) => {
                info!("successfully deleted managed cluster");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                debug!("managed cluster not found (already deleted)");
                Ok(())
            }
            Err(e) => Err(Error::provider_for(
                &spec.name,
                &spec.resource_group_name,
                format!(
                    "failed to delete managed cluster {} in resource group {}",
                    spec.name, spec.resource_group_name
                ),
                e,
            )),
        }
    }
}
