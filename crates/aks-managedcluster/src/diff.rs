//! Normalized comparison of desired and existing clusters
//!
//! Only fields that were sent in the initial create and that this crate
//! revises afterwards take part. Comparing whole objects would always differ
//! (provider-populated defaults, read-only status) and trigger an update on
//! every reconcile.

use std::fmt;

use crate::resource::ManagedCluster;

/// The updatable subset of a managed cluster
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NormalizedProperties {
    /// Kubernetes version
    pub kubernetes_version: Option<String>,
}

impl NormalizedProperties {
    /// Extract the updatable fields from a cluster
    pub fn from_cluster(cluster: &ManagedCluster) -> Self {
        Self {
            kubernetes_version: cluster.properties.kubernetes_version.clone(),
        }
    }
}

/// One differing field between desired and existing state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldChange {
    /// Provider field name, e.g. "kubernetesVersion"
    pub field: &'static str,
    /// Value the spec asks for
    pub desired: Option<String>,
    /// Value the provider currently holds
    pub existing: Option<String>,
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: +{} -{}",
            self.field,
            self.desired.as_deref().unwrap_or("<unset>"),
            self.existing.as_deref().unwrap_or("<unset>")
        )
    }
}

/// List the updatable fields whose desired value differs from the existing one
///
/// An empty result means no update call is needed.
pub fn normalized_diff(desired: &ManagedCluster, existing: &ManagedCluster) -> Vec<FieldChange> {
    let desired = NormalizedProperties::from_cluster(desired);
    let existing = NormalizedProperties::from_cluster(existing);

    let mut changes = Vec::new();
    if desired.kubernetes_version != existing.kubernetes_version {
        changes.push(FieldChange {
            field: "kubernetesVersion",
            desired: desired.kubernetes_version,
            existing: existing.kubernetes_version,
        });
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{
        AgentPoolMode, AgentPoolProfile, AgentPoolType, ManagedClusterProperties, NetworkProfile,
        ProvisioningState,
    };

    fn cluster(version: Option<&str>) -> ManagedCluster {
        ManagedCluster {
            location: "westus2".to_string(),
            properties: ManagedClusterProperties {
                kubernetes_version: version.map(String::from),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn same_version_has_no_changes() {
        assert!(normalized_diff(&cluster(Some("1.29.2")), &cluster(Some("1.29.2"))).is_empty());
    }

    #[test]
    fn version_change_is_reported() {
        let changes = normalized_diff(&cluster(Some("1.30.0")), &cluster(Some("1.29.2")));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "kubernetesVersion");
        assert_eq!(changes[0].to_string(), "kubernetesVersion: +1.30.0 -1.29.2");
    }

    #[test]
    fn missing_existing_version_is_a_change() {
        let changes = normalized_diff(&cluster(Some("1.30.0")), &cluster(None));
        assert_eq!(changes[0].to_string(), "kubernetesVersion: +1.30.0 -<unset>");
    }

    #[test]
    fn creation_only_fields_are_ignored() {
        let desired = cluster(Some("1.29.2"));
        let mut existing = cluster(Some("1.29.2"));
        existing.properties.provisioning_state = Some(ProvisioningState::Succeeded);
        existing.properties.network_profile = Some(NetworkProfile {
            network_plugin: "kubenet".to_string(),
            ..Default::default()
        });
        existing.properties.agent_pool_profiles = vec![AgentPoolProfile {
            name: "extra".to_string(),
            vm_size: "Standard_B2s".to_string(),
            os_disk_size_gb: 30,
            count: 5,
            type_: AgentPoolType::VirtualMachineScaleSets,
            vnet_subnet_id: "other".to_string(),
            mode: AgentPoolMode::User,
        }];
        existing.tags.insert("owner".to_string(), "someone".to_string());

        assert!(normalized_diff(&desired, &existing).is_empty());
    }
}
