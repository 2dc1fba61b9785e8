//! Provider-side managed cluster resource
//!
//! Mirrors the parts of the ARM `Microsoft.ContainerService/managedClusters`
//! object this crate reads or writes. Serializes to the same JSON shape the
//! provider API accepts, with unset optional fields omitted.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A managed cluster as submitted to, or observed from, the provider
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ManagedCluster {
    /// Region the cluster lives in
    pub location: String,

    /// Resource tags
    #[serde(default)]
    pub tags: BTreeMap<String, String>,

    /// Identity the control plane runs as
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<ManagedClusterIdentity>,

    /// Cluster properties
    #[serde(default)]
    pub properties: ManagedClusterProperties,
}

/// Properties of a managed cluster
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ManagedClusterProperties {
    /// Provider-reported lifecycle phase; read-only, never sent
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<ProvisioningState>,

    /// Kubernetes version, e.g. "1.28.5"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubernetes_version: Option<String>,

    /// DNS prefix for the API server FQDN
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_prefix: Option<String>,

    /// Resource group the provider puts node infrastructure in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_resource_group: Option<String>,

    /// Node admin access
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linux_profile: Option<LinuxProfile>,

    /// Service principal credentials reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_principal_profile: Option<ServicePrincipalProfile>,

    /// Agent pools in submission order
    #[serde(default)]
    pub agent_pool_profiles: Vec<AgentPoolProfile>,

    /// Cluster networking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_profile: Option<NetworkProfile>,
}

/// Managed identity block
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ManagedClusterIdentity {
    /// Identity kind
    #[serde(rename = "type")]
    pub type_: ResourceIdentityType,
}

/// Kind of identity attached to the cluster
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum ResourceIdentityType {
    /// Identity created and owned by the cluster
    SystemAssigned,
    /// Pre-existing identity attached to the cluster
    UserAssigned,
    /// No identity
    None,
}

/// Admin access to Linux nodes
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LinuxProfile {
    /// Admin user created on every node
    pub admin_username: String,
    /// SSH keys for the admin user
    pub ssh: SshConfiguration,
}

/// SSH settings for the admin user
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SshConfiguration {
    /// Authorized public keys
    #[serde(default)]
    pub public_keys: Vec<SshPublicKey>,
}

/// A single authorized key
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SshPublicKey {
    /// Key in OpenSSH format
    pub key_data: String,
}

/// Service principal the cluster authenticates as
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServicePrincipalProfile {
    /// Client ID, or "msi" to use the managed identity
    pub client_id: String,
}

/// One agent pool as submitted to the provider
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AgentPoolProfile {
    /// Pool name, unique within the cluster
    pub name: String,
    /// VM SKU of each node
    pub vm_size: String,
    /// OS disk size per node in GB
    #[serde(rename = "osDiskSizeGB")]
    pub os_disk_size_gb: i32,
    /// Node count
    pub count: i32,
    /// Node provisioning kind
    #[serde(rename = "type")]
    pub type_: AgentPoolType,
    /// Subnet the nodes join
    #[serde(rename = "vnetSubnetID")]
    pub vnet_subnet_id: String,
    /// System or user pool
    pub mode: AgentPoolMode,
}

/// How agent pool nodes are provisioned
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum AgentPoolType {
    /// Scale set backed pool
    #[default]
    VirtualMachineScaleSets,
    /// Availability set backed pool
    AvailabilitySet,
}

/// Whether an agent pool may host system pods
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum AgentPoolMode {
    /// Hosts system pods
    #[default]
    System,
    /// Workloads only
    User,
}

/// Cluster networking
///
/// Plugin, policy and SKU are free-form strings: the provider validates them.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProfile {
    /// CNI plugin, e.g. "azure" or "kubenet"
    #[serde(default)]
    pub network_plugin: String,
    /// Network policy engine
    #[serde(default)]
    pub network_policy: String,
    /// Load balancer SKU
    #[serde(default)]
    pub load_balancer_sku: String,
    /// Pod address range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_cidr: Option<String>,
    /// Service address range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_cidr: Option<String>,
    /// Cluster DNS service address inside the service range
    #[serde(rename = "dnsServiceIP", default, skip_serializing_if = "Option::is_none")]
    pub dns_service_ip: Option<String>,
}

/// Provider-reported lifecycle phase of a managed cluster
///
/// Unknown provider values are kept verbatim in `Other` and count as
/// in-progress.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum ProvisioningState {
    /// Initial create in flight
    Creating,
    /// Update in flight
    Updating,
    /// Delete in flight
    Deleting,
    /// Last operation completed
    Succeeded,
    /// Last operation failed
    Failed,
    /// Last operation was cancelled
    Canceled,
    /// Any state the provider reports that is not listed above
    Other(String),
}

impl ProvisioningState {
    /// Returns true if no operation is in flight and the resource may be mutated
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }

    /// The state name as the provider spells it
    pub fn as_str(&self) -> &str {
        match self {
            Self::Creating => "Creating",
            Self::Updating => "Updating",
            Self::Deleting => "Deleting",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Canceled => "Canceled",
            Self::Other(s) => s,
        }
    }
}

impl FromStr for ProvisioningState {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Creating" => Self::Creating,
            "Updating" => Self::Updating,
            "Deleting" => Self::Deleting,
            "Succeeded" => Self::Succeeded,
            "Failed" => Self::Failed,
            "Canceled" => Self::Canceled,
            other => Self::Other(other.to_string()),
        })
    }
}

impl From<String> for ProvisioningState {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(state) => state,
            Err(never) => match never {},
        }
    }
}

impl From<ProvisioningState> for String {
    fn from(state: ProvisioningState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for ProvisioningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        for state in ["Succeeded", "Failed", "Canceled"] {
            assert!(state.parse::<ProvisioningState>().unwrap().is_terminal());
        }
        for state in ["Creating", "Updating", "Deleting", "Upgrading", ""] {
            assert!(!state.parse::<ProvisioningState>().unwrap().is_terminal());
        }
    }

    #[test]
    fn unknown_state_keeps_provider_text() {
        let state: ProvisioningState = "Migrating".parse().unwrap();
        assert_eq!(state, ProvisioningState::Other("Migrating".to_string()));
        assert_eq!(state.to_string(), "Migrating");
    }

    #[test]
    fn observed_cluster_deserializes_provisioning_state() {
        let cluster: ManagedCluster = serde_json::from_value(serde_json::json!({
            "location": "westus2",
            "properties": {
                "provisioningState": "Updating",
                "kubernetesVersion": "1.29.2",
                "networkProfile": {
                    "networkPlugin": "azure",
                    "serviceCidr": "10.0.0.0/16",
                    "dnsServiceIP": "10.0.0.10"
                }
            }
        }))
        .unwrap();

        assert_eq!(
            cluster.properties.provisioning_state,
            Some(ProvisioningState::Updating)
        );
        let network = cluster.properties.network_profile.unwrap();
        assert_eq!(network.dns_service_ip.as_deref(), Some("10.0.0.10"));
        assert!(network.pod_cidr.is_none());
    }

    #[test]
    fn provisioning_state_is_never_sent() {
        let cluster = ManagedCluster {
            location: "eastus".to_string(),
            properties: ManagedClusterProperties {
                provisioning_state: Some(ProvisioningState::Succeeded),
                ..Default::default()
            },
            ..Default::default()
        };

        let json = serde_json::to_value(&cluster).unwrap();
        assert!(json["properties"].get("provisioningState").is_none());
        assert!(json["properties"].get("networkProfile").is_none());
    }
}
