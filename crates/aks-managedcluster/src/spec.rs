//! Desired-state specification for a managed cluster
//!
//! These types are what a controller hands to the reconciler on every call.
//! They derive `JsonSchema` so they can be embedded in a custom resource spec.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use aks_common::Error;

/// Properties to create or update a managed cluster
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ManagedClusterSpec {
    /// Name of the managed cluster; also used as its DNS prefix
    pub name: String,

    /// Resource group that holds the managed cluster
    pub resource_group_name: String,

    /// Resource group the provider creates for node VMs
    pub node_resource_group_name: String,

    /// Resource ID of the subnet every agent pool joins
    pub vnet_subnet_id: String,

    /// Canonical region name (e.g., "westus2", "eastus")
    pub location: String,

    /// Tags applied to the managed cluster resource
    #[serde(default)]
    pub tags: BTreeMap<String, String>,

    /// Desired Kubernetes version
    pub version: String,

    /// Load balancer SKU ("Standard" or "Basic"), passed through unchanged
    #[serde(default)]
    pub load_balancer_sku: String,

    /// Network plugin ("azure" or "kubenet"), passed through unchanged
    #[serde(default)]
    pub network_plugin: String,

    /// Network policy ("azure" or "calico"), passed through unchanged
    #[serde(default)]
    pub network_policy: String,

    /// SSH public key for the admin user; empty means no key is installed
    #[serde(default)]
    pub ssh_public_key: String,

    /// Agent pools, in the order they are submitted to the provider
    #[serde(default)]
    pub agent_pools: Vec<PoolSpec>,

    /// CIDR block for pod IPs; empty leaves the provider default
    #[serde(default)]
    pub pod_cidr: String,

    /// CIDR block for service IPs; empty leaves the provider default
    #[serde(default)]
    pub service_cidr: String,

    /// Explicit DNS service IP; derived from `service_cidr` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_service_ip: Option<String>,
}

/// Agent pool specification
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PoolSpec {
    /// Pool name
    pub name: String,

    /// VM size for the pool's nodes (e.g., "Standard_D2s_v3")
    pub sku: String,

    /// Number of nodes
    pub replicas: i32,

    /// OS disk size per node in GB
    #[serde(rename = "osDiskSizeGB")]
    pub os_disk_size_gb: i32,
}

impl ManagedClusterSpec {
    /// Check the fields the builder assumes are present
    ///
    /// Controllers run this before handing the spec to the reconciler; the
    /// builder itself does not validate.
    pub fn validate(&self) -> Result<(), Error> {
        if self.name.is_empty() {
            return Err(Error::invalid_input("name must not be empty"));
        }
        let cluster = self.name.as_str();

        let required = [
            ("resourceGroupName", &self.resource_group_name),
            ("nodeResourceGroupName", &self.node_resource_group_name),
            ("vnetSubnetId", &self.vnet_subnet_id),
            ("location", &self.location),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(Error::invalid_input_for(
                    cluster,
                    format!("{field} must not be empty"),
                ));
            }
        }

        for pool in &self.agent_pools {
            if pool.replicas < 0 {
                return Err(Error::invalid_input_for(
                    cluster,
                    format!("agent pool {} has negative replicas", pool.name),
                ));
            }
            if pool.os_disk_size_gb <= 0 {
                return Err(Error::invalid_input_for(
                    cluster,
                    format!("agent pool {} must have a positive OS disk size", pool.name),
                ));
            }
        }

        Ok(())
    }
}
