//! Desired managed cluster construction
//!
//! Maps a [`ManagedClusterSpec`] onto the complete [`ManagedCluster`] the
//! provider expects, filling in the fixed identity policy, the admin profile
//! and the computed DNS service IP.

use std::net::IpAddr;

use serde::Deserialize;

use aks_common::{Error, Result};

use crate::constants::{
    DEFAULT_ADMIN_USERNAME, DNS_SERVICE_IP_LAST_OCTET, MANAGED_IDENTITY_CLIENT_ID,
};
use crate::resource::{
    AgentPoolMode, AgentPoolProfile, AgentPoolType, LinuxProfile, ManagedCluster,
    ManagedClusterIdentity, ManagedClusterProperties, NetworkProfile, ResourceIdentityType,
    ServicePrincipalProfile, SshConfiguration, SshPublicKey,
};
use crate::spec::ManagedClusterSpec;

/// Fixed values written into every cluster the builder produces
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileDefaults {
    /// Linux admin username
    pub admin_username: String,
    /// Service principal client ID signalling managed identity
    pub service_principal_client_id: String,
}

impl Default for ProfileDefaults {
    fn default() -> Self {
        Self {
            admin_username: DEFAULT_ADMIN_USERNAME.to_string(),
            service_principal_client_id: MANAGED_IDENTITY_CLIENT_ID.to_string(),
        }
    }
}

/// Build the desired provider resource for a spec
///
/// Pure; fails only when `service_cidr` needs a derived DNS IP and does not
/// parse as a CIDR block.
pub fn build_managed_cluster(
    spec: &ManagedClusterSpec,
    defaults: &ProfileDefaults,
) -> Result<ManagedCluster> {
    let public_keys = if spec.ssh_public_key.is_empty() {
        Vec::new()
    } else {
        vec![SshPublicKey {
            key_data: spec.ssh_public_key.clone(),
        }]
    };

    let agent_pool_profiles = spec
        .agent_pools
        .iter()
        .map(|pool| AgentPoolProfile {
            name: pool.name.clone(),
            vm_size: pool.sku.clone(),
            os_disk_size_gb: pool.os_disk_size_gb,
            count: pool.replicas,
            type_: AgentPoolType::VirtualMachineScaleSets,
            vnet_subnet_id: spec.vnet_subnet_id.clone(),
            mode: AgentPoolMode::System,
        })
        .collect();

    Ok(ManagedCluster {
        location: spec.location.clone(),
        tags: spec.tags.clone(),
        identity: Some(ManagedClusterIdentity {
            type_: ResourceIdentityType::SystemAssigned,
        }),
        properties: ManagedClusterProperties {
            provisioning_state: None,
            kubernetes_version: Some(spec.version.clone()),
            dns_prefix: Some(spec.name.clone()),
            node_resource_group: Some(spec.node_resource_group_name.clone()),
            linux_profile: Some(LinuxProfile {
                admin_username: defaults.admin_username.clone(),
                ssh: SshConfiguration { public_keys },
            }),
            service_principal_profile: Some(ServicePrincipalProfile {
                client_id: defaults.service_principal_client_id.clone(),
            }),
            agent_pool_profiles,
            network_profile: Some(build_network_profile(spec)?),
        },
    })
}

fn build_network_profile(spec: &ManagedClusterSpec) -> Result<NetworkProfile> {
    let mut profile = NetworkProfile {
        network_plugin: spec.network_plugin.clone(),
        network_policy: spec.network_policy.clone(),
        load_balancer_sku: spec.load_balancer_sku.clone(),
        ..Default::default()
    };

    if !spec.pod_cidr.is_empty() {
        profile.pod_cidr = Some(spec.pod_cidr.clone());
    }

    if !spec.service_cidr.is_empty() {
        let dns_service_ip = match &spec.dns_service_ip {
            Some(ip) => ip.clone(),
            None => derive_dns_service_ip(&spec.service_cidr).map_err(|message| {
                Error::invalid_spec_for_field(&spec.name, "serviceCidr", message)
            })?,
        };
        profile.service_cidr = Some(spec.service_cidr.clone());
        profile.dns_service_ip = Some(dns_service_ip);
    }

    Ok(profile)
}

/// Derive the DNS service IP for a service CIDR
///
/// Masks the address down to the network base and sets its last octet to 10,
/// so "10.0.0.0/16" yields "10.0.0.10". The prefix length is not checked: for
/// prefixes longer than /24 the result may fall outside the block, and callers
/// must pass an explicit DNS service IP instead.
pub fn derive_dns_service_ip(service_cidr: &str) -> std::result::Result<String, String> {
    let (addr, prefix) = service_cidr
        .split_once('/')
        .ok_or_else(|| format!("invalid CIDR address: {service_cidr}"))?;

    let addr: IpAddr = addr
        .parse()
        .map_err(|_| format!("invalid CIDR address: {service_cidr}"))?;
    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid CIDR address: {service_cidr}"));
    }
    let prefix: u8 = prefix
        .parse()
        .map_err(|_| format!("invalid CIDR address: {service_cidr}"))?;

    let dns_ip = match addr {
        IpAddr::V4(v4) => {
            if prefix > 32 {
                return Err(format!("invalid CIDR address: {service_cidr}"));
            }
            let mask = u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0);
            let mut octets = (u32::from(v4) & mask).to_be_bytes();
            octets[3] = DNS_SERVICE_IP_LAST_OCTET;
            IpAddr::from(octets)
        }
        IpAddr::V6(v6) => {
            if prefix > 128 {
                return Err(format!("invalid CIDR address: {service_cidr}"));
            }
            let mask = u128::MAX.checked_shl(128 - u32::from(prefix)).unwrap_or(0);
            let mut octets = (u128::from(v6) & mask).to_be_bytes();
            octets[15] = DNS_SERVICE_IP_LAST_OCTET;
            IpAddr::from(octets)
        }
    };

    Ok(dns_ip.to_string())
}
