//! Centralized constants for the aks-managedcluster crate

// =============================================================================
// Profile Defaults
// =============================================================================

/// Administrator username written into the Linux profile of every cluster
pub const DEFAULT_ADMIN_USERNAME: &str = "azureuser";

/// Service principal client ID meaning "authenticate with the managed identity"
pub const MANAGED_IDENTITY_CLIENT_ID: &str = "msi";

// =============================================================================
// Networking
// =============================================================================

/// Value written into the last octet of the service CIDR base address to
/// derive the cluster DNS service IP
pub const DNS_SERVICE_IP_LAST_OCTET: u8 = 10;
