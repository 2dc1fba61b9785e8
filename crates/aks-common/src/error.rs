//! Error types for managed cluster reconciliation
//!
//! Errors carry the cluster and resource group they concern so a controller
//! can report them without re-deriving context. Provider client failures are
//! chained as `source` so the original cause is never lost.

use thiserror::Error;

/// Default context value when no specific context is available
pub const UNKNOWN_CONTEXT: &str = "unknown";

/// Failure reported by the cloud provider client
///
/// The reconciler branches on `NotFound` (create on reconcile, success on
/// delete) and never treats `Cancelled` as anything other than a failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The addressed resource does not exist
    #[error("resource {name} not found in resource group {resource_group}")]
    NotFound {
        /// Resource group that was searched
        resource_group: String,
        /// Name of the missing resource
        name: String,
    },

    /// The caller cancelled the request before it completed
    #[error("request cancelled")]
    Cancelled,

    /// Any other failure from the provider control plane
    #[error("request failed{}: {message}", .status.map(|s| format!(" with status {s}")).unwrap_or_default())]
    Request {
        /// HTTP status returned by the provider, if a response was received
        status: Option<u16>,
        /// Provider-supplied description of the failure
        message: String,
    },
}

impl ClientError {
    /// Create a not-found error for the given resource
    pub fn not_found(resource_group: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            resource_group: resource_group.into(),
            name: name.into(),
        }
    }

    /// Create a request failure without a status code (e.g. transport error)
    pub fn request(msg: impl Into<String>) -> Self {
        Self::Request {
            status: None,
            message: msg.into(),
        }
    }

    /// Create a request failure with the status code the provider returned
    pub fn request_with_status(status: u16, msg: impl Into<String>) -> Self {
        Self::Request {
            status: Some(status),
            message: msg.into(),
        }
    }

    /// Returns true if the provider reported the resource as absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Main error type for managed cluster operations
#[derive(Debug, Error)]
pub enum Error {
    /// Input to an entry point is malformed (caller bug)
    #[error("invalid input for {cluster}: {message}")]
    InvalidInput {
        /// Name of the cluster the input describes
        cluster: String,
        /// Description of what's invalid
        message: String,
    },

    /// A spec field cannot be turned into a provider value
    #[error("invalid spec for {cluster}: {field}: {message}")]
    InvalidSpec {
        /// Name of the cluster with the invalid spec
        cluster: String,
        /// The offending field (e.g., "serviceCidr")
        field: String,
        /// Description of what's invalid
        message: String,
    },

    /// The existing resource is mid-transition and must not be mutated
    #[error(
        "unable to update managed cluster {cluster} in non-terminal state: \
         provisioning state must be one of Canceled, Failed or Succeeded, actual state: {state}"
    )]
    Blocked {
        /// Name of the blocked cluster
        cluster: String,
        /// Provisioning state observed on the provider
        state: String,
    },

    /// A provider client call failed
    #[error("{message}: {source}")]
    Provider {
        /// Name of the cluster the call was for
        cluster: String,
        /// Resource group the call was for
        resource_group: String,
        /// Action-specific description (e.g., "failed to create managed cluster")
        message: String,
        /// The underlying client failure
        #[source]
        source: ClientError,
    },

    /// The operation was cancelled by the caller
    #[error("operation on {cluster} cancelled")]
    Cancelled {
        /// Name of the cluster the cancelled operation was for
        cluster: String,
    },
}

impl Error {
    /// Create an invalid-input error without cluster context
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            cluster: UNKNOWN_CONTEXT.to_string(),
            message: msg.into(),
        }
    }

    /// Create an invalid-input error for a cluster
    pub fn invalid_input_for(cluster: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            cluster: cluster.into(),
            message: msg.into(),
        }
    }

    /// Create an invalid-spec error for a cluster field
    pub fn invalid_spec_for_field(
        cluster: impl Into<String>,
        field: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::InvalidSpec {
            cluster: cluster.into(),
            field: field.into(),
            message: msg.into(),
        }
    }

    /// Create a blocked error carrying the observed provisioning state
    pub fn blocked(cluster: impl Into<String>, state: impl Into<String>) -> Self {
        Self::Blocked {
            cluster: cluster.into(),
            state: state.into(),
        }
    }

    /// Wrap a client failure with the action that was being attempted
    ///
    /// A cancelled client call becomes `Error::Cancelled` rather than a
    /// provider failure so callers can tell shutdown apart from outages.
    pub fn provider_for(
        cluster: impl Into<String>,
        resource_group: impl Into<String>,
        msg: impl Into<String>,
        source: ClientError,
    ) -> Self {
        if source == ClientError::Cancelled {
            return Self::Cancelled {
                cluster: cluster.into(),
            };
        }
        Self::Provider {
            cluster: cluster.into(),
            resource_group: resource_group.into(),
            message: msg.into(),
            source,
        }
    }

    /// Check if re-invoking the operation later may succeed without a spec change
    ///
    /// Input and spec errors need the caller to fix the spec. Blocked
    /// resources settle on their own; provider failures may be transient.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::InvalidInput { .. } => false,
            Error::InvalidSpec { .. } => false,
            Error::Blocked { .. } => true,
            Error::Provider { .. } => true,
            Error::Cancelled { .. } => true,
        }
    }

    /// Returns true if this wraps a provider not-found response
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Provider { source, .. } if source.is_not_found())
    }

    /// Get the cluster name this error is associated with
    pub fn cluster(&self) -> &str {
        match self {
            Error::InvalidInput { cluster, .. } => cluster,
            Error::InvalidSpec { cluster, .. } => cluster,
            Error::Blocked { cluster, .. } => cluster,
            Error::Provider { cluster, .. } => cluster,
            Error::Cancelled { cluster } => cluster,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn provider_errors_chain_the_client_failure() {
        let err = Error::provider_for(
            "prod",
            "rg-prod",
            "failed to create managed cluster",
            ClientError::request_with_status(500, "internal server error"),
        );

        let msg = err.to_string();
        assert!(msg.starts_with("failed to create managed cluster"));
        assert!(msg.contains("status 500"));
        assert!(msg.contains("internal server error"));

        let source = err.source().expect("provider error should have a source");
        assert!(source.to_string().contains("internal server error"));
        assert_eq!(err.cluster(), "prod");
    }

    #[test]
    fn cancelled_client_call_is_not_a_provider_failure() {
        let err = Error::provider_for("prod", "rg", "failed to update", ClientError::Cancelled);
        assert!(matches!(err, Error::Cancelled { ref cluster } if cluster == "prod"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn not_found_is_detected_through_wrapping() {
        let err = Error::provider_for(
            "c1",
            "rg",
            "failed to get managed cluster",
            ClientError::not_found("rg", "c1"),
        );
        assert!(err.is_not_found());

        let err = Error::provider_for("c1", "rg", "failed", ClientError::request("timeout"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn blocked_error_reports_observed_state() {
        let err = Error::blocked("c1", "Updating");
        let msg = err.to_string();
        assert!(msg.contains("non-terminal state"));
        assert!(msg.contains("actual state: Updating"));
        assert!(err.is_retryable());
    }

    #[test]
    fn spec_errors_are_not_retryable() {
        let err = Error::invalid_spec_for_field("c1", "serviceCidr", "invalid CIDR address");
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("serviceCidr"));

        let err = Error::invalid_input("name must not be empty");
        assert!(!err.is_retryable());
        assert_eq!(err.cluster(), UNKNOWN_CONTEXT);
    }

    #[test]
    fn request_error_without_status_omits_it() {
        let err = ClientError::request("connection reset");
        assert_eq!(err.to_string(), "request failed: connection reset");
    }
}
