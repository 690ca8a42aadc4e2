//! Error types for the provider core.

use thiserror::Error;

/// Errors that can occur while reconciling resources against the
/// control-plane API.
///
/// Every remote failure is fatal to the operation that raised it: there is
/// no retry policy and no compensating rollback anywhere in this crate. The
/// only loop that re-issues a request is the operation poller, and it
/// terminates with [`ProviderError::DeadlineExceeded`].
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider or a resource was misconfigured. Raised before any
    /// network call is made (missing API token, malformed import
    /// identifier, invalid attribute combination).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The request never produced an HTTP response (DNS, connection,
    /// TLS). Propagated verbatim from the transport.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The control plane answered with a non-success status. Carries the
    /// status code and the raw response body so callers can decide how to
    /// present it; `Display` flattens both into one line for diagnostics.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Raw response body, typically the platform's JSON error payload.
        body: String,
    },

    /// The response body was not the JSON shape the caller expected.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The remote answered successfully but with data that contradicts the
    /// request, e.g. a branch whose `project_id` differs from the project
    /// it was fetched under.
    #[error("Consistency error: {0}")]
    Consistency(String),

    /// The operation poller gave up waiting for the project's most recent
    /// operation to finish.
    #[error("Deadline exceeded: {0}")]
    DeadlineExceeded(String),

    /// The requested resource or data source type is not registered with
    /// this provider.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),
}

impl ProviderError {
    /// The HTTP status code, when the error came from a control-plane
    /// response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this error is the control plane reporting a missing
    /// resource. Hosts typically treat this as "remove from state" rather
    /// than a hard failure.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
