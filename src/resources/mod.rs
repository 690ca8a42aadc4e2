//! Resource reconcilers.
//!
//! One module per resource type, each a deterministic mapping from declared
//! configuration to a sequence of API calls. Reconcilers hold no state of
//! their own beyond the borrowed [`crate::client::Client`]; "does the remote
//! resource exist and what shape did we last see" lives entirely in the
//! state values the host passes in and out.

pub mod branch;
pub mod connection_uri;
pub mod database;
pub mod endpoint;
pub mod project;
pub mod role;

use serde::{Deserialize, Serialize};

use crate::api::Endpoint;
use crate::error::ProviderError;

/// Compute-endpoint attributes as stored in branch and project state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttachedEndpoint {
    /// Identifier of the endpoint.
    #[serde(default)]
    pub id: String,
    /// Host of the endpoint.
    #[serde(default)]
    pub host: String,
    /// Minimum number of compute units.
    #[serde(default)]
    pub min_cu: f64,
    /// Maximum number of compute units.
    #[serde(default)]
    pub max_cu: f64,
    /// Provisioner backing the endpoint.
    #[serde(default)]
    pub compute_provisioner: String,
    /// Suspend timeout of the endpoint, in seconds.
    #[serde(default)]
    pub suspend_timeout: i64,
}

impl From<&Endpoint> for AttachedEndpoint {
    fn from(endpoint: &Endpoint) -> Self {
        Self {
            id: endpoint.id.clone(),
            host: endpoint.host.clone(),
            min_cu: endpoint.autoscaling_limit_min_cu,
            max_cu: endpoint.autoscaling_limit_max_cu,
            compute_provisioner: endpoint.provisioner.clone(),
            suspend_timeout: endpoint.suspend_timeout_seconds,
        }
    }
}

/// Split a colon-delimited import identifier into exactly `segments`
/// non-empty parts.
pub(crate) fn split_import_id<'a>(
    id: &'a str,
    segments: usize,
    format: &str,
) -> Result<Vec<&'a str>, ProviderError> {
    let parts: Vec<&str> = id.split(':').collect();

    if parts.len() != segments || parts.iter().any(|p| p.is_empty()) {
        return Err(ProviderError::Configuration(format!(
            "Expected import identifier with format: {}. Got: {:?}",
            format, id
        )));
    }

    Ok(parts)
}

/// Check the autoscaling invariant shared by every endpoint shape.
pub(crate) fn ensure_cu_range(min_cu: f64, max_cu: f64) -> Result<(), ProviderError> {
    if min_cu > max_cu {
        return Err(ProviderError::Configuration(format!(
            "min_cu ({}) must not exceed max_cu ({})",
            min_cu, max_cu
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_two_segments() {
        let parts = split_import_id("cool-project:br-quiet-sea", 2, "project_id:branch_id").unwrap();
        assert_eq!(parts, vec!["cool-project", "br-quiet-sea"]);
    }

    #[test]
    fn test_split_three_segments() {
        let parts =
            split_import_id("a:b:mydb", 3, "project_id:branch_id:name").unwrap();
        assert_eq!(parts, vec!["a", "b", "mydb"]);
    }

    #[test]
    fn test_split_wrong_count() {
        assert!(split_import_id("only-one", 2, "project_id:branch_id").is_err());
        assert!(split_import_id("a:b:c", 2, "project_id:branch_id").is_err());
        assert!(split_import_id("a:b", 3, "project_id:branch_id:name").is_err());
    }

    #[test]
    fn test_split_empty_segment() {
        let err = split_import_id("a::c", 3, "project_id:branch_id:name").unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
        assert!(format!("{}", err).contains("project_id:branch_id:name"));

        assert!(split_import_id(":b", 2, "project_id:branch_id").is_err());
        assert!(split_import_id("a:", 2, "project_id:branch_id").is_err());
    }

    #[test]
    fn test_cu_range() {
        assert!(ensure_cu_range(0.25, 0.25).is_ok());
        assert!(ensure_cu_range(0.25, 2.0).is_ok());
        assert!(ensure_cu_range(2.0, 0.25).is_err());
    }
}
