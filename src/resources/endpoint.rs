//! Standalone endpoint reconciler.
//!
//! Standalone endpoints are always `read_only`; a branch's single
//! read-write endpoint is managed through the branch resource.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::{
    EndpointCreateEndpoint, EndpointCreateInput, EndpointType, EndpointUpdateEndpoint,
    EndpointUpdateInput,
};
use crate::client::Client;
use crate::error::ProviderError;
use crate::resources::{ensure_cu_range, split_import_id};

fn default_cu() -> f64 {
    0.25
}

/// Declared configuration of a read-only endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointSpec {
    /// Project the endpoint belongs to.
    pub project_id: String,
    /// Branch the endpoint is attached to.
    pub branch_id: String,
    /// Minimum number of compute units.
    #[serde(default = "default_cu")]
    pub min_cu: f64,
    /// Maximum number of compute units.
    #[serde(default = "default_cu")]
    pub max_cu: f64,
    /// Suspend timeout in seconds.
    #[serde(default)]
    pub suspend_timeout: i64,
}

/// Last-known shape of a standalone endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointState {
    /// Identifier of the endpoint.
    pub id: String,
    /// Project the endpoint belongs to.
    #[serde(default)]
    pub project_id: String,
    /// Branch the endpoint is attached to.
    #[serde(default)]
    pub branch_id: String,
    /// Type of the endpoint.
    #[serde(rename = "type")]
    pub kind: EndpointType,
    /// Host of the endpoint.
    #[serde(default)]
    pub host: String,
    /// Minimum number of compute units.
    #[serde(default)]
    pub min_cu: f64,
    /// Maximum number of compute units.
    #[serde(default)]
    pub max_cu: f64,
    /// Provisioner of the endpoint.
    #[serde(default)]
    pub compute_provisioner: String,
    /// Suspend timeout in seconds.
    #[serde(default)]
    pub suspend_timeout: i64,
}

impl Default for EndpointState {
    fn default() -> Self {
        Self {
            id: String::new(),
            project_id: String::new(),
            branch_id: String::new(),
            kind: EndpointType::ReadOnly,
            host: String::new(),
            min_cu: 0.0,
            max_cu: 0.0,
            compute_provisioner: String::new(),
            suspend_timeout: 0,
        }
    }
}

impl From<&crate::api::Endpoint> for EndpointState {
    fn from(endpoint: &crate::api::Endpoint) -> Self {
        Self {
            id: endpoint.id.clone(),
            project_id: endpoint.project_id.clone(),
            branch_id: endpoint.branch_id.clone(),
            kind: endpoint.kind,
            host: endpoint.host.clone(),
            min_cu: endpoint.autoscaling_limit_min_cu,
            max_cu: endpoint.autoscaling_limit_max_cu,
            compute_provisioner: endpoint.provisioner.clone(),
            suspend_timeout: endpoint.suspend_timeout_seconds,
        }
    }
}

/// Reconciles declared endpoint configuration against the control plane.
pub struct EndpointResource<'a> {
    client: &'a Client,
}

impl<'a> EndpointResource<'a> {
    /// Create a reconciler borrowing the shared client.
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Create the read-only endpoint.
    pub async fn create(&self, spec: &EndpointSpec) -> Result<EndpointState, ProviderError> {
        ensure_cu_range(spec.min_cu, spec.max_cu)?;

        let endpoint = self
            .client
            .endpoint_create(
                &spec.project_id,
                &EndpointCreateInput {
                    endpoint: EndpointCreateEndpoint {
                        branch_id: spec.branch_id.clone(),
                        kind: EndpointType::ReadOnly,
                        autoscaling_limit_min_cu: spec.min_cu,
                        autoscaling_limit_max_cu: spec.max_cu,
                        provisioner: None,
                        suspend_timeout_seconds: spec.suspend_timeout,
                    },
                },
            )
            .await?;
        debug!(endpoint_id = %endpoint.id, "created an endpoint");

        Ok(EndpointState::from(&endpoint))
    }

    /// Refresh the endpoint.
    pub async fn read(&self, prior: &EndpointState) -> Result<EndpointState, ProviderError> {
        let endpoint = self
            .client
            .endpoint_get(&prior.project_id, &prior.id)
            .await?;
        debug!(endpoint_id = %endpoint.id, "read an endpoint");

        Ok(EndpointState::from(&endpoint))
    }

    /// Apply changed autoscaling bounds and suspend timeout.
    pub async fn update(
        &self,
        prior: &EndpointState,
        spec: &EndpointSpec,
    ) -> Result<EndpointState, ProviderError> {
        ensure_cu_range(spec.min_cu, spec.max_cu)?;

        let endpoint = self
            .client
            .endpoint_update(
                &spec.project_id,
                &prior.id,
                &EndpointUpdateInput {
                    endpoint: EndpointUpdateEndpoint {
                        autoscaling_limit_min_cu: spec.min_cu,
                        autoscaling_limit_max_cu: spec.max_cu,
                        provisioner: None,
                        suspend_timeout_seconds: spec.suspend_timeout,
                    },
                },
            )
            .await?;
        debug!(endpoint_id = %endpoint.id, "updated an endpoint");

        Ok(EndpointState::from(&endpoint))
    }

    /// Delete the endpoint.
    pub async fn delete(&self, state: &EndpointState) -> Result<(), ProviderError> {
        self.client
            .endpoint_delete(&state.project_id, &state.id)
            .await?;
        debug!(endpoint_id = %state.id, "deleted an endpoint");
        Ok(())
    }

    /// Parse an import identifier of the form `project_id:endpoint_id`.
    pub fn import_id(id: &str) -> Result<EndpointState, ProviderError> {
        let parts = split_import_id(id, 2, "project_id:endpoint_id")?;

        Ok(EndpointState {
            project_id: parts[0].to_string(),
            id: parts[1].to_string(),
            ..Default::default()
        })
    }
}
