//! Branch reconciler.
//!
//! A branch may declare a paired read-write endpoint; creating the branch
//! then provisions it in a second call. Updates diff the endpoint's
//! presence between prior state and declared configuration to decide
//! between creating, updating, or deleting it. Use the project resource to
//! manage the root branch.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::{
    provisioner_for, BranchCreateBranch, BranchCreateInput, BranchUpdateBranch, BranchUpdateInput,
    EndpointCreateEndpoint, EndpointCreateInput, EndpointType, EndpointUpdateEndpoint,
    EndpointUpdateInput,
};
use crate::client::Client;
use crate::error::ProviderError;
use crate::resources::{ensure_cu_range, split_import_id, AttachedEndpoint};

fn default_cu() -> f64 {
    0.25
}

fn default_suspend_timeout() -> i64 {
    300
}

/// Declared configuration of a branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchSpec {
    /// Project the branch belongs to.
    pub project_id: String,
    /// Name of the branch.
    pub name: String,
    /// Parent branch; defaults to the project's default branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Read-write compute endpoint paired with the branch, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<BranchEndpointSpec>,
}

/// Declared settings of a branch's paired endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchEndpointSpec {
    /// Minimum number of compute units.
    #[serde(default = "default_cu")]
    pub min_cu: f64,
    /// Maximum number of compute units.
    #[serde(default = "default_cu")]
    pub max_cu: f64,
    /// Suspend timeout in seconds.
    #[serde(default = "default_suspend_timeout")]
    pub suspend_timeout: i64,
}

impl Default for BranchEndpointSpec {
    fn default() -> Self {
        Self {
            min_cu: default_cu(),
            max_cu: default_cu(),
            suspend_timeout: default_suspend_timeout(),
        }
    }
}

/// Last-known shape of a branch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchState {
    /// Identifier of the branch.
    pub id: String,
    /// Project the branch belongs to.
    #[serde(default)]
    pub project_id: String,
    /// Name of the branch.
    #[serde(default)]
    pub name: String,
    /// Parent branch, when not the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Paired read-write endpoint, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<AttachedEndpoint>,
}

/// Reconciles declared branch configuration against the control plane.
pub struct BranchResource<'a> {
    client: &'a Client,
}

impl<'a> BranchResource<'a> {
    /// Create a reconciler borrowing the shared client.
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Create the branch, then its paired endpoint when one is declared.
    pub async fn create(&self, spec: &BranchSpec) -> Result<BranchState, ProviderError> {
        let branch = self
            .client
            .branch_create(
                &spec.project_id,
                &BranchCreateInput {
                    branch: BranchCreateBranch {
                        name: spec.name.clone(),
                        parent_id: spec.parent_id.clone(),
                    },
                },
            )
            .await?;
        debug!(branch_id = %branch.id, "created a branch");

        let mut state = BranchState {
            id: branch.id.clone(),
            project_id: branch.project_id.clone(),
            name: branch.name.clone(),
            parent_id: branch.parent_id.clone(),
            endpoint: None,
        };

        if let Some(endpoint_spec) = &spec.endpoint {
            let endpoint = self.create_endpoint(&spec.project_id, &branch.id, endpoint_spec).await?;
            state.endpoint = Some(endpoint);
        }

        Ok(state)
    }

    /// Refresh the branch and its paired read-write endpoint.
    pub async fn read(&self, prior: &BranchState) -> Result<BranchState, ProviderError> {
        let branch = self.client.branch_get(&prior.project_id, &prior.id).await?;
        debug!(branch_id = %branch.id, "read a branch");

        let endpoint = self
            .client
            .branch_endpoint(&branch.project_id, &branch.id, EndpointType::ReadWrite)
            .await?;

        Ok(BranchState {
            id: branch.id,
            project_id: branch.project_id,
            name: branch.name,
            parent_id: branch.parent_id,
            endpoint: endpoint.as_ref().map(AttachedEndpoint::from),
        })
    }

    /// Apply a rename, but only when the name actually changed (the
    /// platform rejects a no-op rename), and reconcile the paired endpoint
    /// across its four presence transitions.
    pub async fn update(
        &self,
        prior: &BranchState,
        spec: &BranchSpec,
    ) -> Result<BranchState, ProviderError> {
        let mut state = BranchState {
            id: prior.id.clone(),
            project_id: prior.project_id.clone(),
            name: prior.name.clone(),
            parent_id: prior.parent_id.clone(),
            endpoint: None,
        };

        if spec.name != prior.name {
            let branch = self
                .client
                .branch_update(
                    &spec.project_id,
                    &prior.id,
                    &BranchUpdateInput {
                        branch: BranchUpdateBranch {
                            name: Some(spec.name.clone()),
                            protected: None,
                        },
                    },
                )
                .await?;
            debug!(branch_id = %branch.id, "updated a branch");

            state.id = branch.id;
            state.project_id = branch.project_id;
            state.name = branch.name;
            state.parent_id = branch.parent_id;
        }

        state.endpoint = match (&spec.endpoint, &prior.endpoint) {
            (None, None) => None,
            (Some(endpoint_spec), None) => {
                Some(self.create_endpoint(&spec.project_id, &state.id, endpoint_spec).await?)
            }
            (Some(endpoint_spec), Some(existing)) => {
                ensure_cu_range(endpoint_spec.min_cu, endpoint_spec.max_cu)?;
                let endpoint = self
                    .client
                    .endpoint_update(
                        &spec.project_id,
                        &existing.id,
                        &EndpointUpdateInput {
                            endpoint: EndpointUpdateEndpoint {
                                autoscaling_limit_min_cu: endpoint_spec.min_cu,
                                autoscaling_limit_max_cu: endpoint_spec.max_cu,
                                provisioner: Some(
                                    provisioner_for(endpoint_spec.min_cu, endpoint_spec.max_cu)
                                        .to_string(),
                                ),
                                suspend_timeout_seconds: endpoint_spec.suspend_timeout,
                            },
                        },
                    )
                    .await?;
                debug!(endpoint_id = %endpoint.id, "updated an endpoint");
                Some(AttachedEndpoint::from(&endpoint))
            }
            (None, Some(existing)) => {
                self.client
                    .endpoint_delete(&prior.project_id, &existing.id)
                    .await?;
                debug!(endpoint_id = %existing.id, "deleted an endpoint");
                None
            }
        };

        Ok(state)
    }

    /// Delete the branch. The paired endpoint is never deleted implicitly
    /// here; dropping it from configuration first goes through
    /// [`BranchResource::update`].
    pub async fn delete(&self, state: &BranchState) -> Result<(), ProviderError> {
        self.client
            .branch_delete(&state.project_id, &state.id)
            .await?;
        debug!(branch_id = %state.id, "deleted a branch");
        Ok(())
    }

    /// Parse an import identifier of the form `project_id:branch_id`.
    pub fn import_id(id: &str) -> Result<BranchState, ProviderError> {
        let parts = split_import_id(id, 2, "project_id:branch_id")?;

        Ok(BranchState {
            project_id: parts[0].to_string(),
            id: parts[1].to_string(),
            ..Default::default()
        })
    }

    async fn create_endpoint(
        &self,
        project_id: &str,
        branch_id: &str,
        spec: &BranchEndpointSpec,
    ) -> Result<AttachedEndpoint, ProviderError> {
        ensure_cu_range(spec.min_cu, spec.max_cu)?;

        let endpoint = self
            .client
            .endpoint_create(
                project_id,
                &EndpointCreateInput {
                    endpoint: EndpointCreateEndpoint {
                        branch_id: branch_id.to_string(),
                        kind: EndpointType::ReadWrite,
                        autoscaling_limit_min_cu: spec.min_cu,
                        autoscaling_limit_max_cu: spec.max_cu,
                        provisioner: Some(provisioner_for(spec.min_cu, spec.max_cu).to_string()),
                        suspend_timeout_seconds: spec.suspend_timeout,
                    },
                },
            )
            .await?;
        debug!(endpoint_id = %endpoint.id, "created an endpoint");

        Ok(AttachedEndpoint::from(&endpoint))
    }
}
