//! Project reconciler.
//!
//! A project is created in a single call that also provisions its root
//! branch and read-write endpoint. The platform additionally creates a
//! default database and role as a side effect; those are deleted right
//! after creation so a fresh project matches the declared empty model and
//! databases/roles are managed as explicit resources.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::{
    BranchUpdateBranch, BranchUpdateInput, DefaultEndpointSettings, EndpointType,
    EndpointUpdateEndpoint, EndpointUpdateInput, ProjectCreateBranch, ProjectCreateInput,
    ProjectCreateProject, ProjectUpdateInput, ProjectUpdateProject,
};
use crate::client::Client;
use crate::error::ProviderError;
use crate::resources::{ensure_cu_range, AttachedEndpoint};

fn default_branch_name() -> String {
    "main".to_string()
}

fn default_pg_version() -> i64 {
    15
}

fn default_history_retention() -> i64 {
    86_400
}

fn default_cu() -> f64 {
    0.25
}

/// Declared configuration of a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSpec {
    /// Name of the project.
    pub name: String,
    /// Region of the project.
    pub region_id: String,
    /// Organization of the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    /// PostgreSQL version of the project.
    #[serde(default = "default_pg_version")]
    pub pg_version: i64,
    /// PITR history retention period in seconds.
    #[serde(default = "default_history_retention")]
    pub history_retention: i64,
    /// Default branch settings.
    #[serde(default)]
    pub branch: ProjectBranchSpec,
}

/// Declared settings of the project's default branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectBranchSpec {
    /// Name of the branch.
    #[serde(default = "default_branch_name")]
    pub name: String,
    /// Whether the branch is protected.
    #[serde(default)]
    pub protected: bool,
    /// Read-write compute endpoint settings of the branch.
    #[serde(default)]
    pub endpoint: ProjectEndpointSpec,
}

impl Default for ProjectBranchSpec {
    fn default() -> Self {
        Self {
            name: default_branch_name(),
            protected: false,
            endpoint: ProjectEndpointSpec::default(),
        }
    }
}

/// Declared settings of the default branch's endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEndpointSpec {
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

impl Default for ProjectEndpointSpec {
    fn default() -> Self {
        Self {
            min_cu: default_cu(),
            max_cu: default_cu(),
            suspend_timeout: 0,
        }
    }
}

/// Last-known shape of a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectState {
    /// Identifier of the project.
    pub id: String,
    /// Name of the project.
    #[serde(default)]
    pub name: String,
    /// Platform of the project.
    #[serde(default)]
    pub platform_id: String,
    /// Region of the project.
    #[serde(default)]
    pub region_id: String,
    /// Organization of the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    /// PostgreSQL version of the project.
    #[serde(default)]
    pub pg_version: i64,
    /// PITR history retention period in seconds.
    #[serde(default)]
    pub history_retention: i64,
    /// Default branch of the project.
    #[serde(default)]
    pub branch: ProjectBranchState,
}

/// Default-branch attributes stored in project state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectBranchState {
    /// Identifier of the branch.
    #[serde(default)]
    pub id: String,
    /// Name of the branch.
    #[serde(default)]
    pub name: String,
    /// Whether the branch is protected.
    #[serde(default)]
    pub protected: bool,
    /// Read-write endpoint of the branch.
    #[serde(default)]
    pub endpoint: AttachedEndpoint,
}

/// Reconciles declared project configuration against the control plane.
pub struct ProjectResource<'a> {
    client: &'a Client,
}

impl<'a> ProjectResource<'a> {
    /// Create a reconciler borrowing the shared client.
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Create the project, then strip the platform's auto-provisioned
    /// default database and role.
    pub async fn create(&self, spec: &ProjectSpec) -> Result<ProjectState, ProviderError> {
        ensure_cu_range(spec.branch.endpoint.min_cu, spec.branch.endpoint.max_cu)?;

        let input = ProjectCreateInput {
            project: ProjectCreateProject {
                name: spec.name.clone(),
                region_id: spec.region_id.clone(),
                org_id: spec.org_id.clone(),
                pg_version: spec.pg_version,
                store_passwords: true,
                history_retention_seconds: spec.history_retention,
                branch: ProjectCreateBranch {
                    name: spec.branch.name.clone(),
                },
                default_endpoint_settings: DefaultEndpointSettings {
                    autoscaling_limit_min_cu: spec.branch.endpoint.min_cu,
                    autoscaling_limit_max_cu: spec.branch.endpoint.max_cu,
                    suspend_timeout_seconds: spec.branch.endpoint.suspend_timeout,
                },
            },
        };

        let output = self.client.project_create(&input).await?;
        debug!(project_id = %output.project.id, "created a project");

        let mut branch = output.branch;

        if spec.branch.protected {
            branch = self
                .client
                .branch_update(
                    &output.project.id,
                    &branch.id,
                    &BranchUpdateInput {
                        branch: BranchUpdateBranch {
                            name: None,
                            protected: Some(true),
                        },
                    },
                )
                .await?;
            debug!(branch_id = %branch.id, "updated branch protection");
        }

        // The platform seeds every new project with a database and a role;
        // both are managed as their own resources here.
        let default_database = output.databases.first().ok_or_else(|| {
            ProviderError::Consistency("project create response contained no database".to_string())
        })?;
        self.client
            .database_delete(&output.project.id, &branch.id, &default_database.name)
            .await?;

        let default_role = output.roles.first().ok_or_else(|| {
            ProviderError::Consistency("project create response contained no role".to_string())
        })?;
        self.client
            .role_delete(&output.project.id, &branch.id, &default_role.name)
            .await?;

        let endpoint = output.endpoints.first().ok_or_else(|| {
            ProviderError::Consistency("project create response contained no endpoint".to_string())
        })?;

        Ok(ProjectState {
            id: output.project.id.clone(),
            name: output.project.name.clone(),
            platform_id: output.project.platform_id.clone(),
            region_id: output.project.region_id.clone(),
            org_id: output.project.org_id.clone(),
            pg_version: output.project.pg_version,
            history_retention: output.project.history_retention_seconds,
            branch: ProjectBranchState {
                id: branch.id.clone(),
                name: branch.name.clone(),
                protected: branch.protected,
                endpoint: AttachedEndpoint::from(endpoint),
            },
        })
    }

    /// Refresh the project, its default branch, and the branch's
    /// read-write endpoint.
    pub async fn read(&self, prior: &ProjectState) -> Result<ProjectState, ProviderError> {
        let project = self.client.project_get(&prior.id).await?;
        let branch = self.client.default_branch(&project.id).await?;
        let endpoint = self
            .client
            .branch_endpoint(&project.id, &branch.id, EndpointType::ReadWrite)
            .await?
            .ok_or_else(|| {
                ProviderError::Consistency(format!(
                    "default branch {} has no read-write endpoint",
                    branch.id
                ))
            })?;

        Ok(ProjectState {
            id: project.id,
            name: project.name,
            platform_id: project.platform_id,
            region_id: project.region_id,
            org_id: project.org_id,
            pg_version: project.pg_version,
            history_retention: project.history_retention_seconds,
            branch: ProjectBranchState {
                id: branch.id,
                name: branch.name,
                protected: branch.protected,
                endpoint: AttachedEndpoint::from(&endpoint),
            },
        })
    }

    /// Apply changed project, branch, and endpoint fields, issuing up to
    /// three PATCH calls. The branch PATCH is skipped entirely when neither its
    /// name nor its protection changed, because the platform rejects a
    /// rename to the current name.
    pub async fn update(
        &self,
        prior: &ProjectState,
        spec: &ProjectSpec,
    ) -> Result<ProjectState, ProviderError> {
        ensure_cu_range(spec.branch.endpoint.min_cu, spec.branch.endpoint.max_cu)?;

        let project = self
            .client
            .project_update(
                &prior.id,
                &ProjectUpdateInput {
                    project: ProjectUpdateProject {
                        name: spec.name.clone(),
                        history_retention_seconds: spec.history_retention,
                    },
                },
            )
            .await?;
        debug!(project_id = %project.id, "updated a project");

        let mut branch_input = BranchUpdateBranch::default();
        if spec.branch.name != prior.branch.name {
            branch_input.name = Some(spec.branch.name.clone());
        }
        if spec.branch.protected != prior.branch.protected {
            branch_input.protected = Some(spec.branch.protected);
        }

        let mut branch_state = ProjectBranchState {
            id: prior.branch.id.clone(),
            name: prior.branch.name.clone(),
            protected: prior.branch.protected,
            endpoint: AttachedEndpoint::default(),
        };

        if !branch_input.is_empty() {
            let branch = self
                .client
                .branch_update(
                    &prior.id,
                    &prior.branch.id,
                    &BranchUpdateInput {
                        branch: branch_input,
                    },
                )
                .await?;
            debug!(branch_id = %branch.id, "updated a branch");

            branch_state.id = branch.id;
            branch_state.name = branch.name;
            branch_state.protected = branch.protected;
        }

        let endpoint = self
            .client
            .endpoint_update(
                &prior.id,
                &prior.branch.endpoint.id,
                &EndpointUpdateInput {
                    endpoint: EndpointUpdateEndpoint {
                        autoscaling_limit_min_cu: spec.branch.endpoint.min_cu,
                        autoscaling_limit_max_cu: spec.branch.endpoint.max_cu,
                        provisioner: None,
                        suspend_timeout_seconds: spec.branch.endpoint.suspend_timeout,
                    },
                },
            )
            .await?;
        debug!(endpoint_id = %endpoint.id, "updated an endpoint");

        branch_state.endpoint = AttachedEndpoint::from(&endpoint);

        Ok(ProjectState {
            id: project.id,
            name: project.name,
            platform_id: project.platform_id,
            region_id: project.region_id,
            org_id: project.org_id,
            pg_version: project.pg_version,
            history_retention: project.history_retention_seconds,
            branch: branch_state,
        })
    }

    /// Delete the project; the platform tears down everything underneath.
    pub async fn delete(&self, state: &ProjectState) -> Result<(), ProviderError> {
        self.client.project_delete(&state.id).await?;
        debug!(project_id = %state.id, "deleted a project");
        Ok(())
    }

    /// Parse an import identifier, which is a bare project id.
    pub fn import_id(id: &str) -> Result<ProjectState, ProviderError> {
        if id.is_empty() {
            return Err(ProviderError::Configuration(
                "Expected import identifier with format: project_id. Got an empty string"
                    .to_string(),
            ));
        }

        Ok(ProjectState {
            id: id.to_string(),
            ..Default::default()
        })
    }
}
