//! Wire-format types and typed calls for the control-plane API.
//!
//! The structs here mirror the platform's JSON bodies exactly: request
//! payloads are nested under a resource-named envelope (`{"branch": {…}}`)
//! and responses come back the same way. The `impl Client` block at the
//! bottom maps each REST operation to one function.
//!
//! Mutations against a project's sub-resources (branches, endpoints,
//! databases, roles) first wait for the project's most recent asynchronous
//! operation to finish, because the platform serializes mutations per
//! project and rejects overlapping ones.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::ProviderError;

/// Provisioner used when an endpoint's compute range is fixed.
pub const PROVISIONER_POD: &str = "k8s-pod";

/// Provisioner used when an endpoint autoscales between different
/// compute sizes.
pub const PROVISIONER_VM: &str = "k8s-neonvm";

/// Select the compute provisioner for an autoscaling range.
///
/// A fixed range (`min_cu == max_cu`) runs as a plain pod; a real range
/// needs the VM-backed provisioner that can resize on the fly.
pub fn provisioner_for(min_cu: f64, max_cu: f64) -> &'static str {
    if min_cu == max_cu {
        PROVISIONER_POD
    } else {
        PROVISIONER_VM
    }
}

/// A project, the top-level container for branches and their computes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Server-assigned identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Platform the project is hosted on.
    #[serde(default)]
    pub platform_id: String,
    /// Region the project is hosted in.
    pub region_id: String,
    /// Owning organization, when not a personal project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    /// Major PostgreSQL version.
    #[serde(default)]
    pub pg_version: i64,
    /// Whether the platform stores role passwords for later retrieval.
    #[serde(default)]
    pub store_passwords: bool,
    /// Point-in-time-restore history retention, in seconds.
    #[serde(default)]
    pub history_retention_seconds: i64,
}

/// A branch, an isolated copy-on-write view of a project's data lineage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    /// Server-assigned identifier.
    pub id: String,
    /// Project the branch belongs to.
    pub project_id: String,
    /// Parent branch; `None` only for the root branch.
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Display name.
    pub name: String,
    /// Whether this is the project's default branch.
    #[serde(default)]
    pub default: bool,
    /// Whether the branch is protected against deletion.
    #[serde(default)]
    pub protected: bool,
    /// Provisioning state reported by the platform.
    #[serde(default)]
    pub current_state: String,
}

/// A role on a branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    /// Role name; doubles as the identifier.
    pub name: String,
    /// Generated password. Only present on creation responses and the
    /// dedicated `reveal_password` endpoint.
    #[serde(default)]
    pub password: String,
    /// Branch the role belongs to.
    pub branch_id: String,
    /// Whether the role is protected.
    #[serde(default)]
    pub protected: bool,
}

/// A database on a branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    /// Server-assigned numeric identifier.
    pub id: i64,
    /// Branch the database belongs to.
    pub branch_id: String,
    /// Database name, unique within the branch.
    pub name: String,
    /// Owning role name.
    pub owner_name: String,
}

/// Whether an endpoint accepts writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointType {
    /// A branch's single read-write compute.
    ReadWrite,
    /// An additional read-only compute.
    ReadOnly,
}

impl EndpointType {
    /// The wire spelling of this endpoint type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReadWrite => "read_write",
            Self::ReadOnly => "read_only",
        }
    }
}

/// A compute endpoint attached to a branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Server-assigned identifier.
    pub id: String,
    /// Hostname clients connect to.
    #[serde(default)]
    pub host: String,
    /// Branch the endpoint is attached to.
    pub branch_id: String,
    /// Project the endpoint belongs to.
    pub project_id: String,
    /// Region the endpoint runs in.
    #[serde(default)]
    pub region_id: String,
    /// Lower autoscaling bound, in compute units.
    pub autoscaling_limit_min_cu: f64,
    /// Upper autoscaling bound, in compute units.
    pub autoscaling_limit_max_cu: f64,
    /// Compute provisioner backing the endpoint.
    #[serde(default)]
    pub provisioner: String,
    /// Idle period before the compute suspends, in seconds.
    #[serde(default)]
    pub suspend_timeout_seconds: i64,
    /// Whether the endpoint is read-write or read-only.
    #[serde(rename = "type")]
    pub kind: EndpointType,
    /// Provisioning state reported by the platform.
    #[serde(default)]
    pub current_state: String,
}

/// A server-side record of an asynchronous provisioning action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Server-assigned identifier.
    pub id: String,
    /// What the operation is doing (`create_branch`, `start_compute`, …).
    #[serde(default)]
    pub action: String,
    /// Current status; terminal states are `finished` and `failed`.
    pub status: String,
    /// Endpoint the operation concerns, if any.
    #[serde(default)]
    pub endpoint_id: Option<String>,
    /// Branch the operation concerns, if any.
    #[serde(default)]
    pub branch_id: Option<String>,
    /// Project the operation belongs to.
    #[serde(default)]
    pub project_id: String,
}

// Response envelopes.

/// Response wrapper for a single project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectOutput {
    /// The project.
    pub project: Project,
}

/// Response to project creation. The platform provisions the root branch,
/// a default endpoint, a default database, and a default role in the same
/// call and reports them all back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCreateOutput {
    /// The created project.
    pub project: Project,
    /// Auto-provisioned roles (first entry is the default role).
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Auto-provisioned databases (first entry is the default database).
    #[serde(default)]
    pub databases: Vec<Database>,
    /// The root branch.
    pub branch: Branch,
    /// Auto-provisioned endpoints (first entry is the read-write one).
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

/// Response wrapper for a branch list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchesOutput {
    /// The project's branches.
    #[serde(default)]
    pub branches: Vec<Branch>,
}

/// Response wrapper for a single branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchOutput {
    /// The branch.
    pub branch: Branch,
}

/// Response wrapper for an endpoint list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsOutput {
    /// The project's endpoints.
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

/// Response wrapper for a single endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointOutput {
    /// The endpoint.
    pub endpoint: Endpoint,
}

/// Response wrapper for a single database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseOutput {
    /// The database.
    pub database: Database,
}

/// Response wrapper for a single role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleOutput {
    /// The role.
    pub role: Role,
}

/// Response from the `reveal_password` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolePasswordOutput {
    /// The stored password.
    pub password: String,
}

/// Response wrapper for the operations feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationsOutput {
    /// Operations, most recent first.
    #[serde(default)]
    pub operations: Vec<Operation>,
}

/// Response from the connection-URI endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionUriOutput {
    /// The assembled connection URI.
    pub uri: String,
}

// Request envelopes.

/// Body of `POST /projects`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCreateInput {
    /// The project to create.
    pub project: ProjectCreateProject,
}

/// Project settings carried by [`ProjectCreateInput`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCreateProject {
    /// Display name.
    pub name: String,
    /// Region to host the project in.
    pub region_id: String,
    /// Owning organization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    /// Major PostgreSQL version.
    pub pg_version: i64,
    /// Ask the platform to store role passwords for later retrieval.
    pub store_passwords: bool,
    /// History retention, in seconds.
    pub history_retention_seconds: i64,
    /// Settings for the root branch created alongside the project.
    pub branch: ProjectCreateBranch,
    /// Settings for the root branch's read-write endpoint.
    pub default_endpoint_settings: DefaultEndpointSettings,
}

/// Root-branch settings nested in a project create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCreateBranch {
    /// Branch name.
    pub name: String,
}

/// Default endpoint settings nested in a project create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultEndpointSettings {
    /// Lower autoscaling bound, in compute units.
    pub autoscaling_limit_min_cu: f64,
    /// Upper autoscaling bound, in compute units.
    pub autoscaling_limit_max_cu: f64,
    /// Idle period before the compute suspends, in seconds.
    pub suspend_timeout_seconds: i64,
}

/// Body of `PATCH /projects/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectUpdateInput {
    /// The fields to update.
    pub project: ProjectUpdateProject,
}

/// Mutable project fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectUpdateProject {
    /// Display name.
    pub name: String,
    /// History retention, in seconds.
    pub history_retention_seconds: i64,
}

/// Body of `POST /projects/{id}/branches`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchCreateInput {
    /// The branch to create.
    pub branch: BranchCreateBranch,
}

/// Branch settings carried by [`BranchCreateInput`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchCreateBranch {
    /// Branch name.
    pub name: String,
    /// Parent branch; the platform defaults to the project's default
    /// branch when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// Body of `PATCH /projects/{id}/branches/{branch}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchUpdateInput {
    /// The fields to update.
    pub branch: BranchUpdateBranch,
}

/// Mutable branch fields. The platform rejects a rename to the current
/// name, so callers only set fields that actually changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchUpdateBranch {
    /// New branch name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New protection flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protected: Option<bool>,
}

impl BranchUpdateBranch {
    /// Whether the update carries no changes and should be skipped.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.protected.is_none()
    }
}

/// Body of `POST /projects/{id}/endpoints`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointCreateInput {
    /// The endpoint to create.
    pub endpoint: EndpointCreateEndpoint,
}

/// Endpoint settings carried by [`EndpointCreateInput`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointCreateEndpoint {
    /// Branch to attach the endpoint to.
    pub branch_id: String,
    /// Read-write or read-only.
    #[serde(rename = "type")]
    pub kind: EndpointType,
    /// Lower autoscaling bound, in compute units.
    pub autoscaling_limit_min_cu: f64,
    /// Upper autoscaling bound, in compute units.
    pub autoscaling_limit_max_cu: f64,
    /// Compute provisioner; the platform picks one when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioner: Option<String>,
    /// Idle period before the compute suspends, in seconds.
    pub suspend_timeout_seconds: i64,
}

/// Body of `PATCH /projects/{id}/endpoints/{endpoint}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointUpdateInput {
    /// The fields to update.
    pub endpoint: EndpointUpdateEndpoint,
}

/// Mutable endpoint fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointUpdateEndpoint {
    /// Lower autoscaling bound, in compute units.
    pub autoscaling_limit_min_cu: f64,
    /// Upper autoscaling bound, in compute units.
    pub autoscaling_limit_max_cu: f64,
    /// Compute provisioner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioner: Option<String>,
    /// Idle period before the compute suspends, in seconds.
    pub suspend_timeout_seconds: i64,
}

/// Body of `POST /projects/{id}/branches/{branch}/databases`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseCreateInput {
    /// The database to create.
    pub database: DatabaseCreateDatabase,
}

/// Database settings carried by [`DatabaseCreateInput`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseCreateDatabase {
    /// Database name.
    pub name: String,
    /// Owning role name.
    pub owner_name: String,
}

/// Body of `PATCH /projects/{id}/branches/{branch}/databases/{name}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseUpdateInput {
    /// The fields to update.
    pub database: DatabaseCreateDatabase,
}

/// Body of `POST /projects/{id}/branches/{branch}/roles`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleCreateInput {
    /// The role to create.
    pub role: RoleCreateRole,
}

/// Role settings carried by [`RoleCreateInput`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleCreateRole {
    /// Role name.
    pub name: String,
}

/// Query parameters for the connection-URI endpoint.
#[derive(Debug, Clone, Default)]
pub struct ConnectionUriParams {
    /// Branch to connect to; defaults to the project's default branch.
    pub branch_id: Option<String>,
    /// Endpoint to connect through; defaults to the branch's read-write
    /// endpoint.
    pub endpoint_id: Option<String>,
    /// Database to connect to.
    pub database_name: String,
    /// Role to connect as.
    pub role_name: String,
    /// Whether to go through the connection pooler.
    pub pooled: bool,
}

impl Client {
    /// `POST /projects`: create a project with its root branch and
    /// default endpoint in one call.
    pub async fn project_create(
        &self,
        input: &ProjectCreateInput,
    ) -> Result<ProjectCreateOutput, ProviderError> {
        self.call(Method::POST, "/projects", input).await
    }

    /// `GET /projects/{id}`.
    pub async fn project_get(&self, project_id: &str) -> Result<Project, ProviderError> {
        let output: ProjectOutput = self.get(&format!("/projects/{}", project_id)).await?;
        Ok(output.project)
    }

    /// `PATCH /projects/{id}`.
    pub async fn project_update(
        &self,
        project_id: &str,
        input: &ProjectUpdateInput,
    ) -> Result<Project, ProviderError> {
        let output: ProjectOutput = self
            .call(Method::PATCH, &format!("/projects/{}", project_id), input)
            .await?;
        Ok(output.project)
    }

    /// `DELETE /projects/{id}`.
    pub async fn project_delete(&self, project_id: &str) -> Result<(), ProviderError> {
        self.delete_raw(&format!("/projects/{}", project_id)).await?;
        Ok(())
    }

    /// `GET /projects/{id}/branches`.
    pub async fn branch_list(&self, project_id: &str) -> Result<Vec<Branch>, ProviderError> {
        let output: BranchesOutput = self
            .get(&format!("/projects/{}/branches", project_id))
            .await?;
        Ok(output.branches)
    }

    /// The project's default branch.
    pub async fn default_branch(&self, project_id: &str) -> Result<Branch, ProviderError> {
        let branches = self.branch_list(project_id).await?;
        branches.into_iter().find(|b| b.default).ok_or_else(|| {
            ProviderError::Consistency(format!("project {} has no default branch", project_id))
        })
    }

    /// `GET /projects/{id}/branches/{branch}`, verifying the branch
    /// actually belongs to the requested project.
    pub async fn branch_get(
        &self,
        project_id: &str,
        branch_id: &str,
    ) -> Result<Branch, ProviderError> {
        let output: BranchOutput = self
            .get(&format!("/projects/{}/branches/{}", project_id, branch_id))
            .await?;
        let branch = output.branch;

        if branch.project_id != project_id {
            return Err(ProviderError::Consistency(format!(
                "branch {} belongs to project {}, not {}",
                branch_id, branch.project_id, project_id
            )));
        }

        Ok(branch)
    }

    /// `POST /projects/{id}/branches`.
    pub async fn branch_create(
        &self,
        project_id: &str,
        input: &BranchCreateInput,
    ) -> Result<Branch, ProviderError> {
        self.await_project_ready(project_id).await?;
        let output: BranchOutput = self
            .call(
                Method::POST,
                &format!("/projects/{}/branches", project_id),
                input,
            )
            .await?;
        Ok(output.branch)
    }

    /// `PATCH /projects/{id}/branches/{branch}`.
    pub async fn branch_update(
        &self,
        project_id: &str,
        branch_id: &str,
        input: &BranchUpdateInput,
    ) -> Result<Branch, ProviderError> {
        self.await_project_ready(project_id).await?;
        let output: BranchOutput = self
            .call(
                Method::PATCH,
                &format!("/projects/{}/branches/{}", project_id, branch_id),
                input,
            )
            .await?;
        Ok(output.branch)
    }

    /// `DELETE /projects/{id}/branches/{branch}`.
    pub async fn branch_delete(
        &self,
        project_id: &str,
        branch_id: &str,
    ) -> Result<(), ProviderError> {
        self.await_project_ready(project_id).await?;
        self.delete_raw(&format!("/projects/{}/branches/{}", project_id, branch_id))
            .await?;
        Ok(())
    }

    /// The branch's endpoint of the given type, if one is attached.
    ///
    /// The platform exposes endpoints per project, so this lists them and
    /// picks the branch's match.
    pub async fn branch_endpoint(
        &self,
        project_id: &str,
        branch_id: &str,
        kind: EndpointType,
    ) -> Result<Option<Endpoint>, ProviderError> {
        let output: EndpointsOutput = self
            .get(&format!("/projects/{}/endpoints", project_id))
            .await?;
        Ok(output
            .endpoints
            .into_iter()
            .find(|e| e.branch_id == branch_id && e.kind == kind))
    }

    /// `GET /projects/{id}/endpoints/{endpoint}`.
    pub async fn endpoint_get(
        &self,
        project_id: &str,
        endpoint_id: &str,
    ) -> Result<Endpoint, ProviderError> {
        let output: EndpointOutput = self
            .get(&format!(
                "/projects/{}/endpoints/{}",
                project_id, endpoint_id
            ))
            .await?;
        Ok(output.endpoint)
    }

    /// `POST /projects/{id}/endpoints`.
    pub async fn endpoint_create(
        &self,
        project_id: &str,
        input: &EndpointCreateInput,
    ) -> Result<Endpoint, ProviderError> {
        self.await_project_ready(project_id).await?;
        let output: EndpointOutput = self
            .call(
                Method::POST,
                &format!("/projects/{}/endpoints", project_id),
                input,
            )
            .await?;
        Ok(output.endpoint)
    }

    /// `PATCH /projects/{id}/endpoints/{endpoint}`.
    ///
    /// Also waits for the endpoint itself to leave its `init` state first;
    /// a compute that is still starting up rejects reconfiguration.
    pub async fn endpoint_update(
        &self,
        project_id: &str,
        endpoint_id: &str,
        input: &EndpointUpdateInput,
    ) -> Result<Endpoint, ProviderError> {
        self.await_project_ready(project_id).await?;
        self.await_endpoint_settled(project_id, endpoint_id).await?;
        let output: EndpointOutput = self
            .call(
                Method::PATCH,
                &format!("/projects/{}/endpoints/{}", project_id, endpoint_id),
                input,
            )
            .await?;
        Ok(output.endpoint)
    }

    /// `DELETE /projects/{id}/endpoints/{endpoint}`.
    pub async fn endpoint_delete(
        &self,
        project_id: &str,
        endpoint_id: &str,
    ) -> Result<(), ProviderError> {
        self.await_project_ready(project_id).await?;
        self.delete_raw(&format!(
            "/projects/{}/endpoints/{}",
            project_id, endpoint_id
        ))
        .await?;
        Ok(())
    }

    /// `GET /projects/{id}/branches/{branch}/databases/{name}`.
    pub async fn database_get(
        &self,
        project_id: &str,
        branch_id: &str,
        name: &str,
    ) -> Result<Database, ProviderError> {
        let output: DatabaseOutput = self
            .get(&format!(
                "/projects/{}/branches/{}/databases/{}",
                project_id, branch_id, name
            ))
            .await?;
        Ok(output.database)
    }

    /// `POST /projects/{id}/branches/{branch}/databases`.
    pub async fn database_create(
        &self,
        project_id: &str,
        branch_id: &str,
        input: &DatabaseCreateInput,
    ) -> Result<Database, ProviderError> {
        self.await_project_ready(project_id).await?;
        let output: DatabaseOutput = self
            .call(
                Method::POST,
                &format!("/projects/{}/branches/{}/databases", project_id, branch_id),
                input,
            )
            .await?;
        Ok(output.database)
    }

    /// `PATCH /projects/{id}/branches/{branch}/databases/{name}`, where
    /// `name` is the database's current name; the body may carry a new one.
    pub async fn database_update(
        &self,
        project_id: &str,
        branch_id: &str,
        name: &str,
        input: &DatabaseUpdateInput,
    ) -> Result<Database, ProviderError> {
        self.await_project_ready(project_id).await?;
        let output: DatabaseOutput = self
            .call(
                Method::PATCH,
                &format!(
                    "/projects/{}/branches/{}/databases/{}",
                    project_id, branch_id, name
                ),
                input,
            )
            .await?;
        Ok(output.database)
    }

    /// `DELETE /projects/{id}/branches/{branch}/databases/{name}`.
    pub async fn database_delete(
        &self,
        project_id: &str,
        branch_id: &str,
        name: &str,
    ) -> Result<(), ProviderError> {
        self.await_project_ready(project_id).await?;
        self.delete_raw(&format!(
            "/projects/{}/branches/{}/databases/{}",
            project_id, branch_id, name
        ))
        .await?;
        Ok(())
    }

    /// `GET /projects/{id}/branches/{branch}/roles/{name}`.
    pub async fn role_get(
        &self,
        project_id: &str,
        branch_id: &str,
        name: &str,
    ) -> Result<Role, ProviderError> {
        let output: RoleOutput = self
            .get(&format!(
                "/projects/{}/branches/{}/roles/{}",
                project_id, branch_id, name
            ))
            .await?;
        Ok(output.role)
    }

    /// `GET /projects/{id}/branches/{branch}/roles/{name}/reveal_password`.
    pub async fn role_password(
        &self,
        project_id: &str,
        branch_id: &str,
        name: &str,
    ) -> Result<String, ProviderError> {
        let output: RolePasswordOutput = self
            .get(&format!(
                "/projects/{}/branches/{}/roles/{}/reveal_password",
                project_id, branch_id, name
            ))
            .await?;
        Ok(output.password)
    }

    /// `POST /projects/{id}/branches/{branch}/roles`.
    pub async fn role_create(
        &self,
        project_id: &str,
        branch_id: &str,
        input: &RoleCreateInput,
    ) -> Result<Role, ProviderError> {
        self.await_project_ready(project_id).await?;
        let output: RoleOutput = self
            .call(
                Method::POST,
                &format!("/projects/{}/branches/{}/roles", project_id, branch_id),
                input,
            )
            .await?;
        Ok(output.role)
    }

    /// `DELETE /projects/{id}/branches/{branch}/roles/{name}`.
    pub async fn role_delete(
        &self,
        project_id: &str,
        branch_id: &str,
        name: &str,
    ) -> Result<(), ProviderError> {
        self.await_project_ready(project_id).await?;
        self.delete_raw(&format!(
            "/projects/{}/branches/{}/roles/{}",
            project_id, branch_id, name
        ))
        .await?;
        Ok(())
    }

    /// `GET /projects/{id}/connection_uri`: assemble a connection URI
    /// for a database and role.
    pub async fn connection_uri(
        &self,
        project_id: &str,
        params: &ConnectionUriParams,
    ) -> Result<String, ProviderError> {
        let mut query: Vec<(&str, &str)> = vec![
            ("database_name", &params.database_name),
            ("role_name", &params.role_name),
        ];
        if let Some(branch_id) = params.branch_id.as_deref() {
            query.push(("branch_id", branch_id));
        }
        if let Some(endpoint_id) = params.endpoint_id.as_deref() {
            query.push(("endpoint_id", endpoint_id));
        }
        let pooled = params.pooled.to_string();
        query.push(("pooled", pooled.as_str()));

        let request = self
            .request(Method::GET, &format!("/projects/{}/connection_uri", project_id))
            .query(&query);
        let response = self.send(request).await?;
        let output: ConnectionUriOutput = self.decode(response).await?;
        Ok(output.uri)
    }
}
