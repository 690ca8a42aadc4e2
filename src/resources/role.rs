//! Role reconciler.
//!
//! The platform generates the password at creation time; it is stored as a
//! sensitive state attribute and re-read through `reveal_password`. There
//! is no in-place update: the only mutable attribute is the name, and a
//! name change is a replacement.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::{RoleCreateInput, RoleCreateRole};
use crate::client::Client;
use crate::error::ProviderError;
use crate::resources::split_import_id;

/// Declared configuration of a role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleSpec {
    /// Project the role belongs to.
    pub project_id: String,
    /// Branch the role belongs to.
    pub branch_id: String,
    /// Name of the role.
    pub name: String,
}

/// Last-known shape of a role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleState {
    /// Identifier of the role; the platform keys roles by name.
    #[serde(default)]
    pub id: String,
    /// Name of the role.
    #[serde(default)]
    pub name: String,
    /// Generated password of the role.
    #[serde(default)]
    pub password: String,
    /// Branch the role belongs to.
    #[serde(default)]
    pub branch_id: String,
    /// Project the role belongs to.
    #[serde(default)]
    pub project_id: String,
}

/// Reconciles declared role configuration against the control plane.
pub struct RoleResource<'a> {
    client: &'a Client,
}

impl<'a> RoleResource<'a> {
    /// Create a reconciler borrowing the shared client.
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Create the role, capturing the generated password.
    pub async fn create(&self, spec: &RoleSpec) -> Result<RoleState, ProviderError> {
        let branch = self
            .client
            .branch_get(&spec.project_id, &spec.branch_id)
            .await?;

        let role = self
            .client
            .role_create(
                &spec.project_id,
                &spec.branch_id,
                &RoleCreateInput {
                    role: RoleCreateRole {
                        name: spec.name.clone(),
                    },
                },
            )
            .await?;
        debug!(role = %role.name, "created a role");

        Ok(RoleState {
            id: role.name.clone(),
            name: role.name,
            password: role.password,
            branch_id: role.branch_id,
            project_id: branch.project_id,
        })
    }

    /// Refresh the role, re-reading the stored password.
    pub async fn read(&self, prior: &RoleState) -> Result<RoleState, ProviderError> {
        let branch = self
            .client
            .branch_get(&prior.project_id, &prior.branch_id)
            .await?;

        let role = self
            .client
            .role_get(&prior.project_id, &prior.branch_id, &prior.name)
            .await?;
        let password = self
            .client
            .role_password(&prior.project_id, &prior.branch_id, &prior.name)
            .await?;
        debug!(role = %role.name, "read a role");

        Ok(RoleState {
            id: role.name.clone(),
            name: role.name,
            password,
            branch_id: role.branch_id,
            project_id: branch.project_id,
        })
    }

    /// Roles have nothing to update in place; the prior state is carried
    /// forward unchanged.
    pub async fn update(&self, prior: &RoleState) -> Result<RoleState, ProviderError> {
        Ok(prior.clone())
    }

    /// Delete the role.
    pub async fn delete(&self, state: &RoleState) -> Result<(), ProviderError> {
        self.client
            .role_delete(&state.project_id, &state.branch_id, &state.name)
            .await?;
        debug!(role = %state.name, "deleted a role");
        Ok(())
    }

    /// Parse an import identifier of the form `project_id:branch_id:name`.
    pub fn import_id(id: &str) -> Result<RoleState, ProviderError> {
        let parts = split_import_id(id, 3, "project_id:branch_id:name")?;

        Ok(RoleState {
            project_id: parts[0].to_string(),
            branch_id: parts[1].to_string(),
            name: parts[2].to_string(),
            id: parts[2].to_string(),
            ..Default::default()
        })
    }
}
