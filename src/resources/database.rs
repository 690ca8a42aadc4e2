//! Database reconciler.
//!
//! Databases are keyed by `(project, branch, name)` on the wire; renames
//! PATCH the resource under its prior name.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::{DatabaseCreateDatabase, DatabaseCreateInput, DatabaseUpdateInput};
use crate::client::Client;
use crate::error::ProviderError;
use crate::resources::split_import_id;

/// Declared configuration of a database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSpec {
    /// Project the database belongs to.
    pub project_id: String,
    /// Branch the database belongs to.
    pub branch_id: String,
    /// Name of the database.
    pub name: String,
    /// Name of the database owner.
    pub owner_name: String,
}

/// Last-known shape of a database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseState {
    /// Numeric identifier of the database.
    #[serde(default)]
    pub id: i64,
    /// Project the database belongs to.
    #[serde(default)]
    pub project_id: String,
    /// Branch the database belongs to.
    #[serde(default)]
    pub branch_id: String,
    /// Name of the database.
    #[serde(default)]
    pub name: String,
    /// Name of the database owner.
    #[serde(default)]
    pub owner_name: String,
}

/// Reconciles declared database configuration against the control plane.
pub struct DatabaseResource<'a> {
    client: &'a Client,
}

impl<'a> DatabaseResource<'a> {
    /// Create a reconciler borrowing the shared client.
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Create the database on its branch.
    pub async fn create(&self, spec: &DatabaseSpec) -> Result<DatabaseState, ProviderError> {
        let branch = self
            .client
            .branch_get(&spec.project_id, &spec.branch_id)
            .await?;

        let database = self
            .client
            .database_create(
                &spec.project_id,
                &spec.branch_id,
                &DatabaseCreateInput {
                    database: DatabaseCreateDatabase {
                        name: spec.name.clone(),
                        owner_name: spec.owner_name.clone(),
                    },
                },
            )
            .await?;
        debug!(database = %database.name, "created a database");

        Ok(DatabaseState {
            id: database.id,
            project_id: branch.project_id,
            branch_id: database.branch_id,
            name: database.name,
            owner_name: database.owner_name,
        })
    }

    /// Refresh the database.
    pub async fn read(&self, prior: &DatabaseState) -> Result<DatabaseState, ProviderError> {
        let branch = self
            .client
            .branch_get(&prior.project_id, &prior.branch_id)
            .await?;

        let database = self
            .client
            .database_get(&prior.project_id, &prior.branch_id, &prior.name)
            .await?;
        debug!(database = %database.name, "read a database");

        Ok(DatabaseState {
            id: database.id,
            project_id: branch.project_id,
            branch_id: database.branch_id,
            name: database.name,
            owner_name: database.owner_name,
        })
    }

    /// Apply a rename or owner change. The PATCH is addressed to the
    /// prior name, carrying the new one in the body.
    pub async fn update(
        &self,
        prior: &DatabaseState,
        spec: &DatabaseSpec,
    ) -> Result<DatabaseState, ProviderError> {
        let branch = self
            .client
            .branch_get(&spec.project_id, &spec.branch_id)
            .await?;

        let database = self
            .client
            .database_update(
                &spec.project_id,
                &spec.branch_id,
                &prior.name,
                &DatabaseUpdateInput {
                    database: DatabaseCreateDatabase {
                        name: spec.name.clone(),
                        owner_name: spec.owner_name.clone(),
                    },
                },
            )
            .await?;
        debug!(database = %database.name, "updated a database");

        Ok(DatabaseState {
            id: database.id,
            project_id: branch.project_id,
            branch_id: database.branch_id,
            name: database.name,
            owner_name: database.owner_name,
        })
    }

    /// Delete the database.
    pub async fn delete(&self, state: &DatabaseState) -> Result<(), ProviderError> {
        self.client
            .database_delete(&state.project_id, &state.branch_id, &state.name)
            .await?;
        debug!(database = %state.name, "deleted a database");
        Ok(())
    }

    /// Parse an import identifier of the form `project_id:branch_id:name`.
    pub fn import_id(id: &str) -> Result<DatabaseState, ProviderError> {
        let parts = split_import_id(id, 3, "project_id:branch_id:name")?;

        Ok(DatabaseState {
            project_id: parts[0].to_string(),
            branch_id: parts[1].to_string(),
            name: parts[2].to_string(),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_id() {
        let state = DatabaseResource::import_id("cool-project:br-quiet-sea:appdb").unwrap();
        assert_eq!(state.project_id, "cool-project");
        assert_eq!(state.branch_id, "br-quiet-sea");
        assert_eq!(state.name, "appdb");
        assert_eq!(state.id, 0);

        assert!(DatabaseResource::import_id("cool-project:br-quiet-sea").is_err());
        assert!(DatabaseResource::import_id("a:b:").is_err());
        assert!(DatabaseResource::import_id("a:b:c:d").is_err());
    }
}
