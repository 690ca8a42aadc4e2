//! Connection-URI data source.
//!
//! Retrieves the direct and pooled connection URIs for a database and
//! role. Branch and endpoint default server-side to the project's default
//! branch and its read-write endpoint.

use serde::{Deserialize, Serialize};

use crate::api::ConnectionUriParams;
use crate::client::Client;
use crate::error::ProviderError;

/// Query attributes of the connection-URI data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionUriQuery {
    /// Project to retrieve the connection URI for.
    pub project_id: String,
    /// Branch to retrieve the connection URI for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    /// Endpoint to retrieve the connection URI for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_id: Option<String>,
    /// Name of the database.
    pub database_name: String,
    /// Name of the role.
    pub role_name: String,
}

/// Resolved connection URIs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionUriState {
    /// Composite identifier of this lookup.
    pub id: String,
    /// Direct connection URI.
    pub uri: String,
    /// Pooled connection URI.
    pub pooled_uri: String,
}

/// Reads connection URIs from the control plane.
pub struct ConnectionUriDataSource<'a> {
    client: &'a Client,
}

impl<'a> ConnectionUriDataSource<'a> {
    /// Create a data source borrowing the shared client.
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Fetch both the direct and the pooled URI for the query.
    pub async fn read(
        &self,
        query: &ConnectionUriQuery,
    ) -> Result<ConnectionUriState, ProviderError> {
        let uri = self
            .client
            .connection_uri(
                &query.project_id,
                &ConnectionUriParams {
                    branch_id: query.branch_id.clone(),
                    endpoint_id: query.endpoint_id.clone(),
                    database_name: query.database_name.clone(),
                    role_name: query.role_name.clone(),
                    pooled: false,
                },
            )
            .await?;

        let pooled_uri = self
            .client
            .connection_uri(
                &query.project_id,
                &ConnectionUriParams {
                    branch_id: query.branch_id.clone(),
                    endpoint_id: query.endpoint_id.clone(),
                    database_name: query.database_name.clone(),
                    role_name: query.role_name.clone(),
                    pooled: true,
                },
            )
            .await?;

        Ok(ConnectionUriState {
            id: format!(
                "{}:{}:{}:{}:{}",
                query.project_id,
                query.branch_id.as_deref().unwrap_or_default(),
                query.endpoint_id.as_deref().unwrap_or_default(),
                query.database_name,
                query.role_name
            ),
            uri,
            pooled_uri,
        })
    }
}
