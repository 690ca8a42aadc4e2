//! The provider trait and its Neon implementation.
//!
//! [`ProviderService`] is the seam a declarative host drives: configure
//! once with credentials, then issue schema, validation, CRUD, import,
//! and data-source calls with `serde_json::Value` payloads. The host owns
//! planning, diffing, and state persistence; this side owns talking to
//! the control plane.
//!
//! [`NeonProvider`] implements the trait by deserializing the payloads
//! into the typed models in [`crate::resources`] and dispatching to the
//! matching reconciler.

use std::sync::RwLock;

use serde_json::Value;
use tracing::info;

use crate::client::Client;
use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::resources::branch::{BranchResource, BranchSpec, BranchState};
use crate::resources::connection_uri::{ConnectionUriDataSource, ConnectionUriQuery};
use crate::resources::database::{DatabaseResource, DatabaseSpec, DatabaseState};
use crate::resources::endpoint::{EndpointResource, EndpointSpec, EndpointState};
use crate::resources::project::{ProjectResource, ProjectSpec, ProjectState};
use crate::resources::role::{RoleResource, RoleSpec, RoleState};
use crate::schema::{Attribute, AttributeFlags, Diagnostic, ProviderSchema, Schema, Validator};
use crate::validation;

/// Type name of the project resource.
pub const RESOURCE_PROJECT: &str = "neon_project";
/// Type name of the branch resource.
pub const RESOURCE_BRANCH: &str = "neon_branch";
/// Type name of the endpoint resource.
pub const RESOURCE_ENDPOINT: &str = "neon_endpoint";
/// Type name of the database resource.
pub const RESOURCE_DATABASE: &str = "neon_database";
/// Type name of the role resource.
pub const RESOURCE_ROLE: &str = "neon_role";
/// Type name of the connection-URI data source.
pub const DATA_SOURCE_CONNECTION_URI: &str = "neon_connection_uri";

/// Compute sizes the platform accepts, in compute units.
const CU_SIZES: [f64; 9] = [0.25, 0.5, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];

/// Provider metadata: the registered type names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProviderMetadata {
    /// List of resource type names.
    pub resources: Vec<String>,
    /// List of data source type names.
    pub data_sources: Vec<String>,
}

/// Trait that provider implementations expose to a declarative host.
///
/// All payloads are `serde_json::Value`; the host supplies
/// already-validated, typed configuration and receives updated state the
/// same way. Planning and state persistence stay on the host's side of
/// this seam.
#[async_trait::async_trait]
pub trait ProviderService: Send + Sync + 'static {
    /// Return the provider's schema including all resources and data
    /// sources.
    fn schema(&self) -> ProviderSchema;

    /// Return provider metadata. By default, derived from the schema.
    fn metadata(&self) -> ProviderMetadata {
        let schema = self.schema();
        let mut resources: Vec<String> = schema.resources.keys().cloned().collect();
        let mut data_sources: Vec<String> = schema.data_sources.keys().cloned().collect();
        resources.sort();
        data_sources.sort();
        ProviderMetadata {
            resources,
            data_sources,
        }
    }

    /// Validate the provider configuration before configuring.
    async fn validate_provider_config(
        &self,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        Ok(validation::validate(&self.schema().provider, &config))
    }

    /// Configure the provider with credentials and settings.
    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError>;

    /// Validate a resource's configuration.
    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let _ = (resource_type, config);
        Ok(vec![])
    }

    /// Create a new resource and return its state.
    async fn create(&self, resource_type: &str, planned: Value) -> Result<Value, ProviderError>;

    /// Read the current state of a resource.
    async fn read(&self, resource_type: &str, current: Value) -> Result<Value, ProviderError>;

    /// Update an existing resource and return its new state.
    async fn update(
        &self,
        resource_type: &str,
        prior: Value,
        planned: Value,
    ) -> Result<Value, ProviderError>;

    /// Delete a resource.
    async fn delete(&self, resource_type: &str, current: Value) -> Result<(), ProviderError>;

    /// Parse an import identifier into the identifying state attributes.
    /// The host follows up with [`ProviderService::read`] to fill in the
    /// rest.
    async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Value, ProviderError> {
        let _ = id;
        Err(ProviderError::UnknownResource(resource_type.to_string()))
    }

    /// Read data from an external source.
    async fn read_data_source(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Value, ProviderError> {
        let _ = config;
        Err(ProviderError::UnknownResource(data_source_type.to_string()))
    }
}

/// Provider for Neon serverless Postgres.
///
/// Holds the configured [`Client`] and routes Value-level calls to the
/// typed reconcilers in [`crate::resources`].
#[derive(Debug, Default)]
pub struct NeonProvider {
    client: RwLock<Option<Client>>,
}

impl NeonProvider {
    /// Create an unconfigured provider. Call
    /// [`ProviderService::configure`] before any resource operation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider around an already-built client, bypassing
    /// configuration. Mostly useful in tests that tune the client's base
    /// URL or poll pacing.
    pub fn with_client(client: Client) -> Self {
        Self {
            client: RwLock::new(Some(client)),
        }
    }

    fn client(&self) -> Result<Client, ProviderError> {
        self.client
            .read()
            .expect("client lock poisoned")
            .clone()
            .ok_or_else(|| {
                ProviderError::Configuration(
                    "provider is not configured; call configure first".to_string(),
                )
            })
    }

    fn endpoint_attrs(suspend_default: i64) -> Vec<(&'static str, Attribute)> {
        vec![
            (
                "id",
                Attribute::computed_string().with_description("Identifier of the endpoint."),
            ),
            (
                "host",
                Attribute::computed_string().with_description("Host of the endpoint."),
            ),
            (
                "min_cu",
                Attribute::optional_computed_float64()
                    .with_description("Minimum number of compute units for the endpoint.")
                    .with_default(serde_json::json!(0.25))
                    .with_validator(Validator::FloatOneOf(CU_SIZES.to_vec())),
            ),
            (
                "max_cu",
                Attribute::optional_computed_float64()
                    .with_description("Maximum number of compute units for the endpoint.")
                    .with_default(serde_json::json!(0.25))
                    .with_validator(Validator::FloatOneOf(CU_SIZES.to_vec())),
            ),
            (
                "compute_provisioner",
                Attribute::computed_string().with_description("Provisioner of the endpoint."),
            ),
            (
                "suspend_timeout",
                Attribute::optional_computed_int64()
                    .with_description("Suspend timeout of the endpoint in seconds.")
                    .with_default(serde_json::json!(suspend_default))
                    .with_validator(Validator::IntBetween(-1, 604_800)),
            ),
        ]
    }

    fn project_schema() -> Schema {
        Schema::v0()
            .with_description("Neon project.")
            .with_attribute(
                "id",
                Attribute::computed_string().with_description("Identifier of the project."),
            )
            .with_attribute(
                "name",
                Attribute::required_string()
                    .with_description("Name of the project.")
                    .with_validator(Validator::LengthBetween(1, 64)),
            )
            .with_attribute(
                "platform_id",
                Attribute::computed_string().with_description("Platform of the project."),
            )
            .with_attribute(
                "region_id",
                Attribute::required_string()
                    .with_description("Region of the project.")
                    .with_force_new()
                    .with_validator(Validator::MinLength(1)),
            )
            .with_attribute(
                "org_id",
                Attribute::optional_string()
                    .with_description("Organization of the project.")
                    .with_force_new(),
            )
            .with_attribute(
                "pg_version",
                Attribute::optional_computed_int64()
                    .with_description("PostgreSQL version of the project.")
                    .with_default(serde_json::json!(15))
                    .with_force_new()
                    .with_validator(Validator::IntOneOf(vec![14, 15, 16, 17])),
            )
            .with_attribute(
                "history_retention",
                Attribute::optional_computed_int64()
                    .with_description("PITR history retention period of the project in seconds.")
                    .with_default(serde_json::json!(86_400))
                    .with_validator(Validator::IntBetween(0, 2_592_000)),
            )
            .with_attribute(
                "branch",
                Attribute::object(
                    AttributeFlags::optional_computed(),
                    [
                        (
                            "id",
                            Attribute::computed_string()
                                .with_description("Identifier of the branch."),
                        ),
                        (
                            "name",
                            Attribute::new(
                                crate::schema::AttributeType::String,
                                AttributeFlags::optional_computed(),
                            )
                            .with_description("Name of the branch.")
                            .with_default(serde_json::json!("main"))
                            .with_validator(Validator::MinLength(1)),
                        ),
                        (
                            "protected",
                            Attribute::optional_computed_bool()
                                .with_description("Whether the branch is protected.")
                                .with_default(serde_json::json!(false)),
                        ),
                        (
                            "endpoint",
                            Attribute::object(
                                AttributeFlags::optional_computed(),
                                Self::endpoint_attrs(0),
                            )
                            .with_description(
                                "Read-write compute endpoint settings of the branch.",
                            ),
                        ),
                    ],
                )
                .with_description("Default branch settings of the project."),
            )
    }

    fn branch_schema() -> Schema {
        Schema::v0()
            .with_description("Neon branch. Use neon_project to manage the default branch.")
            .with_attribute(
                "id",
                Attribute::computed_string().with_description("Identifier of the branch."),
            )
            .with_attribute(
                "name",
                Attribute::required_string()
                    .with_description("Name of the branch.")
                    .with_validator(Validator::MinLength(1)),
            )
            .with_attribute(
                "parent_id",
                Attribute::new(
                    crate::schema::AttributeType::String,
                    AttributeFlags::optional_computed(),
                )
                .with_description("Identifier of the parent branch. Defaults to the default branch.")
                .with_force_new()
                .with_validator(Validator::Id),
            )
            .with_attribute(
                "project_id",
                Attribute::required_string()
                    .with_description("Project the branch belongs to.")
                    .with_force_new()
                    .with_validator(Validator::Id),
            )
            .with_attribute(
                "endpoint",
                Attribute::object(AttributeFlags::optional(), Self::endpoint_attrs(300))
                    .with_description("Read-write compute endpoint settings of the branch."),
            )
    }

    fn endpoint_schema() -> Schema {
        Schema::v0()
            .with_description(
                "Neon endpoint. Creates read_only endpoints; use neon_branch for the \
                 read_write endpoint.",
            )
            .with_attribute(
                "id",
                Attribute::computed_string().with_description("Identifier of the endpoint."),
            )
            .with_attribute(
                "branch_id",
                Attribute::required_string()
                    .with_description("Branch the endpoint belongs to.")
                    .with_force_new()
                    .with_validator(Validator::Id),
            )
            .with_attribute(
                "project_id",
                Attribute::required_string()
                    .with_description("Project the endpoint belongs to.")
                    .with_force_new()
                    .with_validator(Validator::Id),
            )
            .with_attribute(
                "type",
                Attribute::computed_string().with_description("Type of the endpoint."),
            )
            .with_attribute(
                "host",
                Attribute::computed_string().with_description("Host of the endpoint."),
            )
            .with_attribute(
                "min_cu",
                Attribute::optional_computed_float64()
                    .with_description("Minimum number of compute units for the endpoint.")
                    .with_default(serde_json::json!(0.25))
                    .with_validator(Validator::FloatOneOf(CU_SIZES.to_vec())),
            )
            .with_attribute(
                "max_cu",
                Attribute::optional_computed_float64()
                    .with_description("Maximum number of compute units for the endpoint.")
                    .with_default(serde_json::json!(0.25))
                    .with_validator(Validator::FloatOneOf(CU_SIZES.to_vec())),
            )
            .with_attribute(
                "compute_provisioner",
                Attribute::computed_string().with_description("Provisioner of the endpoint."),
            )
            .with_attribute(
                "suspend_timeout",
                Attribute::optional_computed_int64()
                    .with_description("Suspend timeout of the endpoint in seconds.")
                    .with_default(serde_json::json!(0))
                    .with_validator(Validator::IntBetween(-1, 604_800)),
            )
    }

    fn database_schema() -> Schema {
        Schema::v0()
            .with_description("Neon database.")
            .with_attribute(
                "id",
                Attribute::computed_int64().with_description("Identifier of the database."),
            )
            .with_attribute(
                "name",
                Attribute::required_string()
                    .with_description("Name of the database.")
                    .with_validator(Validator::MinLength(1)),
            )
            .with_attribute(
                "owner_name",
                Attribute::required_string()
                    .with_description("Name of the database owner.")
                    .with_validator(Validator::MinLength(1)),
            )
            .with_attribute(
                "branch_id",
                Attribute::required_string()
                    .with_description("Branch the database belongs to.")
                    .with_force_new()
                    .with_validator(Validator::Id),
            )
            .with_attribute(
                "project_id",
                Attribute::required_string()
                    .with_description("Project the database belongs to.")
                    .with_force_new()
                    .with_validator(Validator::Id),
            )
    }

    fn role_schema() -> Schema {
        Schema::v0()
            .with_description("Neon role.")
            .with_attribute(
                "id",
                Attribute::computed_string().with_description("Identifier of the role."),
            )
            .with_attribute(
                "name",
                Attribute::required_string()
                    .with_description("Name of the role.")
                    .with_force_new()
                    .with_validator(Validator::MinLength(1)),
            )
            .with_attribute(
                "password",
                Attribute::computed_string()
                    .with_description("Password of the role.")
                    .sensitive(),
            )
            .with_attribute(
                "branch_id",
                Attribute::required_string()
                    .with_description("Branch the role belongs to.")
                    .with_force_new()
                    .with_validator(Validator::Id),
            )
            .with_attribute(
                "project_id",
                Attribute::required_string()
                    .with_description("Project the role belongs to.")
                    .with_force_new()
                    .with_validator(Validator::Id),
            )
    }

    fn connection_uri_schema() -> Schema {
        Schema::v0()
            .with_description("Retrieves direct and pooled connection URIs for a database and role.")
            .with_attribute(
                "id",
                Attribute::computed_string()
                    .with_description("Identifier of the connection URI lookup."),
            )
            .with_attribute(
                "project_id",
                Attribute::required_string()
                    .with_description("Project to retrieve the connection URI for.")
                    .with_validator(Validator::Id),
            )
            .with_attribute(
                "branch_id",
                Attribute::optional_string()
                    .with_description(
                        "Branch to retrieve the connection URI for. Defaults to the default branch.",
                    )
                    .with_validator(Validator::Id),
            )
            .with_attribute(
                "endpoint_id",
                Attribute::optional_string()
                    .with_description(
                        "Endpoint to retrieve the connection URI for. Defaults to the branch's \
                         read-write endpoint.",
                    )
                    .with_validator(Validator::Id),
            )
            .with_attribute(
                "database_name",
                Attribute::required_string()
                    .with_description("Name of the database.")
                    .with_validator(Validator::MinLength(1)),
            )
            .with_attribute(
                "role_name",
                Attribute::required_string()
                    .with_description("Name of the role.")
                    .with_validator(Validator::MinLength(1)),
            )
            .with_attribute(
                "uri",
                Attribute::computed_string()
                    .with_description("Direct connection URI.")
                    .sensitive(),
            )
            .with_attribute(
                "pooled_uri",
                Attribute::computed_string()
                    .with_description("Pooled connection URI.")
                    .sensitive(),
            )
    }
}

#[async_trait::async_trait]
impl ProviderService for NeonProvider {
    fn schema(&self) -> ProviderSchema {
        ProviderSchema::new()
            .with_provider_config(
                Schema::v0()
                    .with_attribute(
                        "token",
                        Attribute::optional_string()
                            .with_description(
                                "The token used to authenticate with Neon. Falls back to the \
                                 NEON_TOKEN environment variable.",
                            )
                            .sensitive(),
                    )
                    .with_attribute(
                        "base_url",
                        Attribute::optional_string()
                            .with_description("Base URL of the control-plane API."),
                    ),
            )
            .with_resource(RESOURCE_PROJECT, Self::project_schema())
            .with_resource(RESOURCE_BRANCH, Self::branch_schema())
            .with_resource(RESOURCE_ENDPOINT, Self::endpoint_schema())
            .with_resource(RESOURCE_DATABASE, Self::database_schema())
            .with_resource(RESOURCE_ROLE, Self::role_schema())
            .with_data_source(DATA_SOURCE_CONNECTION_URI, Self::connection_uri_schema())
    }

    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let config: ProviderConfig = serde_json::from_value(config)?;
        let client = config.build_client()?;

        *self.client.write().expect("client lock poisoned") = Some(client);
        info!("provider configured");

        Ok(vec![])
    }

    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let schema = self.schema();
        let resource_schema = schema
            .resources
            .get(resource_type)
            .ok_or_else(|| ProviderError::UnknownResource(resource_type.to_string()))?;

        Ok(validation::validate(resource_schema, &config))
    }

    async fn create(&self, resource_type: &str, planned: Value) -> Result<Value, ProviderError> {
        let client = self.client()?;

        match resource_type {
            RESOURCE_PROJECT => {
                let spec: ProjectSpec = serde_json::from_value(planned)?;
                let state = ProjectResource::new(&client).create(&spec).await?;
                Ok(serde_json::to_value(state)?)
            }
            RESOURCE_BRANCH => {
                let spec: BranchSpec = serde_json::from_value(planned)?;
                let state = BranchResource::new(&client).create(&spec).await?;
                Ok(serde_json::to_value(state)?)
            }
            RESOURCE_ENDPOINT => {
                let spec: EndpointSpec = serde_json::from_value(planned)?;
                let state = EndpointResource::new(&client).create(&spec).await?;
                Ok(serde_json::to_value(state)?)
            }
            RESOURCE_DATABASE => {
                let spec: DatabaseSpec = serde_json::from_value(planned)?;
                let state = DatabaseResource::new(&client).create(&spec).await?;
                Ok(serde_json::to_value(state)?)
            }
            RESOURCE_ROLE => {
                let spec: RoleSpec = serde_json::from_value(planned)?;
                let state = RoleResource::new(&client).create(&spec).await?;
                Ok(serde_json::to_value(state)?)
            }
            other => Err(ProviderError::UnknownResource(other.to_string())),
        }
    }

    async fn read(&self, resource_type: &str, current: Value) -> Result<Value, ProviderError> {
        let client = self.client()?;

        match resource_type {
            RESOURCE_PROJECT => {
                let prior: ProjectState = serde_json::from_value(current)?;
                let state = ProjectResource::new(&client).read(&prior).await?;
                Ok(serde_json::to_value(state)?)
            }
            RESOURCE_BRANCH => {
                let prior: BranchState = serde_json::from_value(current)?;
                let state = BranchResource::new(&client).read(&prior).await?;
                Ok(serde_json::to_value(state)?)
            }
            RESOURCE_ENDPOINT => {
                let prior: EndpointState = serde_json::from_value(current)?;
                let state = EndpointResource::new(&client).read(&prior).await?;
                Ok(serde_json::to_value(state)?)
            }
            RESOURCE_DATABASE => {
                let prior: DatabaseState = serde_json::from_value(current)?;
                let state = DatabaseResource::new(&client).read(&prior).await?;
                Ok(serde_json::to_value(state)?)
            }
            RESOURCE_ROLE => {
                let prior: RoleState = serde_json::from_value(current)?;
                let state = RoleResource::new(&client).read(&prior).await?;
                Ok(serde_json::to_value(state)?)
            }
            other => Err(ProviderError::UnknownResource(other.to_string())),
        }
    }

    async fn update(
        &self,
        resource_type: &str,
        prior: Value,
        planned: Value,
    ) -> Result<Value, ProviderError> {
        let client = self.client()?;

        match resource_type {
            RESOURCE_PROJECT => {
                let prior: ProjectState = serde_json::from_value(prior)?;
                let spec: ProjectSpec = serde_json::from_value(planned)?;
                let state = ProjectResource::new(&client).update(&prior, &spec).await?;
                Ok(serde_json::to_value(state)?)
            }
            RESOURCE_BRANCH => {
                let prior: BranchState = serde_json::from_value(prior)?;
                let spec: BranchSpec = serde_json::from_value(planned)?;
                let state = BranchResource::new(&client).update(&prior, &spec).await?;
                Ok(serde_json::to_value(state)?)
            }
            RESOURCE_ENDPOINT => {
                let prior: EndpointState = serde_json::from_value(prior)?;
                let spec: EndpointSpec = serde_json::from_value(planned)?;
                let state = EndpointResource::new(&client).update(&prior, &spec).await?;
                Ok(serde_json::to_value(state)?)
            }
            RESOURCE_DATABASE => {
                let prior: DatabaseState = serde_json::from_value(prior)?;
                let spec: DatabaseSpec = serde_json::from_value(planned)?;
                let state = DatabaseResource::new(&client).update(&prior, &spec).await?;
                Ok(serde_json::to_value(state)?)
            }
            RESOURCE_ROLE => {
                let prior: RoleState = serde_json::from_value(prior)?;
                let state = RoleResource::new(&client).update(&prior).await?;
                Ok(serde_json::to_value(state)?)
            }
            other => Err(ProviderError::UnknownResource(other.to_string())),
        }
    }

    async fn delete(&self, resource_type: &str, current: Value) -> Result<(), ProviderError> {
        let client = self.client()?;

        match resource_type {
            RESOURCE_PROJECT => {
                let state: ProjectState = serde_json::from_value(current)?;
                ProjectResource::new(&client).delete(&state).await
            }
            RESOURCE_BRANCH => {
                let state: BranchState = serde_json::from_value(current)?;
                BranchResource::new(&client).delete(&state).await
            }
            RESOURCE_ENDPOINT => {
                let state: EndpointState = serde_json::from_value(current)?;
                EndpointResource::new(&client).delete(&state).await
            }
            RESOURCE_DATABASE => {
                let state: DatabaseState = serde_json::from_value(current)?;
                DatabaseResource::new(&client).delete(&state).await
            }
            RESOURCE_ROLE => {
                let state: RoleState = serde_json::from_value(current)?;
                RoleResource::new(&client).delete(&state).await
            }
            other => Err(ProviderError::UnknownResource(other.to_string())),
        }
    }

    async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Value, ProviderError> {
        let state = match resource_type {
            RESOURCE_PROJECT => serde_json::to_value(ProjectResource::import_id(id)?)?,
            RESOURCE_BRANCH => serde_json::to_value(BranchResource::import_id(id)?)?,
            RESOURCE_ENDPOINT => serde_json::to_value(EndpointResource::import_id(id)?)?,
            RESOURCE_DATABASE => serde_json::to_value(DatabaseResource::import_id(id)?)?,
            RESOURCE_ROLE => serde_json::to_value(RoleResource::import_id(id)?)?,
            other => return Err(ProviderError::UnknownResource(other.to_string())),
        };

        Ok(state)
    }

    async fn read_data_source(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Value, ProviderError> {
        let client = self.client()?;

        match data_source_type {
            DATA_SOURCE_CONNECTION_URI => {
                let query: ConnectionUriQuery = serde_json::from_value(config)?;
                let state = ConnectionUriDataSource::new(&client).read(&query).await?;
                Ok(serde_json::to_value(state)?)
            }
            other => Err(ProviderError::UnknownResource(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metadata_lists_all_types() {
        let provider = NeonProvider::new();
        let metadata = provider.metadata();

        assert_eq!(
            metadata.resources,
            vec![
                RESOURCE_BRANCH,
                RESOURCE_DATABASE,
                RESOURCE_ENDPOINT,
                RESOURCE_PROJECT,
                RESOURCE_ROLE,
            ]
        );
        assert_eq!(metadata.data_sources, vec![DATA_SOURCE_CONNECTION_URI]);
    }

    #[test]
    fn test_sensitive_attributes() {
        let provider = NeonProvider::new();
        let schema = provider.schema();

        assert!(schema.provider.attributes["token"].flags.sensitive);
        assert!(schema.resources[RESOURCE_ROLE].attributes["password"].flags.sensitive);
        assert!(schema.data_sources[DATA_SOURCE_CONNECTION_URI].attributes["uri"].flags.sensitive);
    }

    #[tokio::test]
    async fn test_unconfigured_provider_errors() {
        let provider = NeonProvider::new();
        let err = provider
            .create(RESOURCE_PROJECT, json!({ "name": "x", "region_id": "r" }))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_unknown_resource_type() {
        let provider = NeonProvider::with_client(crate::client::Client::new("t"));
        let err = provider.create("neon_cluster", json!({})).await.unwrap_err();
        assert!(matches!(err, ProviderError::UnknownResource(_)));

        let err = provider
            .read_data_source("neon_cluster", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnknownResource(_)));
    }

    #[tokio::test]
    async fn test_validate_resource_config() {
        let provider = NeonProvider::new();

        let diagnostics = provider
            .validate_resource_config(
                RESOURCE_PROJECT,
                json!({ "name": "mine", "region_id": "aws-us-east-2" }),
            )
            .await
            .unwrap();
        assert!(diagnostics.is_empty());

        let diagnostics = provider
            .validate_resource_config(
                RESOURCE_PROJECT,
                json!({ "name": "mine", "region_id": "aws-us-east-2", "pg_version": 12 }),
            )
            .await
            .unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute, Some("pg_version".to_string()));

        let err = provider
            .validate_resource_config("neon_cluster", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnknownResource(_)));
    }

    #[tokio::test]
    async fn test_import_parses_identifiers() {
        let provider = NeonProvider::new();

        let state = provider
            .import_resource(RESOURCE_DATABASE, "cool-project:br-quiet-sea:appdb")
            .await
            .unwrap();
        assert_eq!(state["project_id"], "cool-project");
        assert_eq!(state["branch_id"], "br-quiet-sea");
        assert_eq!(state["name"], "appdb");

        let err = provider
            .import_resource(RESOURCE_DATABASE, "not-enough")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
    }
}
