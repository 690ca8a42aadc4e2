//! Testing utilities for provider implementations.
//!
//! [`ProviderTester`] wraps a [`ProviderService`] and exposes the same
//! operations a declarative host would drive, without any host process.
//! Point the provider's client at a mock control plane (e.g. an
//! `httpmock` server via the provider's `base_url` configuration) and
//! exercise full reconciliation flows in-process.
//!
//! # Example
//!
//! ```ignore
//! use neon_provider::testing::ProviderTester;
//! use neon_provider::NeonProvider;
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn test_create_database() {
//!     let tester = ProviderTester::new(NeonProvider::new());
//!     tester
//!         .configure(json!({ "token": "test", "base_url": mock_server.base_url() }))
//!         .await
//!         .unwrap();
//!
//!     let state = tester
//!         .create("neon_database", json!({
//!             "project_id": "cool-project",
//!             "branch_id": "br-quiet-sea",
//!             "name": "appdb",
//!             "owner_name": "app_owner"
//!         }))
//!         .await
//!         .unwrap();
//!
//!     assert_eq!(state["name"], "appdb");
//! }
//! ```

use serde_json::Value;

use crate::error::ProviderError;
use crate::provider::ProviderService;
use crate::schema::{Diagnostic, DiagnosticSeverity, ProviderSchema};

/// A test harness for provider implementations.
pub struct ProviderTester<P: ProviderService> {
    provider: P,
}

impl<P: ProviderService> ProviderTester<P> {
    /// Create a new tester for the given provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Get a reference to the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Get the provider's schema.
    pub fn schema(&self) -> ProviderSchema {
        self.provider.schema()
    }

    /// Get the list of resource type names.
    pub fn resource_types(&self) -> Vec<String> {
        self.provider.metadata().resources
    }

    /// Get the list of data source type names.
    pub fn data_source_types(&self) -> Vec<String> {
        self.provider.metadata().data_sources
    }

    /// Validate the provider configuration.
    pub async fn validate_provider_config(
        &self,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        self.provider.validate_provider_config(config).await
    }

    /// Configure the provider, failing on any error diagnostic.
    pub async fn configure(&self, config: Value) -> Result<(), ProviderError> {
        let diagnostics = self.provider.configure(config).await?;
        let errors: Vec<&Diagnostic> = diagnostics
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Error)
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProviderError::Configuration(format!(
                "configure returned error diagnostics: {:?}",
                errors
            )))
        }
    }

    /// Validate a resource's configuration.
    pub async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        self.provider
            .validate_resource_config(resource_type, config)
            .await
    }

    /// Create a resource.
    pub async fn create(
        &self,
        resource_type: &str,
        planned: Value,
    ) -> Result<Value, ProviderError> {
        self.provider.create(resource_type, planned).await
    }

    /// Read a resource.
    pub async fn read(&self, resource_type: &str, current: Value) -> Result<Value, ProviderError> {
        self.provider.read(resource_type, current).await
    }

    /// Update a resource.
    pub async fn update(
        &self,
        resource_type: &str,
        prior: Value,
        planned: Value,
    ) -> Result<Value, ProviderError> {
        self.provider.update(resource_type, prior, planned).await
    }

    /// Delete a resource.
    pub async fn delete(&self, resource_type: &str, current: Value) -> Result<(), ProviderError> {
        self.provider.delete(resource_type, current).await
    }

    /// Import a resource by external identifier.
    pub async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Value, ProviderError> {
        self.provider.import_resource(resource_type, id).await
    }

    /// Read a data source.
    pub async fn read_data_source(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Value, ProviderError> {
        self.provider.read_data_source(data_source_type, config).await
    }
}

/// Assert that a diagnostic list contains no errors.
///
/// # Panics
///
/// Panics with the offending diagnostics if any error is present.
pub fn assert_no_errors(diagnostics: &[Diagnostic]) {
    let errors: Vec<&Diagnostic> = diagnostics
        .iter()
        .filter(|d| d.severity == DiagnosticSeverity::Error)
        .collect();
    assert!(errors.is_empty(), "unexpected error diagnostics: {:?}", errors);
}

/// Assert that a diagnostic list contains at least one error.
///
/// # Panics
///
/// Panics if no error diagnostic is present.
pub fn assert_has_errors(diagnostics: &[Diagnostic]) {
    assert!(
        diagnostics
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::Error),
        "expected at least one error diagnostic, got: {:?}",
        diagnostics
    );
}

/// Assert that some diagnostic mentions the given substring in its summary
/// or detail.
///
/// # Panics
///
/// Panics if no diagnostic matches.
pub fn assert_error_contains(diagnostics: &[Diagnostic], substring: &str) {
    let found = diagnostics.iter().any(|d| {
        d.summary.contains(substring)
            || d.detail.as_deref().is_some_and(|detail| detail.contains(substring))
    });
    assert!(
        found,
        "no diagnostic mentions {:?}, got: {:?}",
        substring, diagnostics
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::NeonProvider;

    #[test]
    fn test_tester_exposes_metadata() {
        let tester = ProviderTester::new(NeonProvider::new());
        assert!(tester
            .resource_types()
            .contains(&"neon_project".to_string()));
        assert!(tester
            .data_source_types()
            .contains(&"neon_connection_uri".to_string()));
        assert!(tester.schema().resources.contains_key("neon_branch"));
    }

    #[tokio::test]
    async fn test_validate_provider_config_passthrough() {
        let tester = ProviderTester::new(NeonProvider::new());
        let diagnostics = tester
            .validate_provider_config(serde_json::json!({ "token": "t" }))
            .await
            .unwrap();
        assert_no_errors(&diagnostics);

        let diagnostics = tester
            .validate_provider_config(serde_json::json!({ "token": 42 }))
            .await
            .unwrap();
        assert_has_errors(&diagnostics);
        assert_error_contains(&diagnostics, "Invalid type");
    }

    #[test]
    #[should_panic(expected = "unexpected error diagnostics")]
    fn test_assert_no_errors_panics() {
        assert_no_errors(&[Diagnostic::error("boom")]);
    }

    #[test]
    #[should_panic(expected = "expected at least one error")]
    fn test_assert_has_errors_panics() {
        assert_has_errors(&[Diagnostic::warning("just a warning")]);
    }
}
