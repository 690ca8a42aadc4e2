//! Provider configuration and credential resolution.

use serde::{Deserialize, Serialize};

use crate::client::{Client, DEFAULT_BASE_URL};
use crate::error::ProviderError;

/// Environment variable consulted when no token is set in the provider
/// configuration block.
pub const TOKEN_ENV_VAR: &str = "NEON_TOKEN";

/// Configuration accepted by the provider block.
///
/// The host hands this over as already-typed values; nothing here has been
/// sent over the network yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API token used to authenticate with the control plane. Falls back
    /// to the `NEON_TOKEN` environment variable when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Base URL of the control-plane API. Defaults to the public console
    /// endpoint; overridable for tests and private deployments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl ProviderConfig {
    /// Resolve the API token: the configuration attribute wins, then the
    /// environment variable. Absence of both is a configuration error.
    pub fn resolve_token(&self) -> Result<String, ProviderError> {
        if let Some(token) = self.token.as_deref() {
            if !token.is_empty() {
                return Ok(token.to_string());
            }
        }

        match std::env::var(TOKEN_ENV_VAR) {
            Ok(token) if !token.is_empty() => Ok(token),
            _ => Err(ProviderError::Configuration(format!(
                "Required token could not be found. Set the token in the provider \
                 configuration block or via the `{TOKEN_ENV_VAR}` environment variable."
            ))),
        }
    }

    /// Build the authenticated API client from this configuration.
    pub fn build_client(&self) -> Result<Client, ProviderError> {
        let token = self.resolve_token()?;
        let base_url = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        Ok(Client::new(token).with_base_url(base_url))
    }
}
