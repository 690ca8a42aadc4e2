//! Authenticated HTTP client for the control-plane API.
//!
//! Three concerns live here:
//!
//! - **Transport**: every request gets the base URL, bearer token, and JSON
//!   content-negotiation headers injected, transparently to callers.
//! - **Codec**: [`Client::get`], [`Client::call`] and [`Client::delete_raw`]
//!   build requests, serialize bodies, classify response status, and decode
//!   response JSON.
//! - **Operation poller**: the platform provisions asynchronously after
//!   accepting a mutation and rejects overlapping mutations per project, so
//!   [`Client::await_project_ready`] blocks until the project's most recent
//!   operation reaches its terminal `finished` state before the next
//!   mutation is issued.
//!
//! There is no retry policy at this layer: a transient 5xx surfaces exactly
//! like a permanent 4xx, and only the poller loops.

use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::api::{Operation, OperationsOutput};
use crate::error::ProviderError;

/// Base URL of the public control-plane API.
pub const DEFAULT_BASE_URL: &str = "https://console.neon.tech/api/v2";

/// Terminal operation status the poller waits for.
pub(crate) const OPERATION_FINISHED: &str = "finished";

/// Endpoint state while the compute is still being provisioned.
pub(crate) const ENDPOINT_STATE_INIT: &str = "init";

/// Pacing for the operation-completion poller.
///
/// The defaults poll every three seconds for up to 120 attempts (about six
/// minutes). Exceeding the attempt budget is a
/// [`ProviderError::DeadlineExceeded`].
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Fixed delay between consecutive polls.
    pub interval: Duration,
    /// Maximum number of polls before giving up.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_attempts: 120,
        }
    }
}

/// Authenticated client for the control-plane API.
///
/// Holds the pooled HTTP client, the resolved bearer token, and the base
/// URL. Typed endpoint calls live in [`crate::api`]; reconcilers borrow a
/// `Client` and compose those calls.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    token: String,
    poll: PollConfig,
}

impl Client {
    /// Create a client for the public control plane.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
            poll: PollConfig::default(),
        }
    }

    /// Point the client at a different control-plane host. Trailing
    /// slashes are trimmed so paths can always start with `/`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        self.base_url = base_url;
        self
    }

    /// Override the operation-poller pacing.
    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Build a request for a relative path with auth and JSON headers set.
    pub(crate) fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
    }

    /// Send a prepared request, classifying any non-success status into
    /// [`ProviderError::Api`] with the raw response body.
    pub(crate) async fn send(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ProviderError> {
        let response = builder.send().await?;
        let status = response.status();

        if status.as_u16() >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    /// Decode a response body into `T`.
    pub(crate) async fn decode<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Issue a GET and decode the JSON response into `T`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ProviderError> {
        let response = self.send(self.request(Method::GET, path)).await?;
        self.decode(response).await
    }

    /// Issue a request with a JSON body and decode the response into `T`.
    pub async fn call<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ProviderError> {
        let response = self.send(self.request(method, path).json(body)).await?;
        self.decode(response).await
    }

    /// Issue a DELETE and return the raw response body.
    pub async fn delete_raw(&self, path: &str) -> Result<Vec<u8>, ProviderError> {
        let response = self.send(self.request(Method::DELETE, path)).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Block until the project's most recent operation has finished.
    ///
    /// Polls `GET /projects/{id}/operations?limit=1` at the configured
    /// interval. An empty operations list means nothing is in flight and
    /// counts as ready. Any request error aborts the wait immediately;
    /// exhausting the attempt budget yields
    /// [`ProviderError::DeadlineExceeded`] naming the last observed status.
    pub async fn await_project_ready(&self, project_id: &str) -> Result<(), ProviderError> {
        let mut last_status = String::from("unknown");

        for attempt in 0..self.poll.max_attempts {
            let output: OperationsOutput = self
                .get(&format!("/projects/{}/operations?limit=1", project_id))
                .await?;

            match pending_status(&output.operations) {
                None => return Ok(()),
                Some(status) => {
                    debug!(
                        project_id,
                        status, attempt, "waiting for project operation to finish"
                    );
                    last_status = status.to_string();
                }
            }

            tokio::time::sleep(self.poll.interval).await;
        }

        Err(ProviderError::DeadlineExceeded(format!(
            "project {} operation still {:?} after {} polls",
            project_id, last_status, self.poll.max_attempts
        )))
    }

    /// Block until an endpoint has left its `init` state.
    ///
    /// Freshly provisioned computes reject reconfiguration until startup
    /// completes, so endpoint updates poll the endpoint itself before
    /// issuing the PATCH.
    pub(crate) async fn await_endpoint_settled(
        &self,
        project_id: &str,
        endpoint_id: &str,
    ) -> Result<(), ProviderError> {
        for attempt in 0..self.poll.max_attempts {
            let endpoint = self.endpoint_get(project_id, endpoint_id).await?;

            if endpoint.current_state != ENDPOINT_STATE_INIT {
                return Ok(());
            }

            debug!(
                project_id,
                endpoint_id, attempt, "waiting for endpoint to leave init state"
            );
            tokio::time::sleep(self.poll.interval).await;
        }

        Err(ProviderError::DeadlineExceeded(format!(
            "endpoint {} still initializing after {} polls",
            endpoint_id, self.poll.max_attempts
        )))
    }
}

/// Inspect the most recent operation: `None` means the project is ready,
/// `Some(status)` carries the status still being waited on.
fn pending_status(operations: &[Operation]) -> Option<&str> {
    match operations.first() {
        None => None,
        Some(op) if op.status == OPERATION_FINISHED => None,
        Some(op) => Some(op.status.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operation(status: &str) -> Operation {
        Operation {
            id: "op-1".to_string(),
            action: "create_branch".to_string(),
            status: status.to_string(),
            endpoint_id: None,
            branch_id: None,
            project_id: "pr-1".to_string(),
        }
    }

    #[test]
    fn test_empty_operations_means_ready() {
        assert_eq!(pending_status(&[]), None);
    }

    #[test]
    fn test_finished_operation_means_ready() {
        assert_eq!(pending_status(&[operation("finished")]), None);
    }

    #[test]
    fn test_unfinished_operation_reports_status() {
        assert_eq!(pending_status(&[operation("running")]), Some("running"));
        assert_eq!(pending_status(&[operation("failed")]), Some("failed"));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = Client::new("t").with_base_url("http://127.0.0.1:4000/");
        assert_eq!(client.base_url, "http://127.0.0.1:4000");
    }
}
