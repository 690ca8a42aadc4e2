//! Neon Provider
//!
//! This crate is the provider core for managing [Neon](https://neon.tech)
//! serverless Postgres resources (projects, branches, compute endpoints,
//! databases, and roles) through the platform's REST control-plane API.
//! It is built to sit behind a declarative infrastructure-as-code host:
//! the host owns planning, diffing, and state persistence; this crate owns
//! the reconciliation of declared configuration into API calls.
//!
//! # Overview
//!
//! - **Client**: authenticated JSON-over-HTTPS transport with a
//!   request/response codec and the operation-completion poller the
//!   platform's asynchronous provisioning model requires
//! - **API types**: wire-format mirrors of the control plane's request
//!   and response bodies
//! - **Resources**: one reconciler per resource type, composing the
//!   client into Create/Read/Update/Delete/Import behavior
//! - **Provider**: the [`ProviderService`] trait a host drives, and
//!   [`NeonProvider`] implementing it
//! - **Schema & validation**: attribute declarations and configuration
//!   validation mirroring the platform's own constraints
//! - **Logging**: integration with `tracing` for structured logging
//!
//! # Quick Start
//!
//! ```ignore
//! use neon_provider::{NeonProvider, ProviderService};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), neon_provider::ProviderError> {
//! let provider = NeonProvider::new();
//! provider.configure(json!({ "token": "neon-api-token" })).await?;
//!
//! let state = provider
//!     .create("neon_project", json!({
//!         "name": "my-project",
//!         "region_id": "aws-us-east-2"
//!     }))
//!     .await?;
//!
//! println!("created project {}", state["id"]);
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency model
//!
//! Each resource operation is a single sequential chain of HTTP calls and
//! poller sleeps; there is no parallelism within an operation. The host
//! may drive operations for independent resources concurrently;
//! correctness for concurrent mutations of the same project is delegated
//! to the platform's per-project operation serialization, which is what
//! the poller waits on.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod testing;
pub mod validation;

// Re-export main types at crate root
pub use client::{Client, PollConfig, DEFAULT_BASE_URL};
pub use config::{ProviderConfig, TOKEN_ENV_VAR};
pub use error::ProviderError;
pub use logging::{init_logging, try_init_logging};
pub use provider::{NeonProvider, ProviderService};
pub use schema::{Diagnostic, ProviderSchema};
pub use validation::{is_valid, validate, validate_result};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tracing;
