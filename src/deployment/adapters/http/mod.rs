//! HTTP adapter for the hosted deployments API.
//!
//! [`HttpDeploymentsClient`] implements both [`RemoteDeployments`] and
//! [`ScriptMetadataSource`] against the account-scoped REST endpoints.
//!
//! [`RemoteDeployments`]: crate::deployment::ports::RemoteDeployments
//! [`ScriptMetadataSource`]: crate::deployment::ports::ScriptMetadataSource

mod client;
mod config;
mod wire;

pub use client::HttpDeploymentsClient;
pub use config::{ClientConfig, ClientConfigError, DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS};
