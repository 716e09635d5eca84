//! Adapters for the deployment platform ports.
//!
//! - [`http::HttpDeploymentsClient`]: reqwest client for the hosted
//!   deployments API
//! - [`memory::InMemoryDeploymentPlatform`]: thread-safe in-memory platform
//!   for tests and local dry runs

pub mod http;
pub mod memory;
