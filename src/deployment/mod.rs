//! Deployment lifecycle management for serverless scripts.
//!
//! Lists a service's deployment history, derives which deployment is
//! receiving traffic, shows one deployment in detail and rolls a service
//! back to an earlier deployment. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//! - Text rendering in [`presenter`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod presenter;
pub mod services;

#[cfg(test)]
mod tests;
