//! Quartermaster: deployment lifecycle manager for serverless scripts.
//!
//! This crate lists the deployment history of a script service, reports
//! which deployment is active, shows deployment details and performs
//! single-shot rollbacks against a remote deployment platform.
//!
//! # Architecture
//!
//! Quartermaster follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (HTTP API, in-memory)
//!
//! # Modules
//!
//! - [`deployment`]: Deployment history, active resolution and rollback

pub mod deployment;
