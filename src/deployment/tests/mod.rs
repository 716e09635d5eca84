//! Unit tests for the deployment module.
//!
//! Tests are organised by concern: domain validation and ordering, the
//! read-side services, and rollback orchestration.

mod domain_tests;
mod support;
