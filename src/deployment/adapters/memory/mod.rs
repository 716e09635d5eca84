//! In-memory adapter implementations for testing.

mod platform;

pub use platform::{InMemoryDeploymentPlatform, ScriptUpload};
