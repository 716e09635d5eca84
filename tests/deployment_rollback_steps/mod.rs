//! Step definitions for deployment listing and rollback scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
