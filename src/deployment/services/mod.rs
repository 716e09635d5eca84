//! Application services for deployment lifecycle orchestration.

mod error;
mod history;
mod lifecycle;
mod rollback;

pub use error::{DeploymentLifecycleError, DeploymentLifecycleResult};
pub use history::{DeploymentDetail, DeploymentHistoryService};
pub use lifecycle::{DeploymentListing, DeploymentLifecycleService};
pub use rollback::{RollbackOrchestrator, RollbackOutcome, RollbackRequest};
