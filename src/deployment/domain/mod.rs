//! Domain model for deployment lifecycle management.
//!
//! Deployment records are immutable values created by the remote platform.
//! The domain orders them into a history, derives which one is active, and
//! tracks the phases of a rollback without touching any infrastructure.

mod active;
mod error;
mod history;
mod ids;
mod record;
mod resources;
mod rollback;
mod source;

pub use active::{ActiveBasis, ActiveDeployment, ActiveSignal, resolve_active};
pub use error::{DeploymentDomainError, MalformedRecordError, RecordField};
pub use history::DeploymentHistory;
pub use ids::{Author, DeploymentId, DeploymentNumber, ServiceName};
pub use record::{DeploymentFields, DeploymentRecord, RollbackConfirmation, RollbackMetadata};
pub use resources::{Binding, DeploymentResources, ScriptResource};
pub use rollback::{RollbackAttempt, RollbackPhase};
pub use source::DeploymentSource;
