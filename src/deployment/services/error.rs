//! Service-level error taxonomy for deployment lifecycle operations.

use crate::deployment::{
    domain::{
        DeploymentDomainError, DeploymentId, MalformedRecordError, RecordField, ServiceName,
    },
    ports::RemoteDeploymentsError,
};
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by the deployment lifecycle services.
///
/// Every variant names the service and, where one is involved, the
/// deployment, so the message is actionable on its own.
#[derive(Debug, Clone, Error)]
pub enum DeploymentLifecycleError {
    /// Input or domain validation failed.
    #[error(transparent)]
    Domain(#[from] DeploymentDomainError),

    /// The platform returned a record with missing or ill-shaped fields.
    #[error("service {service}: {source}")]
    MalformedRecord {
        /// Service queried.
        service: ServiceName,
        /// Violated constraint.
        #[source]
        source: MalformedRecordError,
    },

    /// The platform has no service with this name.
    #[error("service {0} was not found")]
    ServiceNotFound(ServiceName),

    /// The platform has no such deployment for the service.
    #[error("deployment {id} was not found for service {service}")]
    DeploymentNotFound {
        /// Service queried.
        service: ServiceName,
        /// Deployment requested.
        id: DeploymentId,
    },

    /// The rollback target is not usable as a deployment identifier.
    #[error("invalid rollback target for service {service}: {reason}")]
    InvalidTarget {
        /// Service being rolled back.
        service: ServiceName,
        /// Violated constraint.
        reason: String,
    },

    /// The rollback target could not be found, or its submission could not
    /// be delivered.
    #[error("rollback of service {service} to deployment {target} failed: {reason}")]
    RollbackNotFound {
        /// Service being rolled back.
        service: ServiceName,
        /// Requested target.
        target: DeploymentId,
        /// Platform or transport detail.
        reason: String,
    },

    /// The platform refused the rollback or confirmed it with an unusable
    /// payload.
    #[error("rollback of service {service} to deployment {target} was rejected: {reason}")]
    RollbackRejected {
        /// Service being rolled back.
        service: ServiceName,
        /// Requested target.
        target: DeploymentId,
        /// Reason text reported by the platform.
        reason: String,
    },

    /// The platform refused a read. Repeating it unchanged will not help.
    #[error("the platform refused the request for service {service}: {reason}")]
    FetchRefused {
        /// Service queried.
        service: ServiceName,
        /// Reason text reported by the platform.
        reason: String,
    },

    /// A read failed in a way that may succeed if tried again.
    #[error("fetching deployments for service {service} failed: {source}")]
    TransientFetch {
        /// Service queried.
        service: ServiceName,
        /// Underlying transport failure.
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for deployment lifecycle service operations.
pub type DeploymentLifecycleResult<T> = Result<T, DeploymentLifecycleError>;

impl DeploymentLifecycleError {
    /// Maps a remote failure observed while reading deployment state.
    pub(crate) fn from_fetch(service: &ServiceName, err: RemoteDeploymentsError) -> Self {
        match err {
            RemoteDeploymentsError::ServiceNotFound(name) => Self::ServiceNotFound(name),
            RemoteDeploymentsError::DeploymentNotFound { service: name, id } => {
                Self::DeploymentNotFound { service: name, id }
            }
            RemoteDeploymentsError::InvalidPayload(cause) => Self::MalformedRecord {
                service: service.clone(),
                source: MalformedRecordError::invalid(
                    RecordField::Payload,
                    format!("could not be decoded: {cause}"),
                ),
            },
            RemoteDeploymentsError::Rejected { reason } => Self::FetchRefused {
                service: service.clone(),
                reason,
            },
            RemoteDeploymentsError::Transport(source) => Self::TransientFetch {
                service: service.clone(),
                source,
            },
        }
    }

    /// Maps a remote failure observed after a rollback was submitted.
    pub(crate) fn from_rollback(
        service: &ServiceName,
        target: &DeploymentId,
        err: RemoteDeploymentsError,
    ) -> Self {
        match err {
            RemoteDeploymentsError::DeploymentNotFound { .. } => Self::RollbackNotFound {
                service: service.clone(),
                target: target.clone(),
                reason: "the platform has no such deployment".to_owned(),
            },
            RemoteDeploymentsError::Transport(cause) => Self::RollbackNotFound {
                service: service.clone(),
                target: target.clone(),
                reason: format!("submission was not acknowledged: {cause}"),
            },
            RemoteDeploymentsError::Rejected { reason } => Self::RollbackRejected {
                service: service.clone(),
                target: target.clone(),
                reason,
            },
            RemoteDeploymentsError::ServiceNotFound(name) => Self::ServiceNotFound(name),
            RemoteDeploymentsError::InvalidPayload(cause) => Self::RollbackRejected {
                service: service.clone(),
                target: target.clone(),
                reason: format!("confirmation could not be decoded: {cause}"),
            },
        }
    }
}
