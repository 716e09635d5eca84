//! Remote platform port for deployment history, detail and rollback.

use crate::deployment::domain::{
    DeploymentFields, DeploymentId, RollbackConfirmation, ServiceName,
};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for remote deployment operations.
pub type RemoteDeploymentsResult<T> = Result<T, RemoteDeploymentsError>;

/// Opaque continuation token for paginated history listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageCursor(String);

impl PageCursor {
    /// Wraps a platform-issued cursor.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the cursor as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageCursor {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// One page of a history listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryPage {
    /// Deployments on this page, in platform order.
    pub records: Vec<DeploymentFields>,
    /// Cursor for the following page, if any.
    pub next: Option<PageCursor>,
}

/// Typed contract of the remote platform holding deployment state.
///
/// Implementations own credentials, headers, timeouts and any wire-level
/// retry policy. None of these calls are retried by callers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteDeployments: Send + Sync {
    /// Fetches one page of the service's deployment listing.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteDeploymentsError::ServiceNotFound`] when the platform
    /// does not know the service.
    async fn history_page(
        &self,
        service: &ServiceName,
        cursor: Option<PageCursor>,
    ) -> RemoteDeploymentsResult<HistoryPage>;

    /// Fetches full metadata and resources for one deployment.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteDeploymentsError::DeploymentNotFound`] when the
    /// deployment does not exist for the service.
    async fn detail(
        &self,
        service: &ServiceName,
        id: &DeploymentId,
    ) -> RemoteDeploymentsResult<DeploymentFields>;

    /// Fetches the script source as deployed by `id`.
    ///
    /// Returns `None` when the platform has no script body for it.
    async fn script_content(
        &self,
        service: &ServiceName,
        id: &DeploymentId,
    ) -> RemoteDeploymentsResult<Option<String>>;

    /// Asks the platform to roll the service back to `target`.
    ///
    /// This is the only mutating call. It carries no script payload.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteDeploymentsError::DeploymentNotFound`] when the target
    /// is unknown and [`RemoteDeploymentsError::Rejected`] for any other
    /// refusal.
    async fn rollback(
        &self,
        service: &ServiceName,
        target: &DeploymentId,
        message: Option<String>,
    ) -> RemoteDeploymentsResult<RollbackConfirmation>;
}

/// Errors returned by remote platform adapters.
#[derive(Debug, Clone, Error)]
pub enum RemoteDeploymentsError {
    /// The platform has no service with this name.
    #[error("service not found: {0}")]
    ServiceNotFound(ServiceName),

    /// The platform has no such deployment for the service.
    #[error("deployment {id} not found for service {service}")]
    DeploymentNotFound {
        /// Service queried.
        service: ServiceName,
        /// Deployment requested.
        id: DeploymentId,
    },

    /// The platform refused the request.
    #[error("request rejected by the platform: {reason}")]
    Rejected {
        /// Reason text reported by the platform.
        reason: String,
    },

    /// The response could not be decoded.
    #[error("invalid response payload: {0}")]
    InvalidPayload(Arc<dyn std::error::Error + Send + Sync>),

    /// Network or service failure that may succeed if tried again.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl RemoteDeploymentsError {
    /// Wraps a payload decoding failure.
    pub fn invalid_payload(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPayload(Arc::new(err))
    }

    /// Wraps a transport failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
