//! Command-facing facade over history, detail and rollback services.

use super::{
    DeploymentDetail, DeploymentHistoryService, DeploymentLifecycleError,
    DeploymentLifecycleResult, RollbackOrchestrator, RollbackOutcome, RollbackRequest,
};
use crate::deployment::{
    domain::{
        ActiveBasis, ActiveSignal, DeploymentHistory, DeploymentId, ServiceName, resolve_active,
    },
    ports::{RemoteDeployments, ScriptMetadataSource},
};
use std::sync::Arc;
use tracing::warn;

/// Result of listing a service's deployments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentListing {
    /// The service exists but has never been deployed.
    NeverDeployed {
        /// Service queried.
        service: ServiceName,
    },
    /// The service has at least one deployment.
    Deployed {
        /// Full ordered history.
        history: DeploymentHistory,
        /// Identifier of the active deployment.
        active: DeploymentId,
        /// How the active deployment was chosen.
        basis: ActiveBasis,
    },
}

/// Deployment lifecycle orchestration service.
#[derive(Clone)]
pub struct DeploymentLifecycleService<R, M>
where
    R: RemoteDeployments,
    M: ScriptMetadataSource,
{
    history: DeploymentHistoryService<R>,
    rollbacks: RollbackOrchestrator<R>,
    metadata: Arc<M>,
}

impl<R, M> DeploymentLifecycleService<R, M>
where
    R: RemoteDeployments,
    M: ScriptMetadataSource,
{
    /// Creates a lifecycle service.
    #[must_use]
    pub fn new(remote: Arc<R>, metadata: Arc<M>) -> Self {
        Self {
            history: DeploymentHistoryService::new(Arc::clone(&remote)),
            rollbacks: RollbackOrchestrator::new(remote),
            metadata,
        }
    }

    /// Lists the deployments of a service and marks the active one.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentLifecycleError`] when history or routing metadata
    /// cannot be fetched or decoded.
    pub async fn list_deployments(
        &self,
        service: &ServiceName,
    ) -> DeploymentLifecycleResult<DeploymentListing> {
        let history = self.history.fetch_history(service).await?;
        if history.is_empty() {
            return Ok(DeploymentListing::NeverDeployed {
                service: service.clone(),
            });
        }

        let signal = ActiveSignal::from(
            self.metadata
                .active_deployment(service)
                .await
                .map_err(|err| DeploymentLifecycleError::from_fetch(service, err))?,
        );
        let active = resolve_active(&history, &signal)?;
        if let ActiveSignal::Reported(reported) = &signal
            && active.basis == ActiveBasis::LatestByNumber
        {
            warn!(
                service = %service,
                reported = %reported,
                chosen = %active.record.id(),
                "reported active deployment is not in the history; using the latest"
            );
        }
        let active_id = active.record.id().clone();
        let basis = active.basis;

        Ok(DeploymentListing::Deployed {
            history,
            active: active_id,
            basis,
        })
    }

    /// Shows one deployment with its resources and script.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentLifecycleError::Domain`] when `id` is blank,
    /// [`DeploymentLifecycleError::DeploymentNotFound`] when it does not
    /// exist, and fetch errors otherwise.
    pub async fn show_deployment(
        &self,
        service: &ServiceName,
        id: &str,
    ) -> DeploymentLifecycleResult<DeploymentDetail> {
        let deployment_id = DeploymentId::new(id)?;
        self.history
            .fetch_detail_with_script(service, &deployment_id)
            .await
    }

    /// Rolls a service back to `target`.
    ///
    /// No history is fetched beforehand; the platform validates the target.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`RollbackOrchestrator::rollback`].
    pub async fn rollback(
        &self,
        service: &ServiceName,
        target: &str,
        message: Option<String>,
    ) -> DeploymentLifecycleResult<RollbackOutcome> {
        let mut request = RollbackRequest::new(service.clone(), target);
        if let Some(text) = message {
            request = request.with_message(text);
        }
        self.rollbacks.rollback(request).await
    }

    /// Returns the underlying history service.
    #[must_use]
    pub const fn history(&self) -> &DeploymentHistoryService<R> {
        &self.history
    }

    /// Returns the underlying rollback orchestrator.
    #[must_use]
    pub const fn rollbacks(&self) -> &RollbackOrchestrator<R> {
        &self.rollbacks
    }
}
