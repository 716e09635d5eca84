//! Side-channel port reporting which deployment currently serves traffic.

use super::RemoteDeploymentsResult;
use crate::deployment::domain::{DeploymentId, ServiceName};
use async_trait::async_trait;

/// Source of the platform's routing signal for a service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScriptMetadataSource: Send + Sync {
    /// Returns the deployment the platform routes traffic to.
    ///
    /// Returns `None` when the platform does not expose an explicit signal.
    async fn active_deployment(
        &self,
        service: &ServiceName,
    ) -> RemoteDeploymentsResult<Option<DeploymentId>>;
}
