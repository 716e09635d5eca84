//! Shared world state for deployment rollback BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use quartermaster::deployment::{
    adapters::memory::InMemoryDeploymentPlatform,
    domain::{DeploymentId, ServiceName},
    services::{
        DeploymentDetail, DeploymentLifecycleError, DeploymentLifecycleService,
        DeploymentListing, RollbackOutcome,
    },
};
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestLifecycleService =
    DeploymentLifecycleService<InMemoryDeploymentPlatform, InMemoryDeploymentPlatform>;

/// Scenario world for deployment behaviour tests.
pub struct DeploymentWorld {
    pub platform: Arc<InMemoryDeploymentPlatform>,
    pub service: TestLifecycleService,
    pub service_name: Option<ServiceName>,
    pub published: HashMap<String, DeploymentId>,
    pub last_listing: Option<Result<DeploymentListing, DeploymentLifecycleError>>,
    pub last_detail: Option<Result<DeploymentDetail, DeploymentLifecycleError>>,
    pub last_rollback: Option<Result<RollbackOutcome, DeploymentLifecycleError>>,
}

impl DeploymentWorld {
    /// Creates a world backed by an in-memory platform with one-record pages.
    #[must_use]
    pub fn new() -> Self {
        let platform = Arc::new(InMemoryDeploymentPlatform::new().with_page_size(1));
        let service = DeploymentLifecycleService::new(Arc::clone(&platform), Arc::clone(&platform));

        Self {
            platform,
            service,
            service_name: None,
            published: HashMap::new(),
            last_listing: None,
            last_detail: None,
            last_rollback: None,
        }
    }

    /// Returns the service configured by the background step.
    pub fn service_name(&self) -> Result<&ServiceName, eyre::Report> {
        self.service_name
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing service name in scenario world"))
    }

    /// Maps a scenario label to the identifier the platform assigned.
    ///
    /// Labels that were never published are passed through unchanged.
    #[must_use]
    pub fn resolve(&self, label: &str) -> String {
        self.published
            .get(label)
            .map_or_else(|| label.to_owned(), |id| id.as_str().to_owned())
    }
}

impl Default for DeploymentWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> DeploymentWorld {
    DeploymentWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
