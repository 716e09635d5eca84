//! In-memory deployment platform for tests and local dry runs.

use crate::deployment::{
    domain::{
        Binding, DeploymentFields, DeploymentId, DeploymentResources, RollbackConfirmation,
        RollbackMetadata, ScriptResource, ServiceName,
    },
    ports::{
        HistoryPage, PageCursor, RemoteDeployments, RemoteDeploymentsError,
        RemoteDeploymentsResult, ScriptMetadataSource,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use mockable::{Clock, DefaultClock};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;
use uuid::Uuid;

const DEFAULT_PAGE_SIZE: usize = 10;
const DEFAULT_OPERATOR: &str = "operator@localhost";

/// Script upload accepted by [`InMemoryDeploymentPlatform::publish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptUpload {
    author: String,
    source: String,
    content: String,
    handlers: Vec<String>,
    bindings: Vec<Binding>,
}

impl ScriptUpload {
    /// Creates an upload of `content` by `author` from the command line tool.
    #[must_use]
    pub fn new(author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            source: "wrangler".to_owned(),
            content: content.into(),
            handlers: vec!["fetch".to_owned()],
            bindings: Vec::new(),
        }
    }

    /// Sets the originating tool.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Sets the exported handlers.
    #[must_use]
    pub fn with_handlers(mut self, handlers: impl IntoIterator<Item = String>) -> Self {
        self.handlers = handlers.into_iter().collect();
        self
    }

    /// Adds a binding.
    #[must_use]
    pub fn with_binding(mut self, binding: Binding) -> Self {
        self.bindings.push(binding);
        self
    }
}

/// In-memory stand-in for the remote deployment platform.
///
/// Publishing and rolling back append deployments with fresh identifiers;
/// nothing is ever edited in place. Listings are paginated with numeric
/// offset cursors so that callers exercise their pagination handling.
#[derive(Debug, Clone)]
pub struct InMemoryDeploymentPlatform<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    state: Arc<RwLock<PlatformState>>,
    clock: Arc<C>,
    page_size: usize,
    reports_active: bool,
    operator: String,
}

#[derive(Debug, Default)]
struct PlatformState {
    services: HashMap<ServiceName, StoredService>,
}

#[derive(Debug, Default)]
struct StoredService {
    deployments: Vec<StoredDeployment>,
    active: Option<DeploymentId>,
}

#[derive(Debug, Clone)]
struct StoredDeployment {
    id: DeploymentId,
    number: u64,
    created_at: DateTime<Utc>,
    author: String,
    source: String,
    content: String,
    etag: String,
    handlers: Vec<String>,
    bindings: Vec<Binding>,
    rollback: Option<RollbackMetadata>,
}

impl StoredDeployment {
    fn script(&self) -> ScriptResource {
        ScriptResource {
            etag: Some(self.etag.clone()),
            handlers: self.handlers.clone(),
            last_deployed_from: Some(self.source.clone()),
        }
    }

    fn fields(&self, with_resources: bool) -> DeploymentFields {
        let created_at = self.created_at.to_rfc3339_opts(SecondsFormat::Micros, true);
        DeploymentFields {
            id: Some(self.id.as_str().to_owned()),
            number: Some(self.number.to_string()),
            created_at: Some(created_at.clone()),
            modified_at: Some(created_at),
            author: Some(self.author.clone()),
            source: Some(self.source.clone()),
            resources: with_resources.then(|| DeploymentResources {
                script: self.script(),
                bindings: self.bindings.clone(),
            }),
            rollback: self.rollback.clone(),
        }
    }
}

impl InMemoryDeploymentPlatform<DefaultClock> {
    /// Creates an empty platform using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(DefaultClock)
    }
}

impl Default for InMemoryDeploymentPlatform<DefaultClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> InMemoryDeploymentPlatform<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty platform stamping deployments with `clock`.
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self {
            state: Arc::new(RwLock::new(PlatformState::default())),
            clock: Arc::new(clock),
            page_size: DEFAULT_PAGE_SIZE,
            reports_active: true,
            operator: DEFAULT_OPERATOR.to_owned(),
        }
    }

    /// Sets how many deployments each listing page holds (at least one).
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Stops reporting the active deployment through script metadata.
    #[must_use]
    pub fn without_active_signal(mut self) -> Self {
        self.reports_active = false;
        self
    }

    /// Sets the identity recorded as author of rollback deployments.
    #[must_use]
    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = operator.into();
        self
    }

    /// Registers a service that has never been deployed.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn create_service(&self, service: &ServiceName) -> RemoteDeploymentsResult<()> {
        let mut state = self.write_state()?;
        state.services.entry(service.clone()).or_default();
        Ok(())
    }

    /// Publishes a new script revision and makes it active.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn publish(
        &self,
        service: &ServiceName,
        upload: ScriptUpload,
    ) -> RemoteDeploymentsResult<DeploymentId> {
        let mut state = self.write_state()?;
        let stored = state.services.entry(service.clone()).or_default();
        let deployment = StoredDeployment {
            id: fresh_id()?,
            number: next_number(stored),
            created_at: self.clock.utc(),
            author: upload.author,
            source: upload.source,
            etag: digest(&upload.content),
            content: upload.content,
            handlers: upload.handlers,
            bindings: upload.bindings,
            rollback: None,
        };
        let id = deployment.id.clone();
        stored.active = Some(id.clone());
        stored.deployments.push(deployment);
        Ok(id)
    }

    fn read_state(
        &self,
    ) -> RemoteDeploymentsResult<std::sync::RwLockReadGuard<'_, PlatformState>> {
        self.state
            .read()
            .map_err(|err| RemoteDeploymentsError::transport(std::io::Error::other(err.to_string())))
    }

    fn write_state(
        &self,
    ) -> RemoteDeploymentsResult<std::sync::RwLockWriteGuard<'_, PlatformState>> {
        self.state
            .write()
            .map_err(|err| RemoteDeploymentsError::transport(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl<C> RemoteDeployments for InMemoryDeploymentPlatform<C>
where
    C: Clock + Send + Sync,
{
    async fn history_page(
        &self,
        service: &ServiceName,
        cursor: Option<PageCursor>,
    ) -> RemoteDeploymentsResult<HistoryPage> {
        let state = self.read_state()?;
        let stored = find_service(&state, service)?;
        let offset = match cursor {
            None => 0,
            Some(cursor) => cursor.as_str().parse::<usize>().map_err(|_| {
                RemoteDeploymentsError::Rejected {
                    reason: format!("invalid page cursor '{cursor}'"),
                }
            })?,
        };

        let records = stored
            .deployments
            .iter()
            .skip(offset)
            .take(self.page_size)
            .map(|deployment| deployment.fields(false))
            .collect::<Vec<_>>();
        let consumed = offset.saturating_add(records.len());
        let next = (consumed < stored.deployments.len())
            .then(|| PageCursor::new(consumed.to_string()));
        Ok(HistoryPage { records, next })
    }

    async fn detail(
        &self,
        service: &ServiceName,
        id: &DeploymentId,
    ) -> RemoteDeploymentsResult<DeploymentFields> {
        let state = self.read_state()?;
        let stored = find_service(&state, service)?;
        find_deployment(stored, service, id).map(|deployment| deployment.fields(true))
    }

    async fn script_content(
        &self,
        service: &ServiceName,
        id: &DeploymentId,
    ) -> RemoteDeploymentsResult<Option<String>> {
        let state = self.read_state()?;
        let stored = find_service(&state, service)?;
        find_deployment(stored, service, id).map(|deployment| Some(deployment.content.clone()))
    }

    async fn rollback(
        &self,
        service: &ServiceName,
        target: &DeploymentId,
        message: Option<String>,
    ) -> RemoteDeploymentsResult<RollbackConfirmation> {
        let mut state = self.write_state()?;
        let stored = state
            .services
            .get_mut(service)
            .ok_or_else(|| RemoteDeploymentsError::ServiceNotFound(service.clone()))?;
        let restored = find_deployment(stored, service, target)?.clone();
        debug!(service = %service, target = %target, ?message, "in-memory rollback");

        let metadata = RollbackMetadata {
            rolled_back_from: Some(target.as_str().to_owned()),
            ..RollbackMetadata::default()
        };
        let deployment = StoredDeployment {
            id: fresh_id()?,
            number: next_number(stored),
            created_at: self.clock.utc(),
            author: self.operator.clone(),
            rollback: Some(metadata.clone()),
            ..restored
        };
        let created_at = deployment
            .created_at
            .to_rfc3339_opts(SecondsFormat::Micros, true);
        let confirmation = RollbackConfirmation {
            deployment_id: Some(deployment.id.as_str().to_owned()),
            number: Some(deployment.number.to_string()),
            created_at: Some(created_at.clone()),
            modified_at: Some(created_at),
            author: None,
            script: Some(deployment.script()),
            metadata: Some(metadata),
        };
        stored.active = Some(deployment.id.clone());
        stored.deployments.push(deployment);
        Ok(confirmation)
    }
}

#[async_trait]
impl<C> ScriptMetadataSource for InMemoryDeploymentPlatform<C>
where
    C: Clock + Send + Sync,
{
    async fn active_deployment(
        &self,
        service: &ServiceName,
    ) -> RemoteDeploymentsResult<Option<DeploymentId>> {
        let state = self.read_state()?;
        let stored = find_service(&state, service)?;
        Ok(stored.active.clone().filter(|_| self.reports_active))
    }
}

fn find_service<'state>(
    state: &'state PlatformState,
    service: &ServiceName,
) -> RemoteDeploymentsResult<&'state StoredService> {
    state
        .services
        .get(service)
        .ok_or_else(|| RemoteDeploymentsError::ServiceNotFound(service.clone()))
}

fn find_deployment<'stored>(
    stored: &'stored StoredService,
    service: &ServiceName,
    id: &DeploymentId,
) -> RemoteDeploymentsResult<&'stored StoredDeployment> {
    stored
        .deployments
        .iter()
        .find(|deployment| &deployment.id == id)
        .ok_or_else(|| RemoteDeploymentsError::DeploymentNotFound {
            service: service.clone(),
            id: id.clone(),
        })
}

fn next_number(stored: &StoredService) -> u64 {
    stored
        .deployments
        .iter()
        .map(|deployment| deployment.number)
        .max()
        .unwrap_or(0)
        .saturating_add(1)
}

fn fresh_id() -> RemoteDeploymentsResult<DeploymentId> {
    DeploymentId::new(Uuid::new_v4().to_string()).map_err(RemoteDeploymentsError::invalid_payload)
}

fn digest(content: &str) -> String {
    format!("{:x}", Sha256::digest(content.as_bytes()))
}
