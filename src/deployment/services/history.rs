//! History and detail fetching against the remote platform.

use super::{DeploymentLifecycleError, DeploymentLifecycleResult};
use crate::deployment::{
    domain::{
        DeploymentHistory, DeploymentId, DeploymentRecord, MalformedRecordError, RecordField,
        ServiceName,
    },
    ports::{PageCursor, RemoteDeployments},
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// One deployment with its full resources and, when available, its script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentDetail {
    /// Service the deployment belongs to.
    pub service: ServiceName,
    /// Deployment record including resources.
    pub record: DeploymentRecord,
    /// Script source as deployed, if the platform returned one.
    pub script: Option<String>,
}

/// Read-side service for deployment history and details.
#[derive(Clone)]
pub struct DeploymentHistoryService<R>
where
    R: RemoteDeployments,
{
    remote: Arc<R>,
}

impl<R> DeploymentHistoryService<R>
where
    R: RemoteDeployments,
{
    /// Creates a history service.
    #[must_use]
    pub const fn new(remote: Arc<R>) -> Self {
        Self { remote }
    }

    /// Fetches the complete, ordered deployment history of a service.
    ///
    /// Every page is requested in turn and the result normalised by
    /// [`DeploymentHistory::from_pages`]. An empty history means the service
    /// has never been deployed and is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentLifecycleError::ServiceNotFound`],
    /// [`DeploymentLifecycleError::FetchRefused`],
    /// [`DeploymentLifecycleError::TransientFetch`] or
    /// [`DeploymentLifecycleError::MalformedRecord`].
    pub async fn fetch_history(
        &self,
        service: &ServiceName,
    ) -> DeploymentLifecycleResult<DeploymentHistory> {
        let mut pages = Vec::new();
        let mut visited = HashSet::new();
        let mut cursor: Option<PageCursor> = None;

        loop {
            let page = self
                .remote
                .history_page(service, cursor.clone())
                .await
                .map_err(|err| DeploymentLifecycleError::from_fetch(service, err))?;
            debug!(
                service = %service,
                page = pages.len(),
                records = page.records.len(),
                "fetched deployment history page"
            );

            let records = page
                .records
                .into_iter()
                .map(DeploymentRecord::new)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| malformed(service, source))?;
            pages.push(records);

            match page.next {
                Some(next) if visited.insert(next.clone()) => cursor = Some(next),
                Some(next) => {
                    warn!(
                        service = %service,
                        cursor = %next,
                        "history cursor repeated; stopping pagination"
                    );
                    break;
                }
                None => break,
            }
        }

        DeploymentHistory::from_pages(service.clone(), pages)
            .map_err(|source| malformed(service, source))
    }

    /// Fetches full metadata and resources of one deployment.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentLifecycleError::DeploymentNotFound`] when the
    /// deployment does not exist, [`DeploymentLifecycleError::MalformedRecord`]
    /// when the platform omits the resources, and transport errors.
    pub async fn fetch_detail(
        &self,
        service: &ServiceName,
        id: &DeploymentId,
    ) -> DeploymentLifecycleResult<DeploymentRecord> {
        debug!(service = %service, deployment = %id, "fetching deployment detail");
        let fields = self
            .remote
            .detail(service, id)
            .await
            .map_err(|err| DeploymentLifecycleError::from_fetch(service, err))?;
        let record = DeploymentRecord::new(fields).map_err(|source| malformed(service, source))?;
        if record.resources().is_none() {
            return Err(malformed(
                service,
                MalformedRecordError::missing(RecordField::Resources),
            ));
        }
        Ok(record)
    }

    /// Fetches one deployment together with its script source.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::fetch_detail`], plus transport errors
    /// raised while fetching the script.
    pub async fn fetch_detail_with_script(
        &self,
        service: &ServiceName,
        id: &DeploymentId,
    ) -> DeploymentLifecycleResult<DeploymentDetail> {
        let record = self.fetch_detail(service, id).await?;
        let script = self
            .remote
            .script_content(service, id)
            .await
            .map_err(|err| DeploymentLifecycleError::from_fetch(service, err))?;
        Ok(DeploymentDetail {
            service: service.clone(),
            record,
            script,
        })
    }
}

fn malformed(service: &ServiceName, source: MalformedRecordError) -> DeploymentLifecycleError {
    DeploymentLifecycleError::MalformedRecord {
        service: service.clone(),
        source,
    }
}
