//! reqwest client for the hosted deployments API.

use super::{
    ClientConfig,
    wire::{
        DeploymentDetailWire, Envelope, ListResult, RollbackBody, ScriptUpdateWire,
        ServiceMetadataWire,
    },
};
use crate::deployment::{
    domain::{DeploymentFields, DeploymentId, RollbackConfirmation, ServiceName},
    ports::{
        HistoryPage, PageCursor, RemoteDeployments, RemoteDeploymentsError,
        RemoteDeploymentsResult, ScriptMetadataSource,
    },
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

/// HTTP implementation of the deployment platform ports.
#[derive(Debug, Clone)]
pub struct HttpDeploymentsClient {
    client: Client,
    config: ClientConfig,
}

impl HttpDeploymentsClient {
    /// Creates a client from validated settings.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteDeploymentsError::Transport`] if the underlying HTTP
    /// client cannot be built.
    pub fn new(config: ClientConfig) -> RemoteDeploymentsResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(RemoteDeploymentsError::transport)?;
        Ok(Self { client, config })
    }

    /// Returns the settings this client was built with.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn account_url(&self, path: &str) -> String {
        format!(
            "{}/accounts/{}/{path}",
            self.config.base_url(),
            self.config.account_id()
        )
    }

    fn service_url(&self, service: &ServiceName) -> String {
        self.account_url(&format!("workers/services/{service}"))
    }

    fn listing_url(&self, tag: &str) -> String {
        self.account_url(&format!("workers/deployments/by-script/{tag}"))
    }

    fn detail_url(&self, tag: &str, id: &DeploymentId) -> String {
        self.account_url(&format!("workers/deployments/by-script/{tag}/detail/{id}"))
    }

    fn script_url(&self, service: &ServiceName) -> String {
        self.account_url(&format!("workers/scripts/{service}"))
    }

    async fn service_metadata(
        &self,
        service: &ServiceName,
    ) -> RemoteDeploymentsResult<ServiceMetadataWire> {
        let request = self.client.get(self.service_url(service));
        let envelope: Envelope<ServiceMetadataWire> = self
            .send(request, || RemoteDeploymentsError::ServiceNotFound(service.clone()))
            .await?;
        envelope
            .result
            .ok_or_else(|| missing_result("service metadata"))
    }

    async fn script_tag(&self, service: &ServiceName) -> RemoteDeploymentsResult<String> {
        let metadata = self.service_metadata(service).await?;
        metadata
            .script_tag()
            .map(str::to_owned)
            .ok_or_else(|| missing_result("script tag"))
    }

    async fn send<T>(
        &self,
        request: RequestBuilder,
        not_found: impl FnOnce() -> RemoteDeploymentsError,
    ) -> RemoteDeploymentsResult<Envelope<T>>
    where
        T: DeserializeOwned,
    {
        let response = self
            .client_request(request)
            .send()
            .await
            .map_err(RemoteDeploymentsError::transport)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(not_found());
        }
        let body = response
            .text()
            .await
            .map_err(RemoteDeploymentsError::transport)?;
        debug!(%status, bytes = body.len(), "deployments API responded");

        if status.is_server_error() {
            return Err(RemoteDeploymentsError::transport(std::io::Error::other(
                format!("deployments API returned {status}"),
            )));
        }

        let decoded = serde_json::from_str::<Envelope<T>>(&body);
        match decoded {
            Ok(envelope) if status.is_success() && envelope.success => Ok(envelope),
            Ok(envelope) => Err(RemoteDeploymentsError::Rejected {
                reason: envelope
                    .reason()
                    .unwrap_or_else(|| format!("deployments API returned {status}")),
            }),
            Err(err) if status.is_success() => Err(RemoteDeploymentsError::invalid_payload(err)),
            Err(_) => Err(RemoteDeploymentsError::Rejected {
                reason: format!("deployments API returned {status}"),
            }),
        }
    }

    fn client_request(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(self.config.api_token())
    }
}

#[async_trait]
impl RemoteDeployments for HttpDeploymentsClient {
    async fn history_page(
        &self,
        service: &ServiceName,
        cursor: Option<PageCursor>,
    ) -> RemoteDeploymentsResult<HistoryPage> {
        let tag = self.script_tag(service).await?;
        let mut request = self.client.get(self.listing_url(&tag));
        if let Some(page) = &cursor {
            request = request.query(&[("page", page.as_str())]);
        }
        let envelope: Envelope<ListResult> = self
            .send(request, || RemoteDeploymentsError::ServiceNotFound(service.clone()))
            .await?;

        let next = envelope
            .result_info
            .as_ref()
            .and_then(|info| info.next_page())
            .map(|page| PageCursor::new(page.to_string()));
        let records = envelope
            .result
            .unwrap_or_default()
            .items
            .into_iter()
            .map(DeploymentFields::from)
            .collect();
        Ok(HistoryPage { records, next })
    }

    async fn detail(
        &self,
        service: &ServiceName,
        id: &DeploymentId,
    ) -> RemoteDeploymentsResult<DeploymentFields> {
        let tag = self.script_tag(service).await?;
        let request = self.client.get(self.detail_url(&tag, id));
        let envelope: Envelope<DeploymentDetailWire> = self
            .send(request, || RemoteDeploymentsError::DeploymentNotFound {
                service: service.clone(),
                id: id.clone(),
            })
            .await?;
        envelope
            .result
            .map(|detail| detail.into_fields(id))
            .ok_or_else(|| missing_result("deployment detail"))
    }

    async fn script_content(
        &self,
        service: &ServiceName,
        id: &DeploymentId,
    ) -> RemoteDeploymentsResult<Option<String>> {
        let response = self
            .client_request(self.client.get(self.script_url(service)))
            .query(&[("deployment", id.as_str())])
            .send()
            .await
            .map_err(RemoteDeploymentsError::transport)?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(RemoteDeploymentsError::DeploymentNotFound {
                service: service.clone(),
                id: id.clone(),
            }),
            status if status.is_success() => {
                let content = response
                    .text()
                    .await
                    .map_err(RemoteDeploymentsError::transport)?;
                Ok((!content.is_empty()).then_some(content))
            }
            status if status.is_server_error() => Err(RemoteDeploymentsError::transport(
                std::io::Error::other(format!("deployments API returned {status}")),
            )),
            status => Err(RemoteDeploymentsError::Rejected {
                reason: format!("deployments API returned {status}"),
            }),
        }
    }

    async fn rollback(
        &self,
        service: &ServiceName,
        target: &DeploymentId,
        message: Option<String>,
    ) -> RemoteDeploymentsResult<RollbackConfirmation> {
        let mut request = self
            .client
            .put(self.script_url(service))
            .query(&[("rollback_to", target.as_str())]);
        if let Some(text) = message {
            request = request.json(&RollbackBody { message: text });
        }
        let envelope: Envelope<ScriptUpdateWire> = self
            .send(request, || RemoteDeploymentsError::DeploymentNotFound {
                service: service.clone(),
                id: target.clone(),
            })
            .await?;
        Ok(RollbackConfirmation::from(envelope.result.unwrap_or_default()))
    }
}

#[async_trait]
impl ScriptMetadataSource for HttpDeploymentsClient {
    async fn active_deployment(
        &self,
        service: &ServiceName,
    ) -> RemoteDeploymentsResult<Option<DeploymentId>> {
        let metadata = self.service_metadata(service).await?;
        Ok(metadata.active_deployment())
    }
}

fn missing_result(what: &str) -> RemoteDeploymentsError {
    RemoteDeploymentsError::invalid_payload(std::io::Error::other(format!(
        "response did not include {what}"
    )))
}
