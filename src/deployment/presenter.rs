//! Plain-text rendering of deployment listings, details and rollbacks.
//!
//! Output is produced from `minijinja` templates fed with serialized view
//! models, so wording lives in one place and stays independent of the
//! services that produce the data.

use crate::deployment::{
    domain::{DeploymentRecord, RollbackMetadata},
    services::{DeploymentDetail, DeploymentListing, RollbackOutcome},
};
use chrono::SecondsFormat;
use minijinja::Environment;
use serde::Serialize;
use thiserror::Error;

/// Number of deployments shown by a listing unless told otherwise.
pub const DEFAULT_LISTING_LIMIT: usize = 10;

const LISTING_TEMPLATE: &str = "listing";
const DETAIL_TEMPLATE: &str = "detail";
const ROLLBACK_TEMPLATE: &str = "rollback";

const LISTING_SOURCE: &str = r"{% if never_deployed %}
Service {{ service }} has no deployments yet.
{% else %}
{% if truncated %}
Showing the {{ shown }} most recent of {{ total }} deployments.

{% endif %}
{% for deployment in deployments %}
Deployment ID: {{ deployment.id }}
{% if deployment.number %}
Number:        {{ deployment.number }}
{% endif %}
Created on:    {{ deployment.created_on }}
Author:        {{ deployment.author }}
Source:        {{ deployment.source }}
{% if deployment.rolled_back_from %}
Rollback from: {{ deployment.rolled_back_from }}
{% endif %}
{% if deployment.active %}
🟩 Active
{% endif %}
{% if not loop.last %}

{% endif %}
{% endfor %}
{% endif %}";

const DETAIL_SOURCE: &str = r"Deployment ID: {{ deployment.id }}
{% if deployment.number %}
Number:        {{ deployment.number }}
{% endif %}
Created on:    {{ deployment.created_on }}
Author:        {{ deployment.author }}
Source:        {{ deployment.source }}
{% if deployment.rolled_back_from %}
Rollback from: {{ deployment.rolled_back_from }}
{% endif %}
Etag:          {{ etag or 'unknown' }}
Handlers:      {{ handlers | join(', ') if handlers else 'none' }}
Bindings:      {{ 'none' if not bindings }}
{% for binding in bindings %}
  - {{ binding.kind }}: {{ binding.name }}
{% endfor %}
{% if script %}
------------------------------------------------------------
{{ script }}
{% endif %}";

const ROLLBACK_SOURCE: &str = r"Successfully rolled back to deployment ID: {{ target }}
New deployment ID: {{ deployment.id }}
{% if metadata %}
{% if metadata.rolled_back_from %}
Rolled back from:  {{ metadata.rolled_back_from }}
{% endif %}
{% if metadata.tags %}
Tags:              {{ metadata.tags | join(', ') }}
{% endif %}
{% if metadata.usage_model %}
Usage model:       {{ metadata.usage_model }}
{% endif %}
{% if metadata.logpush is not none %}
Logpush:           {{ 'enabled' if metadata.logpush else 'disabled' }}
{% endif %}
{% else %}
Rollback metadata: none
{% endif %}";

/// Errors raised while rendering output.
#[derive(Debug, Clone, Error)]
pub enum PresenterError {
    /// A template failed to compile or render.
    #[error("failed to render {template} output: {reason}")]
    Render {
        /// Template name.
        template: &'static str,
        /// Underlying template error.
        reason: String,
    },
}

/// Renders deployment lifecycle results as human-readable text.
#[derive(Debug)]
pub struct DeploymentPresenter {
    environment: Environment<'static>,
}

impl DeploymentPresenter {
    /// Creates a presenter with the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns [`PresenterError::Render`] if a template fails to compile.
    pub fn new() -> Result<Self, PresenterError> {
        let mut environment = Environment::new();
        environment.set_trim_blocks(true);
        environment.set_lstrip_blocks(true);
        for (name, source) in [
            (LISTING_TEMPLATE, LISTING_SOURCE),
            (DETAIL_TEMPLATE, DETAIL_SOURCE),
            (ROLLBACK_TEMPLATE, ROLLBACK_SOURCE),
        ] {
            environment
                .add_template(name, source)
                .map_err(|err| render_error(name, &err))?;
        }
        Ok(Self { environment })
    }

    /// Renders a deployment listing showing at most `limit` recent entries.
    ///
    /// A limit of zero is treated as [`DEFAULT_LISTING_LIMIT`].
    ///
    /// # Errors
    ///
    /// Returns [`PresenterError::Render`] when rendering fails.
    pub fn render_listing(
        &self,
        listing: &DeploymentListing,
        limit: usize,
    ) -> Result<String, PresenterError> {
        let context = match listing {
            DeploymentListing::NeverDeployed { service } => ListingView {
                never_deployed: true,
                service: service.to_string(),
                truncated: false,
                shown: 0,
                total: 0,
                deployments: Vec::new(),
            },
            DeploymentListing::Deployed {
                history, active, ..
            } => {
                let window = if limit == 0 {
                    DEFAULT_LISTING_LIMIT
                } else {
                    limit
                };
                let shown = history.recent(window);
                ListingView {
                    never_deployed: false,
                    service: history.service().to_string(),
                    truncated: shown.len() < history.len(),
                    shown: shown.len(),
                    total: history.len(),
                    deployments: shown
                        .iter()
                        .map(|record| RecordView::new(record, record.id() == active))
                        .collect(),
                }
            }
        };
        self.render(LISTING_TEMPLATE, &context)
    }

    /// Renders one deployment with its resources and script.
    ///
    /// # Errors
    ///
    /// Returns [`PresenterError::Render`] when rendering fails.
    pub fn render_detail(&self, detail: &DeploymentDetail) -> Result<String, PresenterError> {
        let resources = detail.record.resources();
        let context = DetailView {
            deployment: RecordView::new(&detail.record, false),
            etag: resources.and_then(|found| found.script.etag.clone()),
            handlers: resources
                .map(|found| found.script.handlers.clone())
                .unwrap_or_default(),
            bindings: resources
                .map(|found| {
                    found
                        .bindings
                        .iter()
                        .map(|binding| BindingView {
                            kind: binding.kind.clone(),
                            name: binding.name.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            script: detail.script.clone(),
        };
        self.render(DETAIL_TEMPLATE, &context)
    }

    /// Renders the result of a successful rollback.
    ///
    /// # Errors
    ///
    /// Returns [`PresenterError::Render`] when rendering fails.
    pub fn render_rollback(&self, outcome: &RollbackOutcome) -> Result<String, PresenterError> {
        let context = RollbackView {
            target: outcome.target.to_string(),
            deployment: RecordView::new(&outcome.record, true),
            metadata: outcome.record.rollback_metadata().map(MetadataView::from),
        };
        self.render(ROLLBACK_TEMPLATE, &context)
    }

    fn render<S: Serialize>(&self, name: &'static str, context: &S) -> Result<String, PresenterError> {
        let template = self
            .environment
            .get_template(name)
            .map_err(|err| render_error(name, &err))?;
        template
            .render(context)
            .map_err(|err| render_error(name, &err))
    }
}

fn render_error(template: &'static str, err: &minijinja::Error) -> PresenterError {
    PresenterError::Render {
        template,
        reason: err.to_string(),
    }
}

#[derive(Serialize)]
struct ListingView {
    never_deployed: bool,
    service: String,
    truncated: bool,
    shown: usize,
    total: usize,
    deployments: Vec<RecordView>,
}

#[derive(Serialize)]
struct RecordView {
    id: String,
    number: Option<u64>,
    created_on: String,
    author: String,
    source: &'static str,
    rolled_back_from: Option<String>,
    active: bool,
}

impl RecordView {
    fn new(record: &DeploymentRecord, active: bool) -> Self {
        Self {
            id: record.id().to_string(),
            number: record.number().map(|number| number.value()),
            created_on: record
                .created_at()
                .to_rfc3339_opts(SecondsFormat::Micros, true),
            author: record.author().to_string(),
            source: record.source().label(),
            rolled_back_from: record
                .rollback_metadata()
                .and_then(|metadata| metadata.rolled_back_from.clone()),
            active,
        }
    }
}

#[derive(Serialize)]
struct BindingView {
    kind: String,
    name: String,
}

#[derive(Serialize)]
struct DetailView {
    deployment: RecordView,
    etag: Option<String>,
    handlers: Vec<String>,
    bindings: Vec<BindingView>,
    script: Option<String>,
}

#[derive(Serialize)]
struct MetadataView {
    rolled_back_from: Option<String>,
    tags: Vec<String>,
    usage_model: Option<String>,
    logpush: Option<bool>,
}

impl From<&RollbackMetadata> for MetadataView {
    fn from(metadata: &RollbackMetadata) -> Self {
        Self {
            rolled_back_from: metadata.rolled_back_from.clone(),
            tags: metadata.tags.clone(),
            usage_model: metadata.usage_model.clone(),
            logpush: metadata.logpush,
        }
    }
}

#[derive(Serialize)]
struct RollbackView {
    target: String,
    deployment: RecordView,
    metadata: Option<MetadataView>,
}
