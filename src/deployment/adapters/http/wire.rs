//! Wire shapes of the deployments API and their mapping onto domain payloads.

use crate::deployment::domain::{
    DeploymentFields, DeploymentId, DeploymentResources, RollbackConfirmation, RollbackMetadata,
    ScriptResource,
};
use serde::{Deserialize, Deserializer, Serialize};

/// Standard response envelope wrapping every API result.
#[derive(Debug, Deserialize)]
pub(super) struct Envelope<T> {
    #[serde(default)]
    pub(super) success: bool,
    #[serde(default)]
    pub(super) errors: Vec<ApiMessage>,
    pub(super) result: Option<T>,
    #[serde(default)]
    pub(super) result_info: Option<ResultInfo>,
}

impl<T> Envelope<T> {
    /// Joins the reported error messages into one reason string.
    pub(super) fn reason(&self) -> Option<String> {
        let messages = self
            .errors
            .iter()
            .map(ApiMessage::describe)
            .collect::<Vec<_>>();
        (!messages.is_empty()).then(|| messages.join("; "))
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiMessage {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: String,
}

impl ApiMessage {
    fn describe(&self) -> String {
        self.code.map_or_else(
            || self.message.clone(),
            |code| format!("{} [code: {code}]", self.message),
        )
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ResultInfo {
    #[serde(default)]
    pub(super) page: Option<u64>,
    #[serde(default)]
    pub(super) total_pages: Option<u64>,
}

impl ResultInfo {
    /// Returns the page after this one, if the listing has more.
    pub(super) fn next_page(&self) -> Option<u64> {
        let page = self.page?;
        let total = self.total_pages?;
        (page < total).then(|| page.saturating_add(1))
    }
}

/// Metadata block shared by listings and details.
#[derive(Debug, Default, Deserialize)]
pub(super) struct WireMetadata {
    #[serde(default)]
    author_email: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    created_on: Option<String>,
    #[serde(default)]
    modified_on: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct WireAnnotations {
    #[serde(default, rename = "workers/rollback_from")]
    rollback_from: Option<String>,
}

/// Result of the listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ListResult {
    #[serde(default)]
    pub(super) items: Vec<ListedDeployment>,
}

/// One entry in a deployment listing.
#[derive(Debug, Deserialize)]
pub(super) struct ListedDeployment {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    number: Option<String>,
    #[serde(default)]
    metadata: WireMetadata,
    #[serde(default)]
    annotations: Option<WireAnnotations>,
}

impl From<ListedDeployment> for DeploymentFields {
    fn from(value: ListedDeployment) -> Self {
        let rollback = value
            .annotations
            .and_then(|annotations| annotations.rollback_from)
            .map(|from| RollbackMetadata {
                rolled_back_from: Some(from),
                ..RollbackMetadata::default()
            });
        Self {
            id: value.id,
            number: value.number,
            created_at: value.metadata.created_on,
            modified_at: value.metadata.modified_on,
            author: value.metadata.author_email,
            source: value.metadata.source,
            resources: None,
            rollback,
        }
    }
}

/// Result of the detail endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct DeploymentDetailWire {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, alias = "Tag")]
    tag: Option<String>,
    #[serde(default, alias = "Number", deserialize_with = "lenient_number")]
    number: Option<String>,
    #[serde(default, alias = "Metadata")]
    metadata: WireMetadata,
    #[serde(default)]
    resources: Option<DeploymentResources>,
}

impl DeploymentDetailWire {
    /// Maps the detail onto domain fields.
    ///
    /// The detail endpoint may leave its own identifier blank; the identifier
    /// the caller asked for is used then.
    pub(super) fn into_fields(self, requested: &DeploymentId) -> DeploymentFields {
        let id = [self.id, self.tag]
            .into_iter()
            .flatten()
            .find(|candidate| !candidate.trim().is_empty())
            .unwrap_or_else(|| requested.as_str().to_owned());
        DeploymentFields {
            id: Some(id),
            number: self.number,
            created_at: self.metadata.created_on,
            modified_at: self.metadata.modified_on,
            author: self.metadata.author_email,
            source: self.metadata.source,
            resources: self.resources,
            rollback: None,
        }
    }
}

/// Result of the service metadata endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct ServiceMetadataWire {
    #[serde(default)]
    default_environment: Option<EnvironmentWire>,
}

#[derive(Debug, Deserialize)]
struct EnvironmentWire {
    #[serde(default)]
    script: Option<ScriptMetadataWire>,
}

#[derive(Debug, Deserialize)]
struct ScriptMetadataWire {
    #[serde(default)]
    tag: Option<String>,
    #[serde(default)]
    deployment_id: Option<String>,
}

impl ServiceMetadataWire {
    fn script(&self) -> Option<&ScriptMetadataWire> {
        self.default_environment
            .as_ref()
            .and_then(|environment| environment.script.as_ref())
    }

    /// Returns the script tag used to address deployment listings.
    pub(super) fn script_tag(&self) -> Option<&str> {
        self.script()
            .and_then(|script| script.tag.as_deref())
            .filter(|tag| !tag.trim().is_empty())
    }

    /// Returns the deployment the platform currently routes to.
    pub(super) fn active_deployment(&self) -> Option<DeploymentId> {
        self.script()
            .and_then(|script| script.deployment_id.as_deref())
            .and_then(|id| DeploymentId::new(id).ok())
    }
}

/// Result of the script update endpoint when called with `rollback_to`.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ScriptUpdateWire {
    #[serde(default)]
    deployment_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    number: Option<String>,
    #[serde(default)]
    created_on: Option<String>,
    #[serde(default)]
    modified_on: Option<String>,
    #[serde(default)]
    author_email: Option<String>,
    #[serde(default)]
    etag: Option<String>,
    #[serde(default)]
    handlers: Option<Vec<String>>,
    #[serde(default)]
    last_deployed_from: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    usage_model: Option<String>,
    #[serde(default)]
    logpush: Option<bool>,
    #[serde(default)]
    annotations: Option<WireAnnotations>,
}

impl From<ScriptUpdateWire> for RollbackConfirmation {
    fn from(value: ScriptUpdateWire) -> Self {
        let rolled_back_from = value
            .annotations
            .and_then(|annotations| annotations.rollback_from);
        let has_metadata = rolled_back_from.is_some()
            || value.tags.is_some()
            || value.usage_model.is_some()
            || value.logpush.is_some();
        let metadata = has_metadata.then(|| RollbackMetadata {
            rolled_back_from,
            tags: value.tags.unwrap_or_default(),
            usage_model: value.usage_model,
            logpush: value.logpush,
        });
        let has_script =
            value.etag.is_some() || value.handlers.is_some() || value.last_deployed_from.is_some();
        let script = has_script.then(|| ScriptResource {
            etag: value.etag,
            handlers: value.handlers.unwrap_or_default(),
            last_deployed_from: value.last_deployed_from,
        });

        Self {
            deployment_id: value.deployment_id,
            number: value.number,
            created_at: value.created_on,
            modified_at: value.modified_on,
            author: value.author_email,
            script,
            metadata,
        }
    }
}

/// Body sent with a rollback request.
#[derive(Debug, Serialize)]
pub(super) struct RollbackBody {
    pub(super) message: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Unsigned(u64),
    Signed(i64),
    Text(String),
}

/// Accepts ordinals sent either as JSON numbers or as strings.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        NumberOrText::Unsigned(number) => number.to_string(),
        NumberOrText::Signed(number) => number.to_string(),
        NumberOrText::Text(text) => text,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deployment::domain::{DeploymentRecord, DeploymentSource};
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn listing_accepts_string_ordinals() {
        let envelope: Envelope<ListResult> = serde_json::from_value(json!({
            "success": true,
            "errors": [],
            "result": {
                "items": [{
                    "id": "Galaxy-Class",
                    "number": "1",
                    "metadata": {
                        "author_id": "Picard-Gamma-6-0-7-3",
                        "author_email": "Jean-Luc-Picard@federation.org",
                        "source": "wrangler",
                        "created_on": "2021-01-01T00:00:00.000000Z",
                        "modified_on": "2021-01-01T00:00:00.000000Z"
                    }
                }]
            }
        }))
        .expect("listing should decode");

        let item = envelope
            .result
            .and_then(|result| result.items.into_iter().next())
            .expect("listing should have one item");
        let record =
            DeploymentRecord::new(DeploymentFields::from(item)).expect("record should validate");

        assert_eq!(record.id().as_str(), "Galaxy-Class");
        assert_eq!(record.number().map(|number| number.value()), Some(1));
        assert_eq!(record.source(), &DeploymentSource::Wrangler);
        assert!(record.resources().is_none());
    }

    #[rstest]
    fn detail_falls_back_to_requested_id_when_tag_is_blank() {
        let detail: DeploymentDetailWire = serde_json::from_value(json!({
            "Tag": "",
            "Number": 0,
            "Metadata": {
                "author_id": "Picard-Gamma-6-0-7-3",
                "author_email": "Jean-Luc-Picard@federation.org",
                "source": "wrangler",
                "created_on": "2021-01-01T00:00:00.000000Z",
                "modified_on": "2021-01-01T00:00:00.000000Z"
            },
            "resources": {
                "script": {
                    "etag": "mock-e-tag",
                    "handlers": ["fetch"],
                    "last_deployed_from": "wrangler"
                },
                "bindings": []
            }
        }))
        .expect("detail should decode");
        let requested = DeploymentId::new("1701-E").expect("valid id");

        let record = DeploymentRecord::new(detail.into_fields(&requested))
            .expect("record should validate");

        assert_eq!(record.id(), &requested);
        let resources = record.resources().expect("detail carries resources");
        assert_eq!(resources.script.etag.as_deref(), Some("mock-e-tag"));
        assert_eq!(resources.script.handlers, vec!["fetch".to_owned()]);
        assert!(resources.bindings.is_empty());
    }

    #[rstest]
    fn themed_rollback_confirmation_maps_to_new_deployment() {
        let update: ScriptUpdateWire = serde_json::from_value(json!({
            "created_on": "2222-11-18T16:40:48.50545Z",
            "modified_on": "2222-01-20T18:08:47.464024Z",
            "id": "space_craft_1",
            "tag": "alien_tech_001",
            "tags": ["hyperdrive", "laser_cannons", "shields"],
            "deployment_id": "galactic_mission_alpha",
            "logpush": true,
            "etag": "13a3240e8fb414561b0366813b0b8f42b3e6cfa0d9e70e99835dae83d0d8a794",
            "handlers": ["interstellar_communication", "hyperspace_navigation"],
            "last_deployed_from": "spaceport_alpha",
            "usage_model": "intergalactic",
            "script": "addEventListener('interstellar_communication', event => {})",
            "size": "1 light-year"
        }))
        .expect("confirmation should decode");

        let confirmation = RollbackConfirmation::from(update);
        let record =
            DeploymentRecord::from_confirmation(confirmation).expect("record should validate");

        assert_eq!(record.id().as_str(), "galactic_mission_alpha");
        assert!(record.author().is_unattributed());
        assert_eq!(
            record.source(),
            &DeploymentSource::Other("spaceport_alpha".to_owned())
        );
        let metadata = record
            .rollback_metadata()
            .expect("rollback metadata should be populated");
        assert_eq!(metadata.tags, vec!["hyperdrive", "laser_cannons", "shields"]);
        assert_eq!(metadata.usage_model.as_deref(), Some("intergalactic"));
        assert_eq!(metadata.logpush, Some(true));
        assert!(metadata.rolled_back_from.is_none());
    }

    #[rstest]
    fn empty_rollback_result_is_an_empty_confirmation() {
        let update: ScriptUpdateWire =
            serde_json::from_value(json!({})).expect("empty object should decode");

        let confirmation = RollbackConfirmation::from(update);

        assert!(confirmation.is_empty());
        assert!(confirmation.metadata.is_none());
        assert!(confirmation.script.is_none());
    }

    #[rstest]
    fn service_metadata_exposes_tag_and_active_deployment() {
        let metadata: ServiceMetadataWire = serde_json::from_value(json!({
            "default_environment": {
                "script": {
                    "tag": "test-tag",
                    "deployment_id": "Intrepid-Class",
                    "last_deployed_from": "wrangler"
                }
            }
        }))
        .expect("metadata should decode");

        assert_eq!(metadata.script_tag(), Some("test-tag"));
        assert_eq!(
            metadata.active_deployment().map(|id| id.as_str().to_owned()),
            Some("Intrepid-Class".to_owned())
        );
    }

    #[rstest]
    #[case(json!({"page": 1, "total_pages": 3}), Some(2))]
    #[case(json!({"page": 3, "total_pages": 3}), None)]
    #[case(json!({}), None)]
    fn result_info_reports_following_page(
        #[case] info: serde_json::Value,
        #[case] expected: Option<u64>,
    ) {
        let parsed: ResultInfo = serde_json::from_value(info).expect("result info should decode");

        assert_eq!(parsed.next_page(), expected);
    }

    #[rstest]
    fn envelope_reason_joins_error_messages() {
        let envelope: Envelope<serde_json::Value> = serde_json::from_value(json!({
            "success": false,
            "errors": [
                {"code": 10007, "message": "deployment not found"},
                {"message": "try again"}
            ],
            "result": null
        }))
        .expect("envelope should decode");

        assert_eq!(
            envelope.reason().as_deref(),
            Some("deployment not found [code: 10007]; try again")
        );
    }
}
