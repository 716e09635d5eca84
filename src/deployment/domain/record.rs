//! Immutable deployment record and the unvalidated payloads it is built from.

use super::{
    Author, DeploymentId, DeploymentNumber, DeploymentResources, DeploymentSource,
    MalformedRecordError, RecordField, ScriptResource,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Details the platform attaches to a deployment created by rollback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollbackMetadata {
    /// Deployment the rollback restored, when the platform reports it.
    #[serde(default)]
    pub rolled_back_from: Option<String>,
    /// Tags carried over from the restored script.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Usage model of the restored script.
    #[serde(default)]
    pub usage_model: Option<String>,
    /// Whether log push is enabled on the restored script.
    #[serde(default)]
    pub logpush: Option<bool>,
}

/// Unvalidated deployment fields as reported by the remote platform.
///
/// Every field is optional so that adapters can hand over whatever the
/// platform sent; [`DeploymentRecord::new`] decides what is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentFields {
    /// Deployment identifier.
    pub id: Option<String>,
    /// History ordinal in textual form.
    pub number: Option<String>,
    /// RFC 3339 creation timestamp.
    pub created_at: Option<String>,
    /// RFC 3339 modification timestamp.
    pub modified_at: Option<String>,
    /// Author identity.
    pub author: Option<String>,
    /// Originating tool.
    pub source: Option<String>,
    /// Resource payload, absent in summarised listings.
    pub resources: Option<DeploymentResources>,
    /// Rollback details, present only for rollback-created deployments.
    pub rollback: Option<RollbackMetadata>,
}

/// Response to a rollback request, describing the newly active script.
///
/// The payload describes the updated script rather than deployment metadata,
/// so it has no author and usually no ordinal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollbackConfirmation {
    /// Identifier of the deployment created by the rollback.
    pub deployment_id: Option<String>,
    /// History ordinal, when reported.
    pub number: Option<String>,
    /// RFC 3339 creation timestamp.
    pub created_at: Option<String>,
    /// RFC 3339 modification timestamp.
    pub modified_at: Option<String>,
    /// Author identity, when reported.
    pub author: Option<String>,
    /// Script artifact now serving.
    pub script: Option<ScriptResource>,
    /// Rollback details echoed by the platform.
    pub metadata: Option<RollbackMetadata>,
}

impl RollbackConfirmation {
    /// Returns whether the confirmation names no deployment at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deployment_id
            .as_deref()
            .is_none_or(|value| value.trim().is_empty())
    }
}

/// One historical deployment of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentRecord {
    id: DeploymentId,
    number: Option<DeploymentNumber>,
    created_at: DateTime<Utc>,
    modified_at: Option<DateTime<Utc>>,
    author: Author,
    source: DeploymentSource,
    resources: Option<DeploymentResources>,
    rollback: Option<RollbackMetadata>,
}

impl DeploymentRecord {
    /// Validates platform-reported fields into a record.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRecordError`] naming the field when `id`,
    /// `created_at`, `author` or `source` is absent or blank, or when a
    /// timestamp or ordinal cannot be parsed.
    pub fn new(fields: DeploymentFields) -> Result<Self, MalformedRecordError> {
        let id = parse_id(fields.id.as_deref())?;
        let created_at = parse_timestamp(fields.created_at.as_deref(), RecordField::CreatedAt)?
            .ok_or_else(|| MalformedRecordError::missing(RecordField::CreatedAt))?;
        let author = fields
            .author
            .as_deref()
            .and_then(Author::parse)
            .ok_or_else(|| MalformedRecordError::missing(RecordField::Author))?;
        let source = parse_source(fields.source.as_deref())?;

        Ok(Self {
            id,
            number: parse_number(fields.number.as_deref())?,
            created_at,
            modified_at: parse_timestamp(fields.modified_at.as_deref(), RecordField::ModifiedAt)?,
            author,
            source,
            resources: fields.resources,
            rollback: fields.rollback,
        })
    }

    /// Builds the record announced by a rollback confirmation.
    ///
    /// A missing author becomes [`Author::unattributed`] and the source is
    /// taken from the script's upload lineage. Rollback metadata is copied
    /// only when the confirmation carries it.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRecordError`] when the confirmation lacks a
    /// deployment identifier, a creation timestamp or an upload source.
    pub fn from_confirmation(
        confirmation: RollbackConfirmation,
    ) -> Result<Self, MalformedRecordError> {
        let source = confirmation
            .script
            .as_ref()
            .and_then(|script| script.last_deployed_from.clone());
        let resources = confirmation.script.map(|script| DeploymentResources {
            script,
            bindings: Vec::new(),
        });
        let author = confirmation
            .author
            .or_else(|| Some(Author::unattributed().as_str().to_owned()));

        Self::new(DeploymentFields {
            id: confirmation.deployment_id,
            number: confirmation.number,
            created_at: confirmation.created_at,
            modified_at: confirmation.modified_at,
            author,
            source,
            resources,
            rollback: confirmation.metadata,
        })
    }

    /// Returns the deployment identifier.
    #[must_use]
    pub const fn id(&self) -> &DeploymentId {
        &self.id
    }

    /// Returns the history ordinal, if reported.
    #[must_use]
    pub const fn number(&self) -> Option<DeploymentNumber> {
        self.number
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last modification timestamp, if reported.
    #[must_use]
    pub const fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.modified_at
    }

    /// Returns the author identity.
    #[must_use]
    pub const fn author(&self) -> &Author {
        &self.author
    }

    /// Returns the originating tool.
    #[must_use]
    pub const fn source(&self) -> &DeploymentSource {
        &self.source
    }

    /// Returns the resource payload when this record carries it.
    #[must_use]
    pub const fn resources(&self) -> Option<&DeploymentResources> {
        self.resources.as_ref()
    }

    /// Returns rollback details when this record was created by rollback.
    #[must_use]
    pub const fn rollback_metadata(&self) -> Option<&RollbackMetadata> {
        self.rollback.as_ref()
    }
}

fn parse_id(value: Option<&str>) -> Result<DeploymentId, MalformedRecordError> {
    let raw = value.ok_or_else(|| MalformedRecordError::missing(RecordField::Id))?;
    DeploymentId::new(raw)
        .map_err(|err| MalformedRecordError::invalid(RecordField::Id, err.to_string()))
}

fn parse_number(value: Option<&str>) -> Result<Option<DeploymentNumber>, MalformedRecordError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(|number| Some(DeploymentNumber::new(number)))
        .map_err(|_| {
            MalformedRecordError::invalid(
                RecordField::Number,
                format!("'{raw}' is not a non-negative integer"),
            )
        })
}

fn parse_timestamp(
    value: Option<&str>,
    field: RecordField,
) -> Result<Option<DateTime<Utc>>, MalformedRecordError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|timestamp| Some(timestamp.with_timezone(&Utc)))
        .map_err(|err| {
            MalformedRecordError::invalid(field, format!("'{raw}' is not an RFC 3339 timestamp: {err}"))
        })
}

fn parse_source(value: Option<&str>) -> Result<DeploymentSource, MalformedRecordError> {
    match value.map(str::trim) {
        None => Err(MalformedRecordError::missing(RecordField::Source)),
        Some("") => Err(MalformedRecordError::invalid(
            RecordField::Source,
            "must not be empty",
        )),
        Some(raw) => Ok(DeploymentSource::from(raw)),
    }
}
