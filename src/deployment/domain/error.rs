//! Error types for deployment domain validation.

use super::ServiceName;
use thiserror::Error;

/// Errors returned while constructing deployment domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeploymentDomainError {
    /// The service name is empty after trimming.
    #[error("service name must not be empty")]
    EmptyServiceName,

    /// The service name contains whitespace.
    #[error("service name '{0}' must not contain whitespace")]
    InvalidServiceName(String),

    /// The deployment identifier is empty after trimming.
    #[error("deployment ID must not be empty")]
    EmptyDeploymentId,

    /// The history has no records, so nothing can be active.
    #[error("service {0} has no deployments, so no deployment is active")]
    NoActiveDeployment(ServiceName),

    /// A rollback attempted an out-of-order phase change.
    #[error("invalid rollback transition for {target}: {from} -> {to}")]
    InvalidRollbackTransition {
        /// Rollback target as requested.
        target: String,
        /// Current phase.
        from: String,
        /// Requested phase.
        to: String,
    },
}

/// Field of a deployment payload that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    /// Deployment identifier.
    Id,
    /// History ordinal.
    Number,
    /// Creation timestamp.
    CreatedAt,
    /// Last modification timestamp.
    ModifiedAt,
    /// Author identity.
    Author,
    /// Originating tool.
    Source,
    /// Bound resources payload.
    Resources,
    /// The payload as a whole.
    Payload,
}

impl RecordField {
    /// Returns the wire-level field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Number => "number",
            Self::CreatedAt => "created_on",
            Self::ModifiedAt => "modified_on",
            Self::Author => "author_email",
            Self::Source => "source",
            Self::Resources => "resources",
            Self::Payload => "payload",
        }
    }
}

/// A deployment payload was missing a required field or had the wrong shape.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("malformed deployment record: field '{}' {reason}", field.as_str())]
pub struct MalformedRecordError {
    /// Offending field.
    pub field: RecordField,
    /// What was wrong with it.
    pub reason: String,
}

impl MalformedRecordError {
    /// Reports a required field that was absent.
    #[must_use]
    pub fn missing(field: RecordField) -> Self {
        Self {
            field,
            reason: "is missing".to_owned(),
        }
    }

    /// Reports a field whose value could not be interpreted.
    #[must_use]
    pub fn invalid(field: RecordField, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}
