//! Identifier and validated scalar types for the deployment domain.

use super::DeploymentDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resolved name of the service whose deployments are managed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceName(String);

impl ServiceName {
    /// Creates a validated service name.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentDomainError::EmptyServiceName`] when the trimmed
    /// value is empty, or [`DeploymentDomainError::InvalidServiceName`] when
    /// it contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, DeploymentDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(DeploymentDomainError::EmptyServiceName);
        }
        if normalized.chars().any(char::is_whitespace) {
            return Err(DeploymentDomainError::InvalidServiceName(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the service name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Opaque deployment identifier assigned by the remote platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeploymentId(String);

impl DeploymentId {
    /// Creates a deployment identifier.
    ///
    /// The identifier is opaque; only non-emptiness is checked here.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentDomainError::EmptyDeploymentId`] when the trimmed
    /// value is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, DeploymentDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(DeploymentDomainError::EmptyDeploymentId);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DeploymentId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for DeploymentId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Ordinal of a deployment within its service's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeploymentNumber(u64);

impl DeploymentNumber {
    /// Wraps a raw ordinal.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying ordinal.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DeploymentNumber {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Identity of whoever created a deployment, usually an email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Author(String);

impl Author {
    const UNATTRIBUTED: &'static str = "unattributed";

    /// Creates an author identity, returning `None` when the value is blank.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim();
        if normalized.is_empty() {
            return None;
        }
        Some(Self(normalized.to_owned()))
    }

    /// Author used for records whose payload carries no identity.
    ///
    /// Rollback confirmations describe the updated script rather than the
    /// deployment metadata, so they arrive without an author.
    #[must_use]
    pub fn unattributed() -> Self {
        Self(Self::UNATTRIBUTED.to_owned())
    }

    /// Returns whether this is the [`Author::unattributed`] placeholder.
    #[must_use]
    pub fn is_unattributed(&self) -> bool {
        self.0 == Self::UNATTRIBUTED
    }

    /// Returns the identity as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Author {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
