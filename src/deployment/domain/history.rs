//! Ordered, immutable deployment history of one service.

use super::{DeploymentId, DeploymentRecord, MalformedRecordError, RecordField, ServiceName};
use std::collections::HashSet;

/// Ordered, immutable view of a service's deployments.
///
/// Records are sorted ascending by ordinal, ties broken by creation time.
/// The collection is built once from fetched pages and exposes no way to
/// edit or remove entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentHistory {
    service: ServiceName,
    records: Vec<DeploymentRecord>,
}

impl DeploymentHistory {
    /// Creates the history of a service that has never been deployed.
    #[must_use]
    pub const fn empty(service: ServiceName) -> Self {
        Self {
            service,
            records: Vec::new(),
        }
    }

    /// Normalises listing pages into an ordered history.
    ///
    /// Pages are concatenated in the order given. A record whose identifier
    /// was already seen is dropped, so the first occurrence wins. The result
    /// is then stably sorted by ordinal and creation time.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRecordError`] when a listed record has no ordinal.
    pub fn from_pages<P>(service: ServiceName, pages: P) -> Result<Self, MalformedRecordError>
    where
        P: IntoIterator<Item = Vec<DeploymentRecord>>,
    {
        let mut seen = HashSet::new();
        let mut records = Vec::new();
        for record in pages.into_iter().flatten() {
            if record.number().is_none() {
                return Err(MalformedRecordError::invalid(
                    RecordField::Number,
                    format!("is missing for listed deployment {}", record.id()),
                ));
            }
            if seen.insert(record.id().clone()) {
                records.push(record);
            }
        }
        records.sort_by_key(|record| (record.number(), record.created_at()));
        Ok(Self { service, records })
    }

    /// Returns the service this history belongs to.
    #[must_use]
    pub const fn service(&self) -> &ServiceName {
        &self.service
    }

    /// Returns the records in ascending order.
    #[must_use]
    pub fn records(&self) -> &[DeploymentRecord] {
        &self.records
    }

    /// Returns whether the service has never been deployed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of recorded deployments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether a deployment with `id` is part of this history.
    #[must_use]
    pub fn contains(&self, id: &DeploymentId) -> bool {
        self.get(id).is_some()
    }

    /// Looks up a deployment by identifier.
    #[must_use]
    pub fn get(&self, id: &DeploymentId) -> Option<&DeploymentRecord> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Returns the most recent deployment.
    #[must_use]
    pub fn latest(&self) -> Option<&DeploymentRecord> {
        self.records.last()
    }

    /// Returns up to `limit` of the most recent deployments, oldest first.
    #[must_use]
    pub fn recent(&self, limit: usize) -> &[DeploymentRecord] {
        let start = self.records.len().saturating_sub(limit);
        self.records.get(start..).unwrap_or_default()
    }
}
