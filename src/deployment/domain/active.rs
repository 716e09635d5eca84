//! Derivation of the deployment currently receiving traffic.

use super::{DeploymentDomainError, DeploymentHistory, DeploymentId, DeploymentRecord};

/// What the script metadata side-channel reported about routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveSignal {
    /// The platform named the deployment currently routed to.
    Reported(DeploymentId),
    /// The platform gave no routing information.
    Unavailable,
}

impl From<Option<DeploymentId>> for ActiveSignal {
    fn from(value: Option<DeploymentId>) -> Self {
        value.map_or(Self::Unavailable, Self::Reported)
    }
}

/// Why a record was chosen as active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveBasis {
    /// The side-channel named this record.
    Reported,
    /// No usable signal; the highest ordinal was chosen.
    LatestByNumber,
}

/// The active deployment of a history together with how it was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveDeployment<'history> {
    /// The active record, borrowed from the history.
    pub record: &'history DeploymentRecord,
    /// How the record was chosen.
    pub basis: ActiveBasis,
}

/// Resolves the active deployment of `history`.
///
/// A reported deployment wins when it is part of the history. Otherwise the
/// last record in ascending order, which carries the highest ordinal, is
/// active. The result always borrows from `history`.
///
/// # Errors
///
/// Returns [`DeploymentDomainError::NoActiveDeployment`] when the history is
/// empty.
pub fn resolve_active<'history>(
    history: &'history DeploymentHistory,
    signal: &ActiveSignal,
) -> Result<ActiveDeployment<'history>, DeploymentDomainError> {
    if let ActiveSignal::Reported(id) = signal
        && let Some(record) = history.get(id)
    {
        return Ok(ActiveDeployment {
            record,
            basis: ActiveBasis::Reported,
        });
    }

    history
        .latest()
        .map(|record| ActiveDeployment {
            record,
            basis: ActiveBasis::LatestByNumber,
        })
        .ok_or_else(|| DeploymentDomainError::NoActiveDeployment(history.service().clone()))
}
