//! Phases of a single rollback orchestration.

use super::{DeploymentDomainError, ServiceName};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of one rollback attempt.
///
/// Phases live only for the duration of a single orchestration call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollbackPhase {
    /// The request was received.
    Requested,
    /// The target passed local shape checks.
    Validated,
    /// The rollback request was sent to the platform.
    Submitted,
    /// The platform confirmed a new deployment.
    Confirmed,
    /// The platform or transport reported a failure after submission.
    Failed,
    /// The request was refused before submission.
    Rejected,
}

impl RollbackPhase {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Validated => "validated",
            Self::Submitted => "submitted",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
            Self::Rejected => "rejected",
        }
    }

    /// Returns whether no further phase can follow.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed | Self::Rejected)
    }

    /// Returns whether transition to `target` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Requested, Self::Validated | Self::Rejected)
                | (Self::Validated, Self::Submitted)
                | (Self::Submitted, Self::Confirmed | Self::Failed)
        )
    }
}

impl fmt::Display for RollbackPhase {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Audit trail of one rollback attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackAttempt {
    service: ServiceName,
    target: String,
    trail: Vec<RollbackPhase>,
}

impl RollbackAttempt {
    /// Starts an attempt in the [`RollbackPhase::Requested`] phase.
    ///
    /// The target is kept as given so that attempts with an unusable target
    /// can still be audited.
    #[must_use]
    pub fn requested(service: ServiceName, target: impl Into<String>) -> Self {
        Self {
            service,
            target: target.into(),
            trail: vec![RollbackPhase::Requested],
        }
    }

    /// Returns the service being rolled back.
    #[must_use]
    pub const fn service(&self) -> &ServiceName {
        &self.service
    }

    /// Returns the rollback target as requested.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> RollbackPhase {
        self.trail
            .last()
            .copied()
            .unwrap_or(RollbackPhase::Requested)
    }

    /// Returns every phase visited, in order.
    #[must_use]
    pub fn trail(&self) -> &[RollbackPhase] {
        &self.trail
    }

    /// Moves the attempt to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentDomainError::InvalidRollbackTransition`] when the
    /// current phase does not permit `next`.
    pub fn advance(&mut self, next: RollbackPhase) -> Result<(), DeploymentDomainError> {
        let current = self.phase();
        if !current.can_transition_to(next) {
            return Err(DeploymentDomainError::InvalidRollbackTransition {
                target: self.target.clone(),
                from: current.as_str().to_owned(),
                to: next.as_str().to_owned(),
            });
        }
        self.trail.push(next);
        Ok(())
    }
}
