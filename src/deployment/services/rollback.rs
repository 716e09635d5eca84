//! Rollback orchestration: validate, submit once, interpret the confirmation.

use super::{DeploymentLifecycleError, DeploymentLifecycleResult};
use crate::deployment::{
    domain::{
        DeploymentHistory, DeploymentId, DeploymentRecord, RollbackAttempt, RollbackConfirmation,
        RollbackPhase, ServiceName,
    },
    ports::RemoteDeployments,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Request payload for rolling a service back to an earlier deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackRequest {
    service: ServiceName,
    target: String,
    message: Option<String>,
    known_history: Option<DeploymentHistory>,
}

impl RollbackRequest {
    /// Creates a rollback request for `target`.
    #[must_use]
    pub fn new(service: ServiceName, target: impl Into<String>) -> Self {
        Self {
            service,
            target: target.into(),
            message: None,
            known_history: None,
        }
    }

    /// Attaches a message recorded with the new deployment.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Supplies a history the caller has already fetched.
    ///
    /// The orchestrator never fetches history itself; when one is supplied
    /// it is used to check that the confirmation names a new deployment.
    #[must_use]
    pub fn with_known_history(mut self, history: DeploymentHistory) -> Self {
        self.known_history = Some(history);
        self
    }
}

/// Successful rollback: the deployment created by it and the phases visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackOutcome {
    /// Service that was rolled back.
    pub service: ServiceName,
    /// Deployment whose content was restored.
    pub target: DeploymentId,
    /// New deployment created by the rollback.
    pub record: DeploymentRecord,
    /// Audit trail from request to confirmation.
    pub trail: Vec<RollbackPhase>,
}

/// Single-shot rollback state machine.
///
/// Each call issues at most one mutating request and never retries it: a
/// submission that succeeded without being acknowledged would otherwise
/// create a second deployment. Callers that want to retry must first read a
/// fresh history.
#[derive(Clone)]
pub struct RollbackOrchestrator<R>
where
    R: RemoteDeployments,
{
    remote: Arc<R>,
}

impl<R> RollbackOrchestrator<R>
where
    R: RemoteDeployments,
{
    /// Creates a rollback orchestrator.
    #[must_use]
    pub const fn new(remote: Arc<R>) -> Self {
        Self { remote }
    }

    /// Rolls a service back to an earlier deployment.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentLifecycleError::InvalidTarget`] when the target is
    /// blank, [`DeploymentLifecycleError::RollbackNotFound`] when the
    /// platform does not know the target or the submission failed in
    /// transport, and [`DeploymentLifecycleError::RollbackRejected`] for any
    /// other refusal or an unusable confirmation.
    pub async fn rollback(
        &self,
        request: RollbackRequest,
    ) -> DeploymentLifecycleResult<RollbackOutcome> {
        let RollbackRequest {
            service,
            target,
            message,
            known_history,
        } = request;
        let mut attempt = RollbackAttempt::requested(service.clone(), target.as_str());
        log_phase(&attempt);

        let target_id = match DeploymentId::new(target.as_str()) {
            Ok(id) => id,
            Err(err) => {
                advance(&mut attempt, RollbackPhase::Rejected)?;
                return Err(DeploymentLifecycleError::InvalidTarget {
                    service,
                    reason: err.to_string(),
                });
            }
        };
        if let Some(history) = known_history.as_ref()
            && !history.contains(&target_id)
        {
            warn!(
                service = %service,
                target = %target_id,
                "rollback target is not in the known history; deferring to the platform"
            );
        }
        advance(&mut attempt, RollbackPhase::Validated)?;

        advance(&mut attempt, RollbackPhase::Submitted)?;
        let submitted = self.remote.rollback(&service, &target_id, message).await;
        let confirmation = match submitted {
            Ok(confirmation) => confirmation,
            Err(err) => {
                advance(&mut attempt, RollbackPhase::Failed)?;
                return Err(DeploymentLifecycleError::from_rollback(
                    &service, &target_id, err,
                ));
            }
        };

        match confirm(&target_id, known_history.as_ref(), confirmation) {
            Ok(record) => {
                advance(&mut attempt, RollbackPhase::Confirmed)?;
                info!(
                    service = %service,
                    target = %target_id,
                    deployment = %record.id(),
                    "rollback created a new deployment"
                );
                Ok(RollbackOutcome {
                    service,
                    target: target_id,
                    record,
                    trail: attempt.trail().to_vec(),
                })
            }
            Err(reason) => {
                advance(&mut attempt, RollbackPhase::Failed)?;
                Err(DeploymentLifecycleError::RollbackRejected {
                    service,
                    target: target_id,
                    reason,
                })
            }
        }
    }
}

/// Interprets a confirmation as a new deployment, or explains why it is not.
fn confirm(
    target: &DeploymentId,
    known_history: Option<&DeploymentHistory>,
    confirmation: RollbackConfirmation,
) -> Result<DeploymentRecord, String> {
    if confirmation.is_empty() {
        return Err("the platform returned an empty rollback confirmation".to_owned());
    }
    let record = DeploymentRecord::from_confirmation(confirmation).map_err(|err| err.to_string())?;
    if record.id() == target {
        return Err(format!(
            "the platform confirmed deployment {target} itself instead of a new deployment"
        ));
    }
    if known_history.is_some_and(|history| history.contains(record.id())) {
        return Err(format!(
            "the platform confirmed existing deployment {} instead of a new one",
            record.id()
        ));
    }
    Ok(record)
}

fn advance(
    attempt: &mut RollbackAttempt,
    next: RollbackPhase,
) -> Result<(), DeploymentLifecycleError> {
    attempt.advance(next)?;
    log_phase(attempt);
    Ok(())
}

fn log_phase(attempt: &RollbackAttempt) {
    info!(
        service = %attempt.service(),
        target = attempt.target(),
        phase = %attempt.phase(),
        "rollback phase"
    );
}
