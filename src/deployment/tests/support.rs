//! Shared builders for deployment unit tests.

use crate::deployment::domain::{
    DeploymentFields, DeploymentRecord, RollbackConfirmation, ScriptResource,
};

pub(super) const PICARD: &str = "Jean-Luc-Picard@federation.org";

/// Listing fields with a fixed author and `wrangler` source.
pub(super) fn fields(id: &str, number: u64, created_at: &str) -> DeploymentFields {
    DeploymentFields {
        id: Some(id.to_owned()),
        number: Some(number.to_string()),
        created_at: Some(created_at.to_owned()),
        modified_at: Some(created_at.to_owned()),
        author: Some(PICARD.to_owned()),
        source: Some("wrangler".to_owned()),
        resources: None,
        rollback: None,
    }
}

pub(super) fn record(id: &str, number: u64, created_at: &str) -> DeploymentRecord {
    DeploymentRecord::new(fields(id, number, created_at)).expect("record should validate")
}

/// Confirmation announcing a new deployment `id`.
pub(super) fn confirmation(id: &str) -> RollbackConfirmation {
    RollbackConfirmation {
        deployment_id: Some(id.to_owned()),
        number: None,
        created_at: Some("2021-02-02T00:00:00.000000Z".to_owned()),
        modified_at: None,
        author: None,
        script: Some(ScriptResource {
            etag: Some("mock-e-tag".to_owned()),
            handlers: vec!["fetch".to_owned()],
            last_deployed_from: Some("api".to_owned()),
        }),
        metadata: None,
    }
}
