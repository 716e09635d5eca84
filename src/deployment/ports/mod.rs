//! Port contracts for deployment lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by deployment
//! services.

mod remote;
mod script_metadata;

pub use remote::{
    HistoryPage, PageCursor, RemoteDeployments, RemoteDeploymentsError, RemoteDeploymentsResult,
};
pub use script_metadata::ScriptMetadataSource;

#[cfg(test)]
pub use remote::MockRemoteDeployments;
#[cfg(test)]
pub use script_metadata::MockScriptMetadataSource;
