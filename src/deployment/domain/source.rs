//! Tool or path that created a deployment.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Origin of a deployment as reported by the remote platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum DeploymentSource {
    /// Published from the command line tool.
    Wrangler,
    /// Published directly through the REST API.
    Api,
    /// Published from the web dashboard.
    Dashboard,
    /// Published through the Terraform provider.
    Terraform,
    /// Any other origin, kept verbatim.
    Other(String),
}

impl DeploymentSource {
    /// Returns the canonical wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Wrangler => "wrangler",
            Self::Api => "api",
            Self::Dashboard => "dash",
            Self::Terraform => "terraform",
            Self::Other(raw) => raw,
        }
    }

    /// Returns the human-facing label used when listing deployments.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Wrangler => "🤠 Wrangler",
            Self::Api => "📡 API",
            Self::Dashboard => "🖥️ Dashboard",
            Self::Terraform => "🏗️ Terraform",
            Self::Other(_) => "Other",
        }
    }
}

impl From<&str> for DeploymentSource {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "wrangler" => Self::Wrangler,
            "api" => Self::Api,
            "dash" | "dashboard" => Self::Dashboard,
            "terraform" => Self::Terraform,
            _ => Self::Other(value.trim().to_owned()),
        }
    }
}

impl From<String> for DeploymentSource {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<DeploymentSource> for String {
    fn from(value: DeploymentSource) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for DeploymentSource {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
