//! Script and binding resources attached to a deployment.

use serde::{Deserialize, Serialize};

/// Script artifact backing a deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptResource {
    /// Content digest of the uploaded script.
    #[serde(default)]
    pub etag: Option<String>,
    /// Event handlers exported by the script.
    #[serde(default)]
    pub handlers: Vec<String>,
    /// Tool that uploaded this script revision.
    #[serde(default)]
    pub last_deployed_from: Option<String>,
}

/// Named resource reference bound to a deployment.
///
/// Names are not guaranteed unique; the platform's ordering is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// Binding kind, e.g. `kv_namespace` or `plain_text`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Name under which the resource is exposed to the script.
    pub name: String,
}

impl Binding {
    /// Creates a binding descriptor.
    #[must_use]
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
        }
    }
}

/// Full resource payload of a deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentResources {
    /// Script artifact.
    #[serde(default)]
    pub script: ScriptResource,
    /// Ordered binding descriptors.
    #[serde(default)]
    pub bindings: Vec<Binding>,
}
