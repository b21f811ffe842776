//! Release CRD
//!
//! Cluster-scoped. Each Release names an installable platform version
//! (`v<major>.<minor>.<patch>`) and the component versions it ships.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Component carrying the infrastructure operator version of a release
pub const INFRASTRUCTURE_OPERATOR_COMPONENT: &str = "infrastructure-operator";

/// ReleaseSpec defines the contents of a platform release
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[kube(group = "dcops.microscaler.io", version = "v1alpha1", kind = "Release")]
#[serde(rename_all = "camelCase")]
pub struct ReleaseSpec {
    /// Lifecycle state of the release
    #[serde(default)]
    pub state: ReleaseState,

    /// Components shipped with the release
    #[serde(default)]
    pub components: Vec<ReleaseComponent>,
}

/// Release lifecycle state
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseState {
    /// Installable and supported
    #[default]
    Active,

    /// Installable, scheduled for removal
    Deprecated,

    /// Work in progress
    Wip,
}

/// A component of a release
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseComponent {
    /// Component name (e.g., "infrastructure-operator")
    pub name: String,

    /// Component version
    pub version: String,
}

impl Release {
    /// Version of the named component, if the release ships it
    pub fn component_version(&self, component: &str) -> Option<&str> {
        self.spec
            .components
            .iter()
            .find(|c| c.name == component)
            .map(|c| c.version.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_version() {
        let release = Release::new(
            "v11.3.0",
            ReleaseSpec {
                state: ReleaseState::Active,
                components: vec![ReleaseComponent {
                    name: INFRASTRUCTURE_OPERATOR_COMPONENT.to_string(),
                    version: "9.1.0".to_string(),
                }],
            },
        );
        assert_eq!(release.component_version(INFRASTRUCTURE_OPERATOR_COMPONENT), Some("9.1.0"));
        assert_eq!(release.component_version("cert-operator"), None);
    }

    #[test]
    fn test_release_state_deserializes_kebab_case() {
        let spec: ReleaseSpec = serde_json::from_str(r#"{"state":"deprecated"}"#).unwrap();
        assert_eq!(spec.state, ReleaseState::Deprecated);
        assert!(spec.components.is_empty());
    }
}
