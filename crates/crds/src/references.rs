//! Kubernetes object references between tenant cluster resources
//!
//! Follows the Kubernetes `ObjectReference` shape (apiVersion, kind, name,
//! namespace) so the reference can be resolved without knowing the Rust type.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Reference from a control plane to its infrastructure counterpart
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureReference {
    /// API version of the referenced resource (e.g., "dcops.microscaler.io/v1alpha1")
    pub api_version: String,

    /// Kind of the referenced resource (e.g., "AwsControlPlane")
    pub kind: String,

    /// Name of the referenced resource
    pub name: String,

    /// Namespace of the referenced resource (defaults to the referencing resource's namespace)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl InfrastructureReference {
    /// Reference an `AwsControlPlane` in this crate's API group
    pub fn aws_control_plane(name: &str, namespace: &str) -> Self {
        Self {
            api_version: format!("{}/{}", crate::API_GROUP, crate::API_VERSION),
            kind: "AwsControlPlane".to_string(),
            name: name.to_string(),
            namespace: Some(namespace.to_string()),
        }
    }
}
