//! AwsControlPlane CRD
//!
//! Machines of a tenant control plane: instance type and the ordered list of
//! availability zones the masters are spread over (one or three).

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// AwsControlPlaneSpec defines the control plane machines
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[kube(
    group = "dcops.microscaler.io",
    version = "v1alpha1",
    kind = "AwsControlPlane",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct AwsControlPlaneSpec {
    /// Machine instance type for masters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,

    /// Availability zones, one per master
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zones: Option<Vec<String>>,
}

impl AwsControlPlane {
    /// Configured availability zones, empty when unset
    pub fn availability_zones(&self) -> &[String] {
        self.spec.availability_zones.as_deref().unwrap_or_default()
    }
}
