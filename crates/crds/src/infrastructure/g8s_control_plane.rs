//! G8sControlPlane CRD
//!
//! Provider-independent control plane. Its replica count must agree with the
//! number of availability zones on the linked `AwsControlPlane`.

use crate::references::InfrastructureReference;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// G8sControlPlaneSpec defines the control plane size
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[kube(
    group = "dcops.microscaler.io",
    version = "v1alpha1",
    kind = "G8sControlPlane",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct G8sControlPlaneSpec {
    /// Number of masters (1 or 3)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    /// Reference to the provider-specific control plane
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infrastructure_ref: Option<InfrastructureReference>,
}

impl G8sControlPlane {
    /// Replica count, treating zero as unset
    pub fn replicas(&self) -> Option<i32> {
        self.spec.replicas.filter(|r| *r != 0)
    }
}
