//! NetworkPool CRD
//!
//! Claims an IP range for a tenant. Claimed ranges must not overlap each
//! other or the platform's reserved ranges.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// NetworkPoolSpec defines the range a tenant network claims
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[kube(
    group = "dcops.microscaler.io",
    version = "v1alpha1",
    kind = "NetworkPool",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPoolSpec {
    /// Claimed range in CIDR notation (e.g., "10.1.0.0/16")
    pub cidr_block: String,
}
