//! Cluster CRD
//!
//! The top-level tenant cluster. Its labels carry the release the cluster
//! runs; its conditions report whether a creation or upgrade is underway.

use crate::conditions::Condition;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// ClusterSpec defines the desired state of a tenant cluster
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[kube(
    group = "dcops.microscaler.io",
    version = "v1alpha1",
    kind = "Cluster",
    namespaced,
    status = "ClusterStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
    /// Reference to the provider-specific infrastructure resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infrastructure_ref: Option<crate::references::InfrastructureReference>,
}

/// ClusterStatus defines the observed state of a tenant cluster
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStatus {
    /// Lifecycle conditions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl Cluster {
    /// Conditions reported in status, empty when status is unset
    pub fn conditions(&self) -> &[Condition] {
        self.status.as_ref().map_or(&[], |s| s.conditions.as_slice())
    }
}
