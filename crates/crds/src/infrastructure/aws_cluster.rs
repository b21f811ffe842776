//! AwsCluster CRD
//!
//! Provider settings for a tenant cluster. Most fields are optional on
//! submission and filled in by the defaulting webhook.

use crate::conditions::Condition;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// AwsClusterSpec defines the desired provider settings of a tenant cluster
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[kube(
    group = "dcops.microscaler.io",
    version = "v1alpha1",
    kind = "AwsCluster",
    namespaced,
    status = "AwsClusterStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct AwsClusterSpec {
    /// Cluster-level settings
    #[serde(default)]
    pub cluster: AwsClusterDefinition,

    /// Provider-level settings
    #[serde(default)]
    pub provider: AwsClusterProvider,
}

/// Cluster-level settings
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AwsClusterDefinition {
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// DNS settings
    #[serde(default)]
    pub dns: AwsClusterDns,
}

/// DNS settings
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AwsClusterDns {
    /// Base domain for cluster endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// Provider-level settings
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AwsClusterProvider {
    /// Region the cluster runs in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Secret holding the cloud credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_secret: Option<CredentialSecret>,

    /// Pod network settings
    #[serde(default)]
    pub pods: AwsClusterPods,
}

/// Reference to a credential secret
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSecret {
    /// Secret name
    pub name: String,

    /// Secret namespace
    pub namespace: String,
}

/// Pod network settings
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AwsClusterPods {
    /// Pod network in CIDR notation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr_block: Option<String>,
}

/// AwsClusterStatus defines the observed state of the provider resources
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct AwsClusterStatus {
    /// Lifecycle conditions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl AwsCluster {
    /// Conditions reported in status, empty when status is unset
    pub fn conditions(&self) -> &[Condition] {
        self.status.as_ref().map_or(&[], |s| s.conditions.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_spec_deserializes() {
        let spec: AwsClusterSpec =
            serde_json::from_str(r#"{"provider":{"region":"eu-central-1"}}"#).unwrap();
        assert_eq!(spec.provider.region.as_deref(), Some("eu-central-1"));
        assert!(spec.cluster.description.is_none());
        assert!(spec.cluster.dns.domain.is_none());
        assert!(spec.provider.pods.cidr_block.is_none());
    }

    #[test]
    fn test_credential_secret_camel_case() {
        let spec: AwsClusterSpec = serde_json::from_str(
            r#"{"provider":{"credentialSecret":{"name":"credential-x","namespace":"giantswarm"}}}"#,
        )
        .unwrap();
        let secret = spec.provider.credential_secret.unwrap();
        assert_eq!(secret.name, "credential-x");
        assert_eq!(secret.namespace, "giantswarm");
    }
}
