//! Test utilities for unit testing admission handlers
//!
//! Builders for test resources and an [`Admitter`] wired to a
//! `MockResourceStore` with a seeded random source.

use crate::admitter::Admitter;
use crate::config::AdmissionConfig;
use admission_policy::NetworkRange;
use cluster_store::{MockResourceStore, RetryPolicy};
use crds::*;
use json_patch::PatchOperation;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Zones configured for the test region
pub const ZONES: [&str; 3] = ["eu-central-1a", "eu-central-1b", "eu-central-1c"];

/// Retry policy with millisecond backoffs
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        min_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(2),
        attempt_timeout: Duration::from_secs(1),
    }
}

pub fn range(cidr: &str) -> NetworkRange {
    NetworkRange::parse(cidr).unwrap()
}

/// Configuration with the test zones and platform defaults
pub fn config() -> AdmissionConfig {
    let zones = ZONES.join(",");
    let mut config = AdmissionConfig::from_lookup(|key| match key {
        "AVAILABILITY_ZONES" => Some(zones.clone()),
        "BASE_DOMAIN" => Some("gauss.eu-central-1.aws.example.io".to_string()),
        "REGION" => Some("eu-central-1".to_string()),
        _ => None,
    })
    .unwrap();
    config.retry = fast_retry();
    config
}

/// Admitter over `store` with a fixed seed
pub fn admitter(store: &MockResourceStore) -> Admitter {
    admitter_with_config(store, config())
}

pub fn admitter_with_config(store: &MockResourceStore, config: AdmissionConfig) -> Admitter {
    Admitter::with_rng(Arc::new(store.clone()), config, StdRng::seed_from_u64(42))
}

/// Helper to create ObjectMeta with labels
pub fn metadata(name: &str, namespace: &str, labels: &[(&str, &str)]) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        labels: Some(
            labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        ),
        ..Default::default()
    }
}

fn version_labels<'a>(
    release: Option<&'a str>,
    operator: Option<&'a str>,
) -> Vec<(&'static str, &'a str)> {
    let mut pairs = Vec::new();
    if let Some(release) = release {
        pairs.push((labels::RELEASE_VERSION, release));
    }
    if let Some(operator) = operator {
        pairs.push((labels::OPERATOR_VERSION, operator));
    }
    pairs
}

/// Helper to create a test Cluster
pub fn cluster(
    name: &str,
    namespace: &str,
    release: Option<&str>,
    operator: Option<&str>,
    conditions: Vec<Condition>,
) -> Cluster {
    Cluster {
        metadata: metadata(name, namespace, &version_labels(release, operator)),
        spec: ClusterSpec::default(),
        status: Some(ClusterStatus { conditions }),
    }
}

/// Helper to create a test Release, optionally shipping an infrastructure operator
pub fn release(name: &str, operator: Option<&str>) -> Release {
    Release::new(
        name,
        ReleaseSpec {
            state: ReleaseState::Active,
            components: operator
                .map(|version| ReleaseComponent {
                    name: INFRASTRUCTURE_OPERATOR_COMPONENT.to_string(),
                    version: version.to_string(),
                })
                .into_iter()
                .collect(),
        },
    )
}

pub fn network_pool(name: &str, namespace: &str, cidr: &str) -> NetworkPool {
    NetworkPool {
        metadata: metadata(name, namespace, &[]),
        spec: NetworkPoolSpec {
            cidr_block: cidr.to_string(),
        },
    }
}

/// Helper to create a test AwsCluster with an empty spec
pub fn aws_cluster(
    name: &str,
    namespace: &str,
    release: Option<&str>,
    conditions: Vec<Condition>,
) -> AwsCluster {
    let mut pairs = vec![(labels::CLUSTER, name)];
    pairs.extend(version_labels(release, None));
    AwsCluster {
        metadata: metadata(name, namespace, &pairs),
        spec: AwsClusterSpec::default(),
        status: Some(AwsClusterStatus { conditions }),
    }
}

pub fn aws_control_plane(name: &str, namespace: &str, zones: Option<&[&str]>) -> AwsControlPlane {
    AwsControlPlane {
        metadata: metadata(name, namespace, &[(labels::CLUSTER, name)]),
        spec: AwsControlPlaneSpec {
            instance_type: None,
            availability_zones: zones.map(|z| z.iter().map(|s| s.to_string()).collect()),
        },
    }
}

pub fn g8s_control_plane(name: &str, namespace: &str, replicas: Option<i32>) -> G8sControlPlane {
    G8sControlPlane {
        metadata: metadata(name, namespace, &[(labels::CLUSTER, name)]),
        spec: G8sControlPlaneSpec {
            replicas,
            infrastructure_ref: None,
        },
    }
}

/// JSON pointer of a patch operation
pub fn patch_path(op: &PatchOperation) -> String {
    match op {
        PatchOperation::Add(op) => op.path.to_string(),
        PatchOperation::Replace(op) => op.path.to_string(),
        PatchOperation::Remove(op) => op.path.to_string(),
        PatchOperation::Move(op) => op.path.to_string(),
        PatchOperation::Copy(op) => op.path.to_string(),
        PatchOperation::Test(op) => op.path.to_string(),
    }
}

pub fn patch_paths(patches: &[PatchOperation]) -> Vec<String> {
    patches.iter().map(patch_path).collect()
}

/// Apply patches to a copy of `doc`
pub fn apply(doc: &Value, patches: &[PatchOperation]) -> Value {
    let mut doc = doc.clone();
    json_patch::patch(&mut doc, patches).unwrap();
    doc
}

/// Serialize a resource and apply patches to it
pub fn apply_to<K: serde::Serialize>(resource: &K, patches: &[PatchOperation]) -> Value {
    apply(&serde_json::to_value(resource).unwrap(), patches)
}
