//! Version label mirroring
//!
//! Infrastructure resources carry the release and operator version of the
//! tenant cluster they belong to. Missing labels are copied from the owning
//! Cluster, named by the cluster label or else by the resource's own name.
//! When the Cluster does not exist yet, the operator version is taken from
//! the release the resource names. A Cluster that exists but lacks a label
//! leaves it unset.

use super::Admitter;
use crate::decision::{add, set};
use crate::error::AdmissionError;
use cluster_store::Lookup;
use crds::{INFRASTRUCTURE_OPERATOR_COMPONENT, labels};
use json_patch::PatchOperation;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::ResourceExt;
use serde_json::json;
use std::collections::BTreeMap;
use tokio::time::Instant;
use tracing::{debug, warn};

const MIRRORED: [&str; 2] = [labels::RELEASE_VERSION, labels::OPERATOR_VERSION];

impl Admitter {
    /// Patches setting missing `release-version` / `operator-version` labels
    pub(crate) async fn mirror_version_labels(
        &self,
        kind: &str,
        metadata: &ObjectMeta,
        deadline: Option<Instant>,
    ) -> Result<Vec<PatchOperation>, AdmissionError> {
        let mut missing: Vec<&str> = MIRRORED
            .into_iter()
            .filter(|key| labels::get(metadata, key).is_none())
            .collect();
        if missing.is_empty() {
            return Ok(Vec::new());
        }

        let namespace = metadata.namespace.as_deref().unwrap_or("default");
        let mut values: BTreeMap<&str, String> = BTreeMap::new();

        let mut cluster_found = false;
        let cluster_name = labels::get(metadata, labels::CLUSTER).or(metadata.name.as_deref());
        if let Some(cluster_name) = cluster_name {
            let store = &self.store;
            match self
                .fetch_optional("get Cluster", deadline, || {
                    store.get_cluster(cluster_name, namespace)
                })
                .await?
            {
                Lookup::Found(cluster) => {
                    cluster_found = true;
                    for key in &missing {
                        if let Some(value) = labels::get(&cluster.metadata, key) {
                            values.insert(*key, value.to_string());
                        }
                    }
                }
                Lookup::Absent => {
                    warn!(
                        "Cluster {}/{} not found, cannot mirror version labels onto {}",
                        namespace, cluster_name, kind
                    );
                }
            }
        }
        missing.retain(|key| !values.contains_key(key));

        // Release fallback only when there is no Cluster to copy from
        if !cluster_found && missing.contains(&labels::OPERATOR_VERSION) {
            if let Some(release) = labels::get(metadata, labels::RELEASE_VERSION) {
                if let Some(version) = self.operator_version_of(release, deadline).await? {
                    values.insert(labels::OPERATOR_VERSION, version);
                }
            }
        }

        if values.is_empty() {
            return Ok(Vec::new());
        }
        for (key, value) in &values {
            debug!("Defaulting {} label {}={}", kind, key, value);
        }

        let Some(existing) = metadata.labels.as_ref() else {
            return Ok(vec![add(["metadata", "labels"], json!(values))]);
        };
        Ok(values
            .into_iter()
            .map(|(key, value)| {
                set(
                    existing.contains_key(key),
                    ["metadata", "labels", key],
                    json!(value),
                )
            })
            .collect())
    }

    /// Infrastructure operator version shipped with `release`
    async fn operator_version_of(
        &self,
        release: &str,
        deadline: Option<Instant>,
    ) -> Result<Option<String>, AdmissionError> {
        let store = &self.store;
        let releases = self
            .fetch("list Releases", deadline, || store.list_releases())
            .await?;
        let wanted = release.trim_start_matches('v');
        Ok(releases
            .iter()
            .find(|r| r.name_any().trim_start_matches('v') == wanted)
            .and_then(|r| r.component_version(INFRASTRUCTURE_OPERATOR_COMPONENT))
            .map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::*;
    use cluster_store::MockResourceStore;
    use crds::labels;
    use json_patch::PatchOperation;

    fn label_patch_count(patches: &[PatchOperation]) -> usize {
        patches
            .iter()
            .filter(|p| patch_path(p).starts_with("/metadata/labels"))
            .count()
    }

    #[tokio::test]
    async fn test_labels_copied_from_cluster() {
        let store = MockResourceStore::new();
        store.add_cluster(cluster("demo", "org-acme", Some("11.3.0"), Some("9.1.0"), vec![]));
        let admitter = admitter(&store);

        let meta = metadata("demo", "org-acme", &[(labels::CLUSTER, "demo")]);
        let patches = admitter.mirror_version_labels("AwsCluster", &meta, None).await.unwrap();

        let doc = serde_json::json!({"metadata": {"labels": {labels::CLUSTER: "demo"}}});
        let doc = apply(&doc, &patches);
        assert_eq!(doc["metadata"]["labels"][labels::RELEASE_VERSION], "11.3.0");
        assert_eq!(doc["metadata"]["labels"][labels::OPERATOR_VERSION], "9.1.0");
    }

    #[tokio::test]
    async fn test_present_labels_are_kept() {
        let store = MockResourceStore::new();
        let admitter = admitter(&store);

        let meta = metadata(
            "demo",
            "org-acme",
            &[(labels::RELEASE_VERSION, "11.3.0"), (labels::OPERATOR_VERSION, "9.1.0")],
        );
        let patches = admitter.mirror_version_labels("AwsCluster", &meta, None).await.unwrap();
        assert!(patches.is_empty());
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_absent_cluster_falls_back_to_release_component() {
        let store = MockResourceStore::new();
        store.add_release(release("v11.3.0", Some("9.1.0")));
        let admitter = admitter(&store);

        let meta = metadata(
            "demo",
            "org-acme",
            &[(labels::CLUSTER, "demo"), (labels::RELEASE_VERSION, "11.3.0")],
        );
        let patches = admitter.mirror_version_labels("AwsControlPlane", &meta, None).await.unwrap();

        assert_eq!(label_patch_count(&patches), 1);
        let doc = apply(&serde_json::json!({"metadata": {"labels": {}}}), &patches);
        assert_eq!(doc["metadata"]["labels"][labels::OPERATOR_VERSION], "9.1.0");
    }

    #[tokio::test]
    async fn test_found_cluster_without_operator_label_skips_release_fallback() {
        let store = MockResourceStore::new();
        store.add_cluster(cluster("demo", "org-acme", Some("11.3.0"), None, vec![]));
        store.add_release(release("v11.3.0", Some("9.9.9")));
        let admitter = admitter(&store);

        let meta = metadata("demo", "org-acme", &[(labels::CLUSTER, "demo")]);
        let patches = admitter.mirror_version_labels("AwsControlPlane", &meta, None).await.unwrap();

        let doc = apply(&serde_json::json!({"metadata": {"labels": {}}}), &patches);
        assert_eq!(doc["metadata"]["labels"][labels::RELEASE_VERSION], "11.3.0");
        assert!(doc["metadata"]["labels"].get(labels::OPERATOR_VERSION).is_none());
        assert_eq!(label_patch_count(&patches), 1);
    }

    #[tokio::test]
    async fn test_absent_cluster_without_release_emits_nothing() {
        let store = MockResourceStore::new();
        let admitter = admitter(&store);

        let meta = metadata("demo", "org-acme", &[(labels::CLUSTER, "demo")]);
        let patches = admitter.mirror_version_labels("G8sControlPlane", &meta, None).await.unwrap();
        assert!(patches.is_empty());
    }

    #[tokio::test]
    async fn test_missing_labels_map_is_added_whole() {
        let store = MockResourceStore::new();
        store.add_cluster(cluster("demo", "org-acme", Some("11.3.0"), Some("9.1.0"), vec![]));
        let admitter = admitter(&store);

        let mut meta = metadata("demo", "org-acme", &[]);
        meta.labels = None;
        let patches = admitter.mirror_version_labels("AwsCluster", &meta, None).await.unwrap();

        assert_eq!(patch_paths(&patches), vec!["/metadata/labels"]);
        let doc = apply(&serde_json::json!({"metadata": {}}), &patches);
        assert_eq!(doc["metadata"]["labels"][labels::RELEASE_VERSION], "11.3.0");
        assert_eq!(doc["metadata"]["labels"][labels::OPERATOR_VERSION], "9.1.0");
    }

    #[tokio::test]
    async fn test_cluster_lookup_failure_is_unavailable() {
        let store = MockResourceStore::new();
        store.fail_next(10);
        let admitter = admitter(&store);

        let meta = metadata("demo", "org-acme", &[(labels::CLUSTER, "demo")]);
        let err = admitter.mirror_version_labels("AwsCluster", &meta, None).await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Unavailable);
    }
}
