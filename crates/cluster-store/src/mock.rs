//! Mock ResourceStore for unit testing
//!
//! In-memory implementation of [`ResourceStore`] for tests that should not
//! need a running API server. Resources are seeded with the `add_*` helpers;
//! updates are applied and recorded; `fail_next` injects transient errors.

use crate::error::StoreError;
use crate::store_trait::ResourceStore;
use crds::{AwsControlPlane, Cluster, G8sControlPlane, NetworkPool, Release};
use kube::ResourceExt;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Key = (String, String);

/// Mock ResourceStore for testing
#[derive(Debug, Clone, Default)]
pub struct MockResourceStore {
    network_pools: Arc<Mutex<Vec<NetworkPool>>>,
    releases: Arc<Mutex<Vec<Release>>>,
    clusters: Arc<Mutex<HashMap<Key, Cluster>>>,
    aws_control_planes: Arc<Mutex<HashMap<Key, AwsControlPlane>>>,
    g8s_control_planes: Arc<Mutex<HashMap<Key, G8sControlPlane>>>,
    // Every AwsControlPlane passed to update, in call order
    updates: Arc<Mutex<Vec<AwsControlPlane>>>,
    // Number of upcoming calls that fail with a transient error
    failures: Arc<Mutex<u32>>,
    calls: Arc<Mutex<u32>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn key(name: &str, namespace: &str) -> Key {
    (namespace.to_string(), name.to_string())
}

fn key_of<K: ResourceExt>(obj: &K) -> Key {
    key(&obj.name_any(), obj.namespace().as_deref().unwrap_or("default"))
}

impl MockResourceStore {
    /// Create an empty mock store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a NetworkPool to the mock store (for test setup)
    pub fn add_network_pool(&self, pool: NetworkPool) {
        lock(&self.network_pools).push(pool);
    }

    /// Add a Release to the mock store (for test setup)
    pub fn add_release(&self, release: Release) {
        lock(&self.releases).push(release);
    }

    /// Add a Cluster to the mock store (for test setup)
    pub fn add_cluster(&self, cluster: Cluster) {
        lock(&self.clusters).insert(key_of(&cluster), cluster);
    }

    /// Add an AwsControlPlane to the mock store (for test setup)
    pub fn add_aws_control_plane(&self, control_plane: AwsControlPlane) {
        lock(&self.aws_control_planes).insert(key_of(&control_plane), control_plane);
    }

    /// Add a G8sControlPlane to the mock store (for test setup)
    pub fn add_g8s_control_plane(&self, control_plane: G8sControlPlane) {
        lock(&self.g8s_control_planes).insert(key_of(&control_plane), control_plane);
    }

    /// Make the next `n` calls fail with a transient error
    pub fn fail_next(&self, n: u32) {
        *lock(&self.failures) = n;
    }

    /// AwsControlPlanes written through `update_aws_control_plane`
    pub fn updates(&self) -> Vec<AwsControlPlane> {
        lock(&self.updates).clone()
    }

    /// Current stored AwsControlPlane, if any
    pub fn aws_control_plane(&self, name: &str, namespace: &str) -> Option<AwsControlPlane> {
        lock(&self.aws_control_planes).get(&key(name, namespace)).cloned()
    }

    /// Total number of store calls, failed ones included
    pub fn call_count(&self) -> u32 {
        *lock(&self.calls)
    }

    fn check_failure(&self, operation: &str) -> Result<(), StoreError> {
        *lock(&self.calls) += 1;
        let mut failures = lock(&self.failures);
        if *failures > 0 {
            *failures -= 1;
            return Err(StoreError::Unavailable(format!("injected failure: {}", operation)));
        }
        Ok(())
    }

    fn get<K: Clone>(
        map: &Mutex<HashMap<Key, K>>,
        kind: &str,
        name: &str,
        namespace: &str,
    ) -> Result<K, StoreError> {
        lock(map)
            .get(&key(name, namespace))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("{} {}/{}", kind, namespace, name)))
    }
}

#[async_trait::async_trait]
impl ResourceStore for MockResourceStore {
    async fn list_network_pools(&self) -> Result<Vec<NetworkPool>, StoreError> {
        self.check_failure("list NetworkPools")?;
        Ok(lock(&self.network_pools).clone())
    }

    async fn list_releases(&self) -> Result<Vec<Release>, StoreError> {
        self.check_failure("list Releases")?;
        Ok(lock(&self.releases).clone())
    }

    async fn get_cluster(&self, name: &str, namespace: &str) -> Result<Cluster, StoreError> {
        self.check_failure("get Cluster")?;
        Self::get(&self.clusters, "Cluster", name, namespace)
    }

    async fn get_aws_control_plane(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<AwsControlPlane, StoreError> {
        self.check_failure("get AwsControlPlane")?;
        Self::get(&self.aws_control_planes, "AwsControlPlane", name, namespace)
    }

    async fn get_g8s_control_plane(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<G8sControlPlane, StoreError> {
        self.check_failure("get G8sControlPlane")?;
        Self::get(&self.g8s_control_planes, "G8sControlPlane", name, namespace)
    }

    async fn update_aws_control_plane(
        &self,
        control_plane: &AwsControlPlane,
    ) -> Result<(), StoreError> {
        self.check_failure("update AwsControlPlane")?;
        let key = key_of(control_plane);
        let mut stored = lock(&self.aws_control_planes);
        let Some(existing) = stored.get_mut(&key) else {
            return Err(StoreError::NotFound(format!("AwsControlPlane {}/{}", key.0, key.1)));
        };
        existing.spec.availability_zones = control_plane.spec.availability_zones.clone();
        lock(&self.updates).push(control_plane.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crds::{AwsControlPlaneSpec, NetworkPoolSpec};

    fn control_plane(zones: &[&str]) -> AwsControlPlane {
        let mut cp = AwsControlPlane::new(
            "demo",
            AwsControlPlaneSpec {
                instance_type: Some("m5.xlarge".to_string()),
                availability_zones: Some(zones.iter().map(|z| z.to_string()).collect()),
            },
        );
        cp.metadata.namespace = Some("org-acme".to_string());
        cp
    }

    #[tokio::test]
    async fn test_seeded_resources_are_returned() {
        let store = MockResourceStore::new();
        store.add_network_pool(NetworkPool::new(
            "pool-a",
            NetworkPoolSpec {
                cidr_block: "10.10.0.0/16".to_string(),
            },
        ));
        store.add_aws_control_plane(control_plane(&["eu-central-1a"]));

        assert_eq!(store.list_network_pools().await.unwrap().len(), 1);
        let cp = store.get_aws_control_plane("demo", "org-acme").await.unwrap();
        assert_eq!(cp.availability_zones(), ["eu-central-1a".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_resource_is_not_found() {
        let store = MockResourceStore::new();
        let err = store.get_cluster("demo", "org-acme").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_is_applied_and_recorded() {
        let store = MockResourceStore::new();
        store.add_aws_control_plane(control_plane(&["a"]));

        store.update_aws_control_plane(&control_plane(&["a", "b", "c"])).await.unwrap();

        assert_eq!(store.updates().len(), 1);
        let stored = store.aws_control_plane("demo", "org-acme").unwrap();
        assert_eq!(stored.availability_zones().len(), 3);
    }

    #[tokio::test]
    async fn test_injected_failures_are_transient() {
        let store = MockResourceStore::new();
        store.fail_next(1);

        let err = store.list_releases().await.unwrap_err();
        assert!(err.is_transient());
        assert!(store.list_releases().await.is_ok());
        assert_eq!(store.call_count(), 2);
    }
}
