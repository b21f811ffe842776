//! ResourceStore trait for mocking
//!
//! This trait abstracts resource access so the admission handlers can be
//! tested without a running API server. [`KubeStore`](crate::KubeStore)
//! implements it against Kubernetes, and tests use the in-memory mock.

use crate::error::StoreError;
use crds::{AwsControlPlane, Cluster, G8sControlPlane, NetworkPool, Release};

/// Trait for resource store operations
///
/// Every call is a suspension point; callers wrap them in
/// [`retry`](crate::retry) and decide how to treat not-found.
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait ResourceStore: Send + Sync {
    /// List every NetworkPool in every namespace
    async fn list_network_pools(&self) -> Result<Vec<NetworkPool>, StoreError>;

    /// List every Release (cluster-scoped)
    async fn list_releases(&self) -> Result<Vec<Release>, StoreError>;

    /// Get a Cluster by name and namespace
    async fn get_cluster(&self, name: &str, namespace: &str) -> Result<Cluster, StoreError>;

    /// Get an AwsControlPlane by name and namespace
    async fn get_aws_control_plane(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<AwsControlPlane, StoreError>;

    /// Get a G8sControlPlane by name and namespace
    async fn get_g8s_control_plane(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<G8sControlPlane, StoreError>;

    /// Write back `spec.availabilityZones` of an AwsControlPlane
    ///
    /// No resourceVersion precondition is sent: the last writer wins.
    async fn update_aws_control_plane(
        &self,
        control_plane: &AwsControlPlane,
    ) -> Result<(), StoreError>;
}
