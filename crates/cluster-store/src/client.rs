//! Kubernetes-backed resource store

use crate::error::StoreError;
use crate::store_trait::ResourceStore;
use crds::{AwsControlPlane, Cluster, G8sControlPlane, NetworkPool, Release};
use kube::api::{ListParams, Patch, PatchParams};
use kube::{Api, Client, Resource};
use tracing::debug;

/// Resource store backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl std::fmt::Debug for KubeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeStore").finish_non_exhaustive()
    }
}

impl KubeStore {
    /// Create a store from an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get a namespaced object, mapping a missing object to `NotFound`
    async fn get_namespaced<K>(&self, name: &str, namespace: &str) -> Result<K, StoreError>
    where
        K: Resource<Scope = kube::core::NamespaceResourceScope>
            + Clone
            + std::fmt::Debug
            + serde::de::DeserializeOwned,
        <K as Resource>::DynamicType: Default,
    {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        match api.get_opt(name).await? {
            Some(obj) => Ok(obj),
            None => Err(StoreError::NotFound(format!(
                "{} {}/{}",
                K::kind(&Default::default()),
                namespace,
                name
            ))),
        }
    }
}

#[async_trait::async_trait]
impl ResourceStore for KubeStore {
    async fn list_network_pools(&self) -> Result<Vec<NetworkPool>, StoreError> {
        let api: Api<NetworkPool> = Api::all(self.client.clone());
        let list = api.list(&ListParams::default()).await?;
        debug!("Listed {} NetworkPools", list.items.len());
        Ok(list.items)
    }

    async fn list_releases(&self) -> Result<Vec<Release>, StoreError> {
        let api: Api<Release> = Api::all(self.client.clone());
        let list = api.list(&ListParams::default()).await?;
        debug!("Listed {} Releases", list.items.len());
        Ok(list.items)
    }

    async fn get_cluster(&self, name: &str, namespace: &str) -> Result<Cluster, StoreError> {
        self.get_namespaced(name, namespace).await
    }

    async fn get_aws_control_plane(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<AwsControlPlane, StoreError> {
        self.get_namespaced(name, namespace).await
    }

    async fn get_g8s_control_plane(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<G8sControlPlane, StoreError> {
        self.get_namespaced(name, namespace).await
    }

    async fn update_aws_control_plane(
        &self,
        control_plane: &AwsControlPlane,
    ) -> Result<(), StoreError> {
        let name = control_plane.metadata.name.as_deref().ok_or_else(|| {
            StoreError::NotFound("AwsControlPlane without metadata.name".to_string())
        })?;
        let namespace = control_plane.metadata.namespace.as_deref().unwrap_or("default");

        let api: Api<AwsControlPlane> = Api::namespaced(self.client.clone(), namespace);
        let patch = serde_json::json!({
            "spec": {
                "availabilityZones": control_plane.spec.availability_zones,
            }
        });
        api.patch(name, &PatchParams::default(), &Patch::Merge(&patch)).await?;
        debug!("Updated availability zones of AwsControlPlane {}/{}", namespace, name);
        Ok(())
    }
}
