//! Admission handlers for tenant cluster resources.
//!
//! One file per resource kind, each adding `mutate_*` (defaulting) and/or
//! `validate_*` methods to [`Admitter`]:
//! - `network_pool`: CIDR conflicts
//! - `cluster`, `aws_cluster`: release upgrades, provider defaults
//! - `aws_control_plane`, `g8s_control_plane`: zones, replicas, HA promotion
//!
//! Shared pieces live in `labels` (version label mirroring) and `release`
//! (upgrade policy against the stored release catalog).

pub mod aws_cluster;
pub mod aws_control_plane;
pub mod cluster;
pub mod g8s_control_plane;
pub mod labels;
pub mod network_pool;
pub mod release;

use crate::config::AdmissionConfig;
use crate::conflict::ConflictChecker;
use crate::error::AdmissionError;
use admission_policy::allocate;
use cluster_store::{Lookup, ResourceStore, StoreError, lookup, retry};
use kube::ResourceExt;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::time::Instant;
use tracing::error;

/// Admits tenant cluster resources.
pub struct Admitter {
    pub(crate) store: Arc<dyn ResourceStore>,
    pub(crate) config: AdmissionConfig,
    pub(crate) conflicts: ConflictChecker,
    /// Random source for zone selection
    rng: Mutex<StdRng>,
}

impl std::fmt::Debug for Admitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Admitter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Admitter {
    /// Create an admitter seeded from the operating system
    pub fn new(store: Arc<dyn ResourceStore>, config: AdmissionConfig) -> Self {
        Self::with_rng(store, config, StdRng::from_os_rng())
    }

    /// Create an admitter with an explicit random source (e.g., a seeded one in tests)
    pub fn with_rng(store: Arc<dyn ResourceStore>, config: AdmissionConfig, rng: StdRng) -> Self {
        let conflicts = ConflictChecker::new(
            Arc::clone(&store),
            config.reserved_ranges.clone(),
            config.retry.clone(),
        );
        Self {
            store,
            config,
            conflicts,
            rng: Mutex::new(rng),
        }
    }

    /// Run a store call under the retry policy
    ///
    /// Any failure left after retrying means the request cannot be evaluated.
    pub(crate) async fn fetch<T, F, Fut>(
        &self,
        operation: &str,
        deadline: Option<Instant>,
        op: F,
    ) -> Result<T, AdmissionError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        retry(&self.config.retry, deadline, operation, op)
            .await
            .map_err(|e| {
                error!("{} failed: {}", operation, e);
                AdmissionError::unavailable(operation, e)
            })
    }

    /// Like [`fetch`](Self::fetch), but a missing resource is [`Lookup::Absent`]
    pub(crate) async fn fetch_optional<T, F, Fut>(
        &self,
        operation: &str,
        deadline: Option<Instant>,
        op: F,
    ) -> Result<Lookup<T>, AdmissionError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        lookup(retry(&self.config.retry, deadline, operation, op).await).map_err(|e| {
            error!("{} failed: {}", operation, e);
            AdmissionError::unavailable(operation, e)
        })
    }

    /// Pick `count` zones from the configured candidates
    pub(crate) fn allocate_zones(
        &self,
        count: usize,
        preserve: Option<&str>,
    ) -> Result<Vec<String>, AdmissionError> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(allocate(count, &self.config.availability_zones, preserve, &mut *rng)?)
    }
}

/// Name and namespace of a submitted resource
///
/// Namespace defaults to "default" when unset.
pub(crate) fn identity<K: ResourceExt>(
    obj: &K,
    kind: &str,
) -> Result<(String, String), AdmissionError> {
    let name = obj
        .meta()
        .name
        .clone()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AdmissionError::InvalidResource(format!("{} has no metadata.name", kind)))?;
    let namespace = obj.namespace().unwrap_or_else(|| "default".to_string());
    Ok((name, namespace))
}

/// State of an optional string field that needs a default
///
/// `None` when the field holds a value; otherwise `Some(present)`, telling
/// whether the key exists (empty string) and must be replaced rather than added.
pub(crate) fn unset_str(value: Option<&str>) -> Option<bool> {
    match value {
        None => Some(false),
        Some(v) if v.is_empty() => Some(true),
        Some(_) => None,
    }
}
