//! CIDR Conflict Checker
//!
//! Fetches every claimed range from the store and compares the candidate
//! against them and the platform-reserved ranges. Fails closed: when the
//! claimed ranges cannot be listed, no decision is made.

use crate::error::AdmissionError;
use admission_policy::{ClaimedRange, NetworkRange, ReservedRanges, ResourceIdentity, find_conflict};
use cluster_store::{ResourceStore, RetryPolicy, retry};
use kube::ResourceExt;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, error};

const LIST_NETWORK_POOLS: &str = "list NetworkPools";

/// Store-backed CIDR conflict search
#[derive(Clone)]
pub struct ConflictChecker {
    store: Arc<dyn ResourceStore>,
    reserved: ReservedRanges,
    retry: RetryPolicy,
}

impl std::fmt::Debug for ConflictChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConflictChecker")
            .field("reserved", &self.reserved)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl ConflictChecker {
    /// Create a checker over `store` with the platform's reserved ranges
    pub fn new(
        store: Arc<dyn ResourceStore>,
        reserved: ReservedRanges,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            store,
            reserved,
            retry,
        }
    }

    /// Return the first range overlapping `candidate`, if any
    ///
    /// Ranges claimed by `self_identity` are ignored. A stored pool with a
    /// malformed CIDR is a parse error rather than being skipped.
    pub async fn check_conflict(
        &self,
        candidate: &NetworkRange,
        self_identity: &ResourceIdentity,
        deadline: Option<Instant>,
    ) -> Result<Option<NetworkRange>, AdmissionError> {
        let pools = retry(&self.retry, deadline, LIST_NETWORK_POOLS, || {
            self.store.list_network_pools()
        })
        .await
        .map_err(|e| {
            error!("Cannot check {} for conflicts: {}", candidate, e);
            AdmissionError::unavailable(LIST_NETWORK_POOLS, e)
        })?;

        let claimed = pools
            .iter()
            .map(|pool| -> Result<ClaimedRange, AdmissionError> {
                Ok(ClaimedRange {
                    owner: ResourceIdentity::new(
                        pool.name_any(),
                        pool.namespace().unwrap_or_else(|| "default".to_string()),
                    ),
                    range: NetworkRange::parse(&pool.spec.cidr_block)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "Checking {} for {} against {} claimed and {} reserved ranges",
            candidate,
            self_identity,
            claimed.len(),
            self.reserved.as_slice().len()
        );

        Ok(find_conflict(candidate, self_identity, &claimed, &self.reserved).copied())
    }
}
