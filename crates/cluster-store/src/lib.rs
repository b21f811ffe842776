//! Cluster Store
//!
//! Access to the resources the admission policies read and write:
//!
//! - [`ResourceStore`]: the async contract (list, get, update) consumed by
//!   the admission handlers
//! - [`KubeStore`]: the Kubernetes API implementation
//! - [`Lookup`]: found/absent result for lookups where a missing object is
//!   expected and handled by a fallback default
//! - [`retry`]: bounded retry with a capped Fibonacci backoff and
//!   per-attempt timeouts
//! - `MockResourceStore` (feature `test-util`): in-memory store for tests
//!
//! # Example
//!
//! ```no_run
//! use cluster_store::{KubeStore, Lookup, ResourceStore, RetryPolicy, lookup, retry};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = kube::Client::try_default().await?;
//! let store = KubeStore::new(client);
//! let policy = RetryPolicy::default();
//!
//! let pools = retry(&policy, None, "list NetworkPools", || store.list_network_pools()).await?;
//! println!("{} network pools", pools.len());
//!
//! let cluster = retry(&policy, None, "get Cluster", || {
//!     store.get_cluster("demo", "org-acme")
//! })
//! .await;
//! match lookup(cluster)? {
//!     Lookup::Found(cluster) => println!("found {:?}", cluster.metadata.name),
//!     Lookup::Absent => println!("cluster not created yet"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod backoff;
pub mod client;
pub mod error;
pub mod lookup;
pub mod retry;
#[path = "trait.rs"]
pub mod store_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use backoff::FibonacciBackoff;
pub use client::KubeStore;
pub use error::StoreError;
pub use lookup::{Lookup, lookup};
pub use retry::{RetryPolicy, retry};
pub use store_trait::ResourceStore;
#[cfg(feature = "test-util")]
pub use mock::MockResourceStore;
