//! Tenant Admission CRD Definitions
//!
//! Kubernetes Custom Resource Definitions for the resources the admission
//! policies inspect and default.

pub mod cluster;
pub mod conditions;
pub mod infrastructure;
pub mod labels;
pub mod network_pool;
pub mod references;
pub mod release;

pub use cluster::*;
pub use conditions::*;
pub use infrastructure::*;
pub use network_pool::*;
pub use references::*;
pub use release::*;

/// API group shared by every CRD in this crate
pub const API_GROUP: &str = "dcops.microscaler.io";

/// API version shared by every CRD in this crate
pub const API_VERSION: &str = "v1alpha1";
