//! Tenant Admission Controller
//!
//! Defaulting and validating admission for tenant cluster resources:
//!
//! - **NetworkPool**: claimed CIDR must not overlap another pool or a
//!   platform-reserved range
//! - **Cluster / AwsCluster**: release label changes must follow the upgrade
//!   policy; AwsCluster provider settings are defaulted from configuration
//! - **AwsControlPlane**: instance type and availability zones are defaulted;
//!   zone lists are validated and immutable except for HA promotion
//! - **G8sControlPlane**: replicas and infrastructure reference are
//!   defaulted; promotion from one to three masters re-allocates zones on the
//!   linked AwsControlPlane
//!
//! Decoding requests and encoding responses belong to the webhook server;
//! this crate takes typed resources and returns an [`AdmissionDecision`].

pub mod admitter;
pub mod config;
pub mod conflict;
pub mod context;
pub mod decision;
pub mod error;
#[cfg(test)]
mod test_utils;

pub use admitter::Admitter;
pub use config::AdmissionConfig;
pub use conflict::ConflictChecker;
pub use context::AdmissionContext;
pub use decision::AdmissionDecision;
pub use error::{AdmissionError, ErrorKind};
