//! Infrastructure CRDs
//!
//! Provider-specific resources that back a tenant cluster:
//! - AwsCluster (cluster-wide provider settings)
//! - AwsControlPlane (control plane machines and their availability zones)
//! - G8sControlPlane (provider-independent control plane, replica count)

pub mod aws_cluster;
pub mod aws_control_plane;
pub mod g8s_control_plane;

pub use aws_cluster::*;
pub use aws_control_plane::*;
pub use g8s_control_plane::*;
