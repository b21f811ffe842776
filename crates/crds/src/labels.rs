//! Label keys shared by tenant cluster resources
//!
//! Version labels are mirrored from the owning `Cluster` onto its
//! infrastructure resources during defaulting.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Release the tenant cluster runs (e.g., "11.3.0")
pub const RELEASE_VERSION: &str = "dcops.microscaler.io/release-version";

/// Version of the infrastructure operator reconciling the tenant cluster
pub const OPERATOR_VERSION: &str = "dcops.microscaler.io/operator-version";

/// Name of the owning `Cluster`, set on every infrastructure resource
pub const CLUSTER: &str = "dcops.microscaler.io/cluster";

/// Read a label value, treating an empty value as unset
pub fn get<'a>(metadata: &'a ObjectMeta, key: &str) -> Option<&'a str> {
    metadata
        .labels
        .as_ref()
        .and_then(|labels| labels.get(key))
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}
