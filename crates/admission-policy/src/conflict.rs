//! CIDR conflict search
//!
//! Builds the conflict universe from claimed and reserved ranges and reports
//! the first member that overlaps a candidate. Fetching the claimed ranges
//! is the caller's job; this module only compares.

use crate::cidr::NetworkRange;
use std::fmt;

/// Identity of a namespaced resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceIdentity {
    /// Resource name
    pub name: String,
    /// Resource namespace
    pub namespace: String,
}

impl ResourceIdentity {
    /// Create an identity from name and namespace
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

impl fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// A range owned by a network resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedRange {
    /// Owning resource
    pub owner: ResourceIdentity,
    /// Claimed range
    pub range: NetworkRange,
}

/// Ranges the platform reserves for itself
///
/// Always part of the conflict universe, after the claimed ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedRanges {
    ranges: Vec<NetworkRange>,
}

impl ReservedRanges {
    /// Platform pod network, platform service network, cluster-internal range
    pub fn new(
        pod_network: NetworkRange,
        service_network: NetworkRange,
        cluster_ip_range: NetworkRange,
    ) -> Self {
        Self {
            ranges: vec![pod_network, service_network, cluster_ip_range],
        }
    }

    /// Reserved ranges in insertion order
    pub fn as_slice(&self) -> &[NetworkRange] {
        &self.ranges
    }
}

/// Find the first range in the conflict universe that overlaps `candidate`
///
/// The universe is every claimed range not owned by `self_identity`, followed
/// by the reserved ranges. A resource re-submitting (or extending) its own
/// range therefore never conflicts with itself, while an identical range
/// owned by anyone else does.
///
/// Which conflicting range is reported follows the order of `claimed`; callers
/// must only rely on whether a conflict exists.
pub fn find_conflict<'a>(
    candidate: &NetworkRange,
    self_identity: &ResourceIdentity,
    claimed: &'a [ClaimedRange],
    reserved: &'a ReservedRanges,
) -> Option<&'a NetworkRange> {
    claimed
        .iter()
        .filter(|c| c.owner != *self_identity)
        .map(|c| &c.range)
        .chain(reserved.as_slice())
        .find(|r| candidate.overlaps(r))
}
