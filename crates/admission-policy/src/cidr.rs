//! CIDR model
//!
//! A [`NetworkRange`] wraps an [`IpNet`] and answers the one question the
//! conflict checker needs: do two ranges overlap?

use crate::error::PolicyError;
use ipnet::IpNet;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// An IP prefix (address + prefix length)
///
/// The address is kept as written, so `172.18.224.1/19` displays unchanged,
/// while containment always works on the masked network address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkRange {
    net: IpNet,
}

impl NetworkRange {
    /// Parse a range in CIDR notation
    ///
    /// Malformed input is an error, never silently skipped.
    pub fn parse(input: &str) -> Result<Self, PolicyError> {
        input
            .trim()
            .parse::<IpNet>()
            .map(|net| Self { net })
            .map_err(|e| PolicyError::InvalidCidr {
                input: input.to_string(),
                reason: e.to_string(),
            })
    }

    /// Network (base) address with host bits cleared
    pub fn base(&self) -> IpAddr {
        self.net.network()
    }

    /// Prefix length
    pub fn prefix_len(&self) -> u8 {
        self.net.prefix_len()
    }

    /// Whether `addr` falls inside this range
    pub fn contains(&self, addr: &IpAddr) -> bool {
        self.net.contains(addr)
    }

    /// Whether the two ranges share any address
    ///
    /// Two prefixes overlap iff one's base address lies inside the other, so
    /// ranges of different sizes are caught regardless of argument order.
    /// Ranges of different address families never overlap.
    pub fn overlaps(&self, other: &NetworkRange) -> bool {
        self.contains(&other.base()) || other.contains(&self.base())
    }
}

impl FromStr for NetworkRange {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for NetworkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.net, f)
    }
}
