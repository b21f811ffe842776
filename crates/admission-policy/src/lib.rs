//! Admission Policy
//!
//! The decision logic shared by every admission handler, free of I/O:
//!
//! - **CIDR model and conflict search** ([`cidr`], [`conflict`]): does a
//!   candidate range overlap a range claimed by another network or reserved
//!   by the platform?
//! - **Release upgrade policy** ([`release`]): is a transition between two
//!   releases permitted given the installable catalog and the resource's
//!   lifecycle state?
//! - **Availability-zone allocator** ([`zones`]): which zones should a one- or
//!   three-master control plane use, optionally preserving an existing zone?
//!
//! Callers fetch the data (claimed ranges, release catalog, candidate zones)
//! and hand it in; every function here is synchronous and deterministic
//! given its inputs, including the random source for zone selection.
//!
//! # Example
//!
//! ```
//! use admission_policy::{NetworkRange, ReleaseCatalog, ReleaseVersion, evaluate};
//!
//! let a = NetworkRange::parse("10.0.0.0/8").unwrap();
//! let b = NetworkRange::parse("10.0.16.0/16").unwrap();
//! assert!(a.overlaps(&b));
//!
//! let catalog = ReleaseCatalog::parse_names(["v11.3.0", "v11.4.0"]).unwrap();
//! let old = ReleaseVersion::parse("11.3.0").unwrap();
//! let new = ReleaseVersion::parse("11.4.0").unwrap();
//! assert!(evaluate(old, new, false, &catalog).allowed);
//! ```

pub mod cidr;
pub mod conflict;
pub mod error;
pub mod release;
pub mod zones;

pub use cidr::NetworkRange;
pub use conflict::{ClaimedRange, ReservedRanges, ResourceIdentity, find_conflict};
pub use error::PolicyError;
pub use release::{ReleaseCatalog, ReleaseVersion, UpgradeDecision, UpgradeReason, evaluate};
pub use zones::{HIGHLY_AVAILABLE, SINGLE, allocate};
