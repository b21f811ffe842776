//! Release model and upgrade policy
//!
//! Releases are identified by dotted versions (`11.3.0`, optionally written
//! `v11.3.0`). Releases sharing major and minor form a *line*. Upgrades may
//! jump freely within a line but must not skip a line.

use crate::error::PolicyError;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A (major, minor, patch) triple, totally ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReleaseVersion {
    /// Major component
    pub major: u64,
    /// Minor component
    pub minor: u64,
    /// Patch component
    pub patch: u64,
}

impl ReleaseVersion {
    /// Create a version from its components
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self { major, minor, patch }
    }

    /// Parse `X.Y.Z`, with or without a leading `v`
    ///
    /// Pre-release and build metadata are accepted but not part of the
    /// ordering.
    pub fn parse(input: &str) -> Result<Self, PolicyError> {
        let trimmed = input.trim();
        let bare = trimmed.strip_prefix('v').unwrap_or(trimmed);
        let version = semver::Version::parse(bare).map_err(|e| PolicyError::InvalidVersion {
            input: input.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(version.major, version.minor, version.patch))
    }

    /// Whether both versions belong to the same release line
    pub fn same_line(&self, other: &ReleaseVersion) -> bool {
        self.major == other.major && self.minor == other.minor
    }
}

impl FromStr for ReleaseVersion {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// The set of releases currently installable
///
/// Used only as a membership and ordering oracle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseCatalog {
    versions: BTreeSet<ReleaseVersion>,
}

impl ReleaseCatalog {
    /// Parse release names (e.g., `v11.3.0`) into a catalog
    ///
    /// A single malformed name fails the whole catalog.
    pub fn parse_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<Self, PolicyError> {
        names
            .into_iter()
            .map(ReleaseVersion::parse)
            .collect::<Result<BTreeSet<_>, _>>()
            .map(|versions| Self { versions })
    }

    /// Whether the release is installable
    pub fn contains(&self, version: &ReleaseVersion) -> bool {
        self.versions.contains(version)
    }

    /// Number of releases in the catalog
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Releases in ascending order
    pub fn iter(&self) -> impl Iterator<Item = &ReleaseVersion> {
        self.versions.iter()
    }
}

impl FromIterator<ReleaseVersion> for ReleaseCatalog {
    fn from_iter<T: IntoIterator<Item = ReleaseVersion>>(iter: T) -> Self {
        Self {
            versions: iter.into_iter().collect(),
        }
    }
}

/// Why a transition was allowed or denied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeReason {
    /// Transition permitted
    Ok,
    /// Target release is not in the catalog
    TargetNotInstalled,
    /// Target release is older than the current one
    Downgrade,
    /// A creation or upgrade is already underway
    UpgradeInProgress,
    /// The transition skips the line of the carried release
    ReleaseSkipped(ReleaseVersion),
}

impl UpgradeReason {
    /// Stable reason code
    pub fn code(&self) -> &'static str {
        match self {
            UpgradeReason::Ok => "ok",
            UpgradeReason::TargetNotInstalled => "target-not-installed",
            UpgradeReason::Downgrade => "downgrade",
            UpgradeReason::UpgradeInProgress => "upgrade-in-progress",
            UpgradeReason::ReleaseSkipped(_) => "release-skipped",
        }
    }
}

/// Outcome of [`evaluate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpgradeDecision {
    /// Whether the transition is permitted
    pub allowed: bool,
    /// Reason code, `Ok` when allowed
    pub reason: UpgradeReason,
}

impl UpgradeDecision {
    fn allow() -> Self {
        Self {
            allowed: true,
            reason: UpgradeReason::Ok,
        }
    }

    fn deny(reason: UpgradeReason) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }
}

/// Decide whether `old` may transition to `new`
///
/// Rules, in order:
/// 1. `old == new` is always allowed.
/// 2. Any change while `upgrading` is denied (checked before the catalog).
/// 3. `new` must be in `catalog`; `old` need not be.
/// 4. Downgrades are denied.
/// 5. On a line change, any catalog release strictly between `old` and `new`
///    whose line differs from `old`'s is a skipped release.
pub fn evaluate(
    old: ReleaseVersion,
    new: ReleaseVersion,
    upgrading: bool,
    catalog: &ReleaseCatalog,
) -> UpgradeDecision {
    if old == new {
        return UpgradeDecision::allow();
    }

    if upgrading {
        return UpgradeDecision::deny(UpgradeReason::UpgradeInProgress);
    }

    if !catalog.contains(&new) {
        return UpgradeDecision::deny(UpgradeReason::TargetNotInstalled);
    }

    if new < old {
        return UpgradeDecision::deny(UpgradeReason::Downgrade);
    }

    if !old.same_line(&new) {
        if let Some(skipped) = catalog
            .iter()
            .find(|r| **r > old && **r < new && !r.same_line(&old))
        {
            return UpgradeDecision::deny(UpgradeReason::ReleaseSkipped(*skipped));
        }
    }

    UpgradeDecision::allow()
}
