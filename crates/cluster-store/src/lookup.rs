//! Found/absent lookups
//!
//! Linked resources are created in no guaranteed order, so a missing one is
//! an expected state with a fallback default rather than a failure.

use crate::error::StoreError;

/// Outcome of a lookup whose absence is handled by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// The resource exists
    Found(T),
    /// The resource does not exist (yet)
    Absent,
}

impl<T> Lookup<T> {
    /// Convert into an `Option`
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Absent => None,
        }
    }

    /// Whether the resource was absent
    pub fn is_absent(&self) -> bool {
        matches!(self, Lookup::Absent)
    }
}

/// Split a store result into found, absent, or error
///
/// Not-found becomes [`Lookup::Absent`]; every other error is returned.
pub fn lookup<T>(result: Result<T, StoreError>) -> Result<Lookup<T>, StoreError> {
    match result {
        Ok(value) => Ok(Lookup::Found(value)),
        Err(e) if e.is_not_found() => Ok(Lookup::Absent),
        Err(e) => Err(e),
    }
}
