//! Admission request context

use std::time::Duration;
use tokio::time::Instant;

/// A create or update request for a resource of kind `K`
#[derive(Debug)]
pub struct AdmissionContext<'a, K> {
    /// The submitted resource
    pub resource: &'a K,
    /// The stored resource (for UPDATE operations)
    pub old_resource: Option<&'a K>,
    /// Deadline for every store call made on behalf of this request
    pub deadline: Option<Instant>,
}

impl<'a, K> AdmissionContext<'a, K> {
    /// Context for a CREATE operation
    pub fn create(resource: &'a K) -> Self {
        Self {
            resource,
            old_resource: None,
            deadline: None,
        }
    }

    /// Context for an UPDATE operation
    pub fn update(resource: &'a K, old_resource: &'a K) -> Self {
        Self {
            resource,
            old_resource: Some(old_resource),
            deadline: None,
        }
    }

    /// Bound store calls by `timeout` from now
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// Check if this is an UPDATE operation
    pub fn is_update(&self) -> bool {
        self.old_resource.is_some()
    }
}
