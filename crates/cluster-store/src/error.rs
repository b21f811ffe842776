//! Store errors

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when reading or writing resources
#[derive(Debug, Error)]
pub enum StoreError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// A single attempt ran past its time budget
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        /// Operation name, for logs
        operation: String,
        /// Time budget that elapsed
        after: Duration,
    },

    /// Store could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether the error means the resource does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            StoreError::NotFound(_) => true,
            StoreError::Kube(kube::Error::Api(e)) => e.code == 404,
            _ => false,
        }
    }

    /// Whether retrying the call may succeed
    ///
    /// API server errors, rate limiting, transport failures, timeouts and
    /// unavailability are transient. Not-found and other API statuses are
    /// permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Kube(e) => {
                matches!(e, kube::Error::Api(api_err) if api_err.code >= 500 || api_err.code == 429)
                    || matches!(e, kube::Error::Service(_))
            }
            StoreError::Timeout { .. } | StoreError::Unavailable(_) => true,
            StoreError::NotFound(_) => false,
        }
    }
}
