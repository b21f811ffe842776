//! Admission errors
//!
//! An error means the request could not be evaluated. A request that was
//! evaluated and refused is an [`AdmissionDecision`](crate::AdmissionDecision)
//! with `allowed: false`, never an error.

use admission_policy::PolicyError;
use cluster_store::StoreError;
use thiserror::Error;

/// Errors that can occur while admitting a resource
#[derive(Debug, Error)]
pub enum AdmissionError {
    /// Malformed CIDR or release version
    #[error("Parse error: {0}")]
    Parse(PolicyError),

    /// Caller violated a precondition
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Submitted resource is missing required identity fields
    #[error("Invalid resource: {0}")]
    InvalidResource(String),

    /// Store could not be reached within the retry budget
    #[error("{operation} unavailable: {source}")]
    Unavailable {
        /// Store operation that failed
        operation: String,
        /// Last store error
        source: StoreError,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Error taxonomy used by callers to pick a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input, never retried
    Parse,
    /// Precondition violated, never retried
    InvalidArgument,
    /// Could not evaluate; the request may succeed later
    Unavailable,
    /// Startup configuration rejected
    Config,
}

impl AdmissionError {
    /// Taxonomy of the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdmissionError::Parse(_) => ErrorKind::Parse,
            AdmissionError::InvalidArgument(_) | AdmissionError::InvalidResource(_) => {
                ErrorKind::InvalidArgument
            }
            AdmissionError::Unavailable { .. } => ErrorKind::Unavailable,
            AdmissionError::InvalidConfig(_) => ErrorKind::Config,
        }
    }

    pub(crate) fn unavailable(operation: &str, source: StoreError) -> Self {
        AdmissionError::Unavailable {
            operation: operation.to_string(),
            source,
        }
    }
}

impl From<PolicyError> for AdmissionError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::InvalidArgument(msg) => AdmissionError::InvalidArgument(msg),
            other => AdmissionError::Parse(other),
        }
    }
}
