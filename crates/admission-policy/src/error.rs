//! Policy errors
//!
//! Every variant is fatal to the single evaluation and never retried.

use thiserror::Error;

/// Errors raised while evaluating a policy
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// Malformed CIDR string
    #[error("Invalid CIDR '{input}': {reason}")]
    InvalidCidr {
        /// The rejected input
        input: String,
        /// Parser message
        reason: String,
    },

    /// Malformed release version string
    #[error("Invalid release version '{input}': {reason}")]
    InvalidVersion {
        /// The rejected input
        input: String,
        /// Parser message
        reason: String,
    },

    /// Caller violated a precondition
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl PolicyError {
    /// Whether the error comes from parsing a CIDR or version string
    pub fn is_parse(&self) -> bool {
        matches!(self, PolicyError::InvalidCidr { .. } | PolicyError::InvalidVersion { .. })
    }
}
