//! Status conditions
//!
//! Lifecycle markers reported by the operators that reconcile tenant clusters.
//! The admission policies only read them: a `Creating` or `Updating` condition
//! with status `True` means the cluster is mid-transition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Condition type set while a cluster is first being created
pub const CONDITION_CREATING: &str = "Creating";

/// Condition type set while a cluster is being upgraded
pub const CONDITION_UPDATING: &str = "Updating";

/// Status value of an active condition
pub const CONDITION_STATUS_TRUE: &str = "True";

/// A single status condition
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Condition type (e.g., "Creating", "Updating")
    #[serde(rename = "type")]
    pub condition_type: String,

    /// "True", "False" or "Unknown"
    pub status: String,

    /// Last time the condition changed status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<chrono::DateTime<chrono::Utc>>,

    /// Machine-readable reason for the last transition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Human-readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Condition {
    /// Create an active condition of the given type
    pub fn active(condition_type: &str) -> Self {
        Self {
            condition_type: condition_type.to_string(),
            status: CONDITION_STATUS_TRUE.to_string(),
            ..Default::default()
        }
    }

    /// Whether the condition status is `True`
    pub fn is_true(&self) -> bool {
        self.status == CONDITION_STATUS_TRUE
    }
}

/// Whether the conditions signal a creation or upgrade that is still underway
pub fn is_transitioning(conditions: &[Condition]) -> bool {
    conditions.iter().any(|c| {
        c.is_true()
            && (c.condition_type == CONDITION_CREATING || c.condition_type == CONDITION_UPDATING)
    })
}
