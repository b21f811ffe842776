//! Admission decisions and JSON patches
//!
//! Patch paths are JSON pointers built from tokens, so label keys such as
//! `dcops.microscaler.io/cluster` are escaped (`~1`) rather than split.

use json_patch::{AddOperation, Patch, PatchOperation, ReplaceOperation};
use jsonptr::PointerBuf;
use serde_json::Value;

/// Outcome of admitting one resource
#[derive(Debug, Clone, PartialEq)]
pub struct AdmissionDecision {
    /// Whether the request is admitted
    pub allowed: bool,
    /// Reason code for denial (e.g., "cidr-conflict")
    pub reason: Option<String>,
    /// Detailed message for denial
    pub message: Option<String>,
    /// Defaults to apply before persistence
    pub patches: Vec<PatchOperation>,
}

impl AdmissionDecision {
    /// Create an allowed decision with no patches
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
            message: None,
            patches: Vec::new(),
        }
    }

    /// Create a denied decision
    pub fn denied(reason: &str, message: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.to_string()),
            message: Some(message.into()),
            patches: Vec::new(),
        }
    }

    /// Create an allowed decision carrying patches
    pub fn with_patches(patches: Vec<PatchOperation>) -> Self {
        Self {
            patches,
            ..Self::allowed()
        }
    }

    /// Patches as an RFC 6902 document
    pub fn patch(&self) -> Patch {
        Patch(self.patches.clone())
    }
}

/// Build a JSON pointer from unescaped tokens
pub fn pointer<'t>(tokens: impl IntoIterator<Item = &'t str>) -> PointerBuf {
    PointerBuf::from_tokens(tokens)
}

/// `add` operation at `path`
pub fn add<'t>(path: impl IntoIterator<Item = &'t str>, value: Value) -> PatchOperation {
    PatchOperation::Add(AddOperation {
        path: pointer(path),
        value,
    })
}

/// `replace` operation at `path`
pub fn replace<'t>(path: impl IntoIterator<Item = &'t str>, value: Value) -> PatchOperation {
    PatchOperation::Replace(ReplaceOperation {
        path: pointer(path),
        value,
    })
}

/// Set an unset field: `add` when absent, `replace` when present but empty
pub fn set<'t>(
    present: bool,
    path: impl IntoIterator<Item = &'t str>,
    value: Value,
) -> PatchOperation {
    if present {
        replace(path, value)
    } else {
        add(path, value)
    }
}
