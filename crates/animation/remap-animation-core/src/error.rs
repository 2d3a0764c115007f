//! Error types for keyframe parsing, combination and optimization.

use serde::{Deserialize, Serialize};

/// Error type shared by every animation operation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AnimationError {
    /// Malformed raw keyframe or track array
    #[error("Malformed keyframe {raw}: {reason}")]
    Parse { raw: String, reason: String },

    /// Two value tuples that must agree in length do not
    #[error("Arity mismatch for '{property}': expected {expected} values, got {actual}")]
    ArityMismatch {
        property: String,
        expected: usize,
        actual: usize,
    },

    /// Optimizer settings rejected by validation
    #[error("Invalid optimizer settings: {reason}")]
    InvalidSettings { reason: String },

    /// Point definition redefined with a different value
    #[error("Point definition '{name}' is already defined with a different value")]
    Conflict { name: String },

    /// Reference to a point definition that was never defined
    #[error("Point definition not found: {name}")]
    UnknownPointDefinition { name: String },
}

impl AnimationError {
    pub(crate) fn parse(raw: impl ToString, reason: impl Into<String>) -> Self {
        Self::Parse {
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }

    /// Get error category for logging.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "parse",
            Self::ArityMismatch { .. } => "type",
            Self::InvalidSettings { .. } => "config",
            Self::Conflict { .. } => "conflict",
            Self::UnknownPointDefinition { .. } => "lookup",
        }
    }
}

impl From<serde_json::Error> for AnimationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            raw: String::new(),
            reason: err.to_string(),
        }
    }
}
