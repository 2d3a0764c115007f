//! Error type for the document layer.

use remap_animation_core::{AnimationError, Dialect};

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum MapError {
    /// Keyframe, track or point definition failure
    #[error(transparent)]
    Animation(#[from] AnimationError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Entity has no representation in the requested dialect
    #[error("{entity} cannot be written in dialect {dialect:?}")]
    UnsupportedInDialect {
        entity: &'static str,
        dialect: Dialect,
    },

    /// Required field absent from imported JSON
    #[error("Missing field '{field}' in {entity}")]
    MissingField { entity: String, field: String },

    /// Field present but holding a value this crate does not recognize
    #[error("Invalid value for '{field}' in {entity}: {value}")]
    InvalidField {
        entity: String,
        field: String,
        value: String,
    },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Property that the target entity cannot carry
    #[error("{entity} does not support property '{property}'")]
    UnsupportedProperty { entity: &'static str, property: String },
}

impl MapError {
    pub(crate) fn missing(entity: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            entity: entity.into(),
            field: field.into(),
        }
    }

    /// Get error category for logging.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Animation(e) => e.category(),
            Self::Json(_) => "parse",
            Self::UnsupportedInDialect { .. } => "dialect",
            Self::MissingField { .. } | Self::InvalidField { .. } => "parse",
            Self::InvalidConfig { .. } => "config",
            Self::UnsupportedProperty { .. } => "type",
        }
    }
}
