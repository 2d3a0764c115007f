//! Authoring session configuration.

use remap_animation_core::{Dialect, OptimizeSettings};
use serde::{Deserialize, Serialize};

use crate::error::MapError;
use crate::Result;

/// Decimal places beyond what an `f64` can represent meaningfully.
const MAX_DECIMAL_PRECISION: u32 = 15;

/// Output settings for one [`crate::Difficulty`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    /// Wire dialect used by `Difficulty::to_json`.
    pub dialect: Dialect,
    /// Round every written float to this many decimals.
    pub decimal_precision: Option<u32>,
    /// Prefix for generated environment track names.
    pub env_track_prefix: String,
    /// Decimate animated properties on write.
    pub optimize: Option<OptimizeSettings>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::V3,
            decimal_precision: None,
            env_track_prefix: "environment_".to_string(),
            optimize: None,
        }
    }
}

impl SessionConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.env_track_prefix.is_empty() {
            return Err(MapError::InvalidConfig {
                reason: "env_track_prefix must not be empty".into(),
            });
        }
        if let Some(p) = self.decimal_precision.filter(|p| *p > MAX_DECIMAL_PRECISION) {
            return Err(MapError::InvalidConfig {
                reason: format!("decimal_precision {p} exceeds {MAX_DECIMAL_PRECISION}"),
            });
        }
        if let Some(settings) = &self.optimize {
            settings.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = SessionConfig::default();
        assert_eq!(c.dialect, Dialect::V3);
        assert_eq!(c.env_track_prefix, "environment_");
        assert!(c.decimal_precision.is_none());
        assert!(c.optimize.is_none());
    }

    #[test]
    fn parses_partial_json() {
        let c = SessionConfig::from_json_str(
            r#"{"dialect":"v2","decimalPrecision":3,"optimize":{"tolerances":[0.1]}}"#,
        )
        .unwrap();
        assert_eq!(c.dialect, Dialect::V2);
        assert_eq!(c.decimal_precision, Some(3));
        assert_eq!(c.optimize, Some(OptimizeSettings::uniform(0.1)));
        assert_eq!(c.env_track_prefix, "environment_");
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(SessionConfig::from_json_str(r#"{"envTrackPrefix":""}"#).is_err());
        assert!(SessionConfig::from_json_str(r#"{"decimalPrecision":40}"#).is_err());
        let err =
            SessionConfig::from_json_str(r#"{"optimize":{"tolerances":[-1]}}"#).unwrap_err();
        assert_eq!(err.category(), "config");
    }
}
