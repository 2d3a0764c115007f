//! Optimizer configuration.

use serde::{Deserialize, Serialize};

use crate::error::AnimationError;
use crate::Result;

/// Per-axis error tolerances for [`crate::optimize::optimize`].
///
/// `tolerances[i]` bounds the deviation allowed on value axis `i`; the last
/// entry also applies to every higher axis, so a single entry is a uniform
/// tolerance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizeSettings {
    pub tolerances: Vec<f64>,
}

impl Default for OptimizeSettings {
    fn default() -> Self {
        Self {
            tolerances: vec![0.03],
        }
    }
}

impl OptimizeSettings {
    pub fn uniform(tolerance: f64) -> Self {
        Self {
            tolerances: vec![tolerance],
        }
    }

    pub fn per_axis(tolerances: impl Into<Vec<f64>>) -> Self {
        Self {
            tolerances: tolerances.into(),
        }
    }

    /// Reject empty, negative or non-finite tolerances.
    pub fn validate(&self) -> Result<()> {
        if self.tolerances.is_empty() {
            return Err(AnimationError::InvalidSettings {
                reason: "at least one tolerance is required".into(),
            });
        }
        if let Some((axis, t)) = self
            .tolerances
            .iter()
            .enumerate()
            .find(|(_, t)| !t.is_finite() || **t < 0.0)
        {
            return Err(AnimationError::InvalidSettings {
                reason: format!("tolerance for axis {axis} must be finite and >= 0, got {t}"),
            });
        }
        Ok(())
    }

    /// Tolerance for value axis `axis`.
    #[inline]
    pub fn tolerance(&self, axis: usize) -> f64 {
        self.tolerances
            .get(axis)
            .or_else(|| self.tolerances.last())
            .copied()
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_tolerance_repeats() {
        let s = OptimizeSettings::per_axis(vec![0.1, 0.2]);
        assert_eq!(s.tolerance(0), 0.1);
        assert_eq!(s.tolerance(1), 0.2);
        assert_eq!(s.tolerance(5), 0.2);
    }

    #[test]
    fn validation_rejects_bad_values() {
        assert!(OptimizeSettings::default().validate().is_ok());
        assert!(OptimizeSettings::uniform(-0.1).validate().is_err());
        assert!(OptimizeSettings::uniform(f64::NAN).validate().is_err());
        assert!(OptimizeSettings::per_axis(Vec::new()).validate().is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let s: OptimizeSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(s, OptimizeSettings::default());
        let s: OptimizeSettings = serde_json::from_str(r#"{"tolerances":[0,0.5]}"#).unwrap();
        assert_eq!(s.tolerance(1), 0.5);
    }
}
