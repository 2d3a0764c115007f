//! Keyframe model and its flat array encoding.
//!
//! A keyframe is written as `[v1, ..., vN, time, ...modifiers]`: a numeric
//! prefix holding the value tuple followed by the time, then string tokens.
//! Tokens starting with `ease` are easings, tokens starting with `spline`
//! are splines and anything else is passed through as a flag (`lerpHSV`).

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::easing::{Ease, Spline};
use crate::error::AnimationError;
use crate::json::number;
use crate::Result;

/// Trailing string token of a keyframe, kept in authoring order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Modifier {
    Ease(Ease),
    Spline(Spline),
    Flag(String),
}

impl Modifier {
    fn parse(token: &str) -> std::result::Result<Self, String> {
        if token.starts_with("ease") {
            Ease::from_name(token)
                .map(Modifier::Ease)
                .ok_or_else(|| format!("unknown easing '{token}'"))
        } else if token.starts_with("spline") {
            Spline::from_name(token)
                .map(Modifier::Spline)
                .ok_or_else(|| format!("unknown spline '{token}'"))
        } else {
            Ok(Modifier::Flag(token.to_string()))
        }
    }

    pub fn token(&self) -> &str {
        match self {
            Modifier::Ease(e) => e.name(),
            Modifier::Spline(s) => s.name(),
            Modifier::Flag(f) => f,
        }
    }
}

/// One timestamped value sample of an animated property.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "JsonValue", into = "JsonValue")]
pub struct Keyframe {
    values: Vec<f64>,
    time: f64,
    modifiers: Vec<Modifier>,
}

impl Keyframe {
    pub fn new(values: impl Into<Vec<f64>>, time: f64) -> Self {
        Self {
            values: values.into(),
            time,
            modifiers: Vec::new(),
        }
    }

    /// Parse a keyframe whose numeric prefix ends with the time.
    ///
    /// Fails when the array has fewer than two elements, when fewer than two
    /// numbers are present (the time is missing or not numeric), when a
    /// number follows a modifier, or when an element is neither a number nor
    /// a string.
    pub fn parse(raw: &[JsonValue]) -> Result<Self> {
        if raw.len() < 2 {
            return Err(AnimationError::parse(
                repr(raw),
                "expected at least one value and a time",
            ));
        }
        let (mut nums, modifiers) = split_raw(raw)?;
        if nums.len() < 2 {
            return Err(AnimationError::parse(repr(raw), "time is not numeric"));
        }
        let time = nums.pop().unwrap_or_default();
        Ok(Self {
            values: nums,
            time,
            modifiers,
        })
    }

    /// Parse a keyframe for a property of known arity. `arity` numbers mean
    /// a value with implicit time 0; `arity + 1` numbers carry an explicit time.
    pub fn parse_with_arity(raw: &[JsonValue], arity: usize) -> Result<Self> {
        let (mut nums, modifiers) = split_raw(raw)?;
        let time = if arity > 0 && nums.len() == arity {
            0.0
        } else if nums.len() == arity + 1 {
            nums.pop().unwrap_or_default()
        } else {
            return Err(AnimationError::parse(
                repr(raw),
                format!(
                    "expected {} or {} numbers, found {}",
                    arity,
                    arity + 1,
                    nums.len()
                ),
            ));
        };
        Ok(Self {
            values: nums,
            time,
            modifiers,
        })
    }

    /// Parse from a JSON value that must be an array.
    pub fn from_json(raw: &JsonValue) -> Result<Self> {
        match raw {
            JsonValue::Array(items) => Self::parse(items),
            other => Err(AnimationError::parse(other, "keyframe must be an array")),
        }
    }

    /// Flat array encoding: values, time, then modifiers in authoring order.
    ///
    /// Numbers are written through [`crate::json::number`], so a parsed
    /// `1.0` comes back as `1`. Round trips are equal numerically, not as
    /// JSON tokens.
    pub fn to_json(&self) -> JsonValue {
        let mut out: Vec<JsonValue> =
            Vec::with_capacity(self.values.len() + 1 + self.modifiers.len());
        out.extend(self.values.iter().copied().map(number));
        out.push(number(self.time));
        out.extend(
            self.modifiers
                .iter()
                .map(|m| JsonValue::String(m.token().to_string())),
        );
        JsonValue::Array(out)
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Number of components in the value tuple.
    #[inline]
    pub fn arity(&self) -> usize {
        self.values.len()
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn easing(&self) -> Option<Ease> {
        self.modifiers.iter().find_map(|m| match m {
            Modifier::Ease(e) => Some(*e),
            _ => None,
        })
    }

    pub fn spline(&self) -> Option<Spline> {
        self.modifiers.iter().find_map(|m| match m {
            Modifier::Spline(s) => Some(*s),
            _ => None,
        })
    }

    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.modifiers.iter().filter_map(|m| match m {
            Modifier::Flag(f) => Some(f.as_str()),
            _ => None,
        })
    }

    pub fn has_flags(&self) -> bool {
        self.flags().next().is_some()
    }

    pub fn set_values(&mut self, values: impl Into<Vec<f64>>) {
        self.values = values.into();
    }

    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    /// Replace the easing in place, or append it when absent. `None` removes it.
    pub fn set_easing(&mut self, easing: Option<Ease>) {
        let slot = self
            .modifiers
            .iter()
            .position(|m| matches!(m, Modifier::Ease(_)));
        match (slot, easing) {
            (Some(i), Some(e)) => self.modifiers[i] = Modifier::Ease(e),
            (Some(i), None) => {
                self.modifiers.remove(i);
            }
            (None, Some(e)) => self.modifiers.push(Modifier::Ease(e)),
            (None, None) => {}
        }
    }

    pub fn set_spline(&mut self, spline: Option<Spline>) {
        let slot = self
            .modifiers
            .iter()
            .position(|m| matches!(m, Modifier::Spline(_)));
        match (slot, spline) {
            (Some(i), Some(s)) => self.modifiers[i] = Modifier::Spline(s),
            (Some(i), None) => {
                self.modifiers.remove(i);
            }
            (None, Some(s)) => self.modifiers.push(Modifier::Spline(s)),
            (None, None) => {}
        }
    }

    pub fn push_flag(&mut self, flag: impl Into<String>) {
        self.modifiers.push(Modifier::Flag(flag.into()));
    }

    pub fn with_easing(mut self, easing: Ease) -> Self {
        self.set_easing(Some(easing));
        self
    }

    pub fn with_spline(mut self, spline: Spline) -> Self {
        self.set_spline(Some(spline));
        self
    }
}

fn repr(raw: &[JsonValue]) -> String {
    JsonValue::Array(raw.to_vec()).to_string()
}

/// Split a raw keyframe into its numeric prefix and its modifier tokens.
fn split_raw(raw: &[JsonValue]) -> Result<(Vec<f64>, Vec<Modifier>)> {
    let mut nums = Vec::with_capacity(raw.len());
    let mut modifiers = Vec::new();
    for item in raw {
        match item {
            JsonValue::Number(n) => {
                if !modifiers.is_empty() {
                    return Err(AnimationError::parse(
                        repr(raw),
                        "numeric value after a modifier",
                    ));
                }
                let v = n
                    .as_f64()
                    .ok_or_else(|| AnimationError::parse(repr(raw), "number out of range"))?;
                nums.push(v);
            }
            JsonValue::String(s) => {
                let m = Modifier::parse(s)
                    .map_err(|reason| AnimationError::parse(repr(raw), reason))?;
                modifiers.push(m);
            }
            other => {
                return Err(AnimationError::parse(
                    repr(raw),
                    format!("unexpected element {other}"),
                ))
            }
        }
    }
    Ok((nums, modifiers))
}

impl TryFrom<JsonValue> for Keyframe {
    type Error = AnimationError;

    fn try_from(value: JsonValue) -> Result<Self> {
        Self::from_json(&value)
    }
}

impl From<Keyframe> for JsonValue {
    fn from(value: Keyframe) -> Self {
        value.to_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn arr(v: JsonValue) -> Vec<JsonValue> {
        v.as_array().cloned().unwrap()
    }

    #[test]
    fn parses_values_time_and_modifiers() {
        let raw = arr(json!([1, 2, 3, 0.5, "easeInQuad", "splineCatmullRom", "lerpHSV"]));
        let kf = Keyframe::parse(&raw).unwrap();
        assert_eq!(kf.values(), &[1.0, 2.0, 3.0]);
        assert_eq!(kf.time(), 0.5);
        assert_eq!(kf.easing(), Some(Ease::InQuad));
        assert_eq!(kf.spline(), Some(Spline::CatmullRom));
        assert_eq!(kf.flags().collect::<Vec<_>>(), vec!["lerpHSV"]);
    }

    #[test]
    fn rejects_short_and_non_numeric_time() {
        assert!(matches!(
            Keyframe::parse(&arr(json!([1]))),
            Err(AnimationError::Parse { .. })
        ));
        assert!(matches!(
            Keyframe::parse(&arr(json!([1, "easeInQuad"]))),
            Err(AnimationError::Parse { .. })
        ));
        assert!(Keyframe::parse(&arr(json!([1, "easeInQuad", 2]))).is_err());
        assert!(Keyframe::parse(&arr(json!([1, null]))).is_err());
        assert!(Keyframe::parse(&arr(json!([1, 0, "easeWobbly"]))).is_err());
    }

    #[test]
    fn arity_aware_parse_allows_implicit_time() {
        let kf = Keyframe::parse_with_arity(&arr(json!([0, 0, 0])), 3).unwrap();
        assert_eq!(kf.values(), &[0.0, 0.0, 0.0]);
        assert_eq!(kf.time(), 0.0);

        let kf = Keyframe::parse_with_arity(&arr(json!([1, 1, 1, 1])), 3).unwrap();
        assert_eq!(kf.time(), 1.0);

        assert!(Keyframe::parse_with_arity(&arr(json!([1, 1])), 3).is_err());
    }

    #[test]
    fn integral_floats_write_back_as_integers() {
        let raw = json!([1.0, 2.5, 1.0]);
        let out = Keyframe::from_json(&raw).unwrap().to_json();
        assert_eq!(out, json!([1, 2.5, 1]));
        let as_f64 = |v: &JsonValue| -> Vec<f64> {
            v.as_array().unwrap().iter().map(|n| n.as_f64().unwrap()).collect()
        };
        assert_eq!(as_f64(&out), as_f64(&raw));
    }

    #[test]
    fn setters_preserve_modifier_order() {
        let mut kf = Keyframe::parse(&arr(json!([0, 1, "lerpHSV", "easeInSine"]))).unwrap();
        kf.set_easing(Some(Ease::OutSine));
        assert_eq!(kf.to_json(), json!([0, 1, "lerpHSV", "easeOutSine"]));
        kf.set_easing(None);
        kf.set_spline(Some(Spline::CatmullRom));
        assert_eq!(kf.to_json(), json!([0, 1, "lerpHSV", "splineCatmullRom"]));
    }

    #[test]
    fn serde_uses_flat_encoding() {
        let kf = Keyframe::new(vec![1.0, 0.25], 2.0).with_easing(Ease::Step);
        let v = serde_json::to_value(&kf).unwrap();
        assert_eq!(v, json!([1, 0.25, 2, "easeStep"]));
        let back: Keyframe = serde_json::from_value(v).unwrap();
        assert_eq!(back, kf);
    }
}
