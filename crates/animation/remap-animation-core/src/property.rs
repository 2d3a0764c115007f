//! Animated property channels and their "value or track" payload.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::AnimationError;
use crate::json::numbers;
use crate::point_definitions::PointDefinitions;
use crate::track::Track;
use crate::Result;

/// Named animation channel. Known channels carry a fixed value arity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    Position,
    LocalPosition,
    DefinitePosition,
    Rotation,
    LocalRotation,
    Scale,
    Color,
    Dissolve,
    DissolveArrow,
    Interactable,
    Time,
    Other(String),
}

impl Property {
    /// v3 wire name (`"localRotation"`).
    pub fn name(&self) -> &str {
        match self {
            Property::Position => "position",
            Property::LocalPosition => "localPosition",
            Property::DefinitePosition => "definitePosition",
            Property::Rotation => "rotation",
            Property::LocalRotation => "localRotation",
            Property::Scale => "scale",
            Property::Color => "color",
            Property::Dissolve => "dissolve",
            Property::DissolveArrow => "dissolveArrow",
            Property::Interactable => "interactable",
            Property::Time => "time",
            Property::Other(name) => name,
        }
    }

    /// Parse a wire name in either dialect (`"_position"` or `"position"`).
    pub fn from_name(name: &str) -> Self {
        let bare = name.strip_prefix('_').unwrap_or(name);
        match bare {
            "position" => Property::Position,
            "localPosition" => Property::LocalPosition,
            "definitePosition" => Property::DefinitePosition,
            "rotation" => Property::Rotation,
            "localRotation" => Property::LocalRotation,
            "scale" => Property::Scale,
            "color" => Property::Color,
            "dissolve" => Property::Dissolve,
            "dissolveArrow" => Property::DissolveArrow,
            "interactable" => Property::Interactable,
            "time" => Property::Time,
            other => Property::Other(other.to_string()),
        }
    }

    /// Value arity for known channels.
    pub fn arity(&self) -> Option<usize> {
        match self {
            Property::Position
            | Property::LocalPosition
            | Property::DefinitePosition
            | Property::Rotation
            | Property::LocalRotation
            | Property::Scale => Some(3),
            Property::Color => Some(4),
            Property::Dissolve
            | Property::DissolveArrow
            | Property::Interactable
            | Property::Time => Some(1),
            Property::Other(_) => None,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload of an animated property: a single static value, a keyframe
/// track, or the name of a point definition resolved by the renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "JsonValue", into = "JsonValue")]
pub enum AnimatedProperty {
    Static(Vec<f64>),
    Animated(Track),
    Named(String),
}

impl AnimatedProperty {
    /// Parse a raw property value: a string names a point definition, a
    /// flat numeric array is a static value, anything else is a track.
    pub fn from_json(raw: &JsonValue, arity: Option<usize>) -> Result<Self> {
        match raw {
            JsonValue::String(name) => Ok(AnimatedProperty::Named(name.clone())),
            JsonValue::Number(n) => {
                let v = n
                    .as_f64()
                    .ok_or_else(|| AnimationError::parse(raw, "number out of range"))?;
                Ok(AnimatedProperty::Static(vec![v]))
            }
            JsonValue::Array(items)
                if !items.is_empty() && items.iter().all(JsonValue::is_number) =>
            {
                let values: Vec<f64> = items.iter().filter_map(JsonValue::as_f64).collect();
                match arity {
                    Some(n) if values.len() == n + 1 => {
                        Ok(AnimatedProperty::Animated(Track::from_raw_with_arity(raw, arity)?))
                    }
                    Some(n) if values.len() != n => Err(AnimationError::ArityMismatch {
                        property: "value".into(),
                        expected: n,
                        actual: values.len(),
                    }),
                    _ => Ok(AnimatedProperty::Static(values)),
                }
            }
            JsonValue::Array(_) => Ok(AnimatedProperty::Animated(Track::from_raw_with_arity(
                raw, arity,
            )?)),
            other => Err(AnimationError::parse(
                other,
                "property must be a value, a keyframe array or a point definition name",
            )),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            AnimatedProperty::Static(values) => numbers(values),
            AnimatedProperty::Animated(track) => track.to_json(),
            AnimatedProperty::Named(name) => JsonValue::String(name.clone()),
        }
    }

    /// Number of values per sample, `None` for names and empty tracks.
    pub fn arity(&self) -> Option<usize> {
        match self {
            AnimatedProperty::Static(values) => Some(values.len()),
            AnimatedProperty::Animated(track) => track.arity(),
            AnimatedProperty::Named(_) => None,
        }
    }

    /// Number of keyframes once expressed as a track (static values count 1).
    pub fn point_count(&self) -> usize {
        match self {
            AnimatedProperty::Static(_) => 1,
            AnimatedProperty::Animated(track) => track.len(),
            AnimatedProperty::Named(_) => 0,
        }
    }

    /// Express as a track; static values become one keyframe at time 0.
    /// Names have no track until resolved.
    pub fn to_track(&self) -> Option<Track> {
        match self {
            AnimatedProperty::Static(values) => Some(Track::from_static(values.clone())),
            AnimatedProperty::Animated(track) => Some(track.clone()),
            AnimatedProperty::Named(_) => None,
        }
    }

    /// Replace a point definition reference by the value it names.
    pub fn resolve(&self, definitions: &PointDefinitions) -> Result<AnimatedProperty> {
        match self {
            AnimatedProperty::Named(name) => definitions.resolve(name).cloned(),
            other => Ok(other.clone()),
        }
    }
}

impl From<f64> for AnimatedProperty {
    fn from(value: f64) -> Self {
        AnimatedProperty::Static(vec![value])
    }
}

impl From<Vec<f64>> for AnimatedProperty {
    fn from(value: Vec<f64>) -> Self {
        AnimatedProperty::Static(value)
    }
}

impl<const N: usize> From<[f64; N]> for AnimatedProperty {
    fn from(value: [f64; N]) -> Self {
        AnimatedProperty::Static(value.to_vec())
    }
}

impl From<Track> for AnimatedProperty {
    fn from(value: Track) -> Self {
        AnimatedProperty::Animated(value)
    }
}

impl From<&str> for AnimatedProperty {
    fn from(value: &str) -> Self {
        AnimatedProperty::Named(value.to_string())
    }
}

impl TryFrom<JsonValue> for AnimatedProperty {
    type Error = AnimationError;

    fn try_from(value: JsonValue) -> Result<Self> {
        Self::from_json(&value, None)
    }
}

impl From<AnimatedProperty> for JsonValue {
    fn from(value: AnimatedProperty) -> Self {
        value.to_json()
    }
}
