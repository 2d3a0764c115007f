//! Per-object animation: an insertion-ordered set of animated properties.

use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};

use crate::combine::combine;
use crate::config::OptimizeSettings;
use crate::error::AnimationError;
use crate::json::Dialect;
use crate::optimize::optimize_property;
use crate::property::{AnimatedProperty, Property};
use crate::Result;

/// Animated properties of one object or track event. Output order follows
/// insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Animation {
    properties: IndexMap<Property, AnimatedProperty>,
}

impl Animation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `value` to `property`, replacing any previous value.
    /// Known properties reject values of the wrong arity.
    pub fn set(&mut self, property: Property, value: impl Into<AnimatedProperty>) -> Result<()> {
        let value = value.into();
        check_arity(&property, &value)?;
        self.properties.insert(property, value);
        Ok(())
    }

    /// Builder form of [`Animation::set`].
    pub fn with(mut self, property: Property, value: impl Into<AnimatedProperty>) -> Result<Self> {
        self.set(property, value)?;
        Ok(self)
    }

    pub fn get(&self, property: &Property) -> Option<&AnimatedProperty> {
        self.properties.get(property)
    }

    pub fn remove(&mut self, property: &Property) -> Option<AnimatedProperty> {
        self.properties.shift_remove(property)
    }

    /// Merge `value` after the property's current value (see
    /// [`crate::combine::combine`]); sets it when the property is unset.
    pub fn combine_into(
        &mut self,
        property: Property,
        value: impl Into<AnimatedProperty>,
    ) -> Result<()> {
        let value = value.into();
        let merged = match self.properties.get(&property) {
            Some(existing) => combine(existing, &value, &property)?,
            None => value,
        };
        self.set(property, merged)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Property, &AnimatedProperty)> {
        self.properties.iter()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Copy with every animated property decimated.
    pub fn optimized(&self, settings: &OptimizeSettings) -> Result<Self> {
        let properties = self
            .properties
            .iter()
            .map(|(k, v)| Ok((k.clone(), optimize_property(v, settings)?)))
            .collect::<Result<IndexMap<_, _>>>()?;
        Ok(Self { properties })
    }

    /// `{ "position": [...], ... }` with keys named for `dialect`.
    pub fn to_json(&self, dialect: Dialect) -> JsonValue {
        let map: Map<String, JsonValue> = self
            .properties
            .iter()
            .map(|(k, v)| (dialect.key(k.name()), v.to_json()))
            .collect();
        JsonValue::Object(map)
    }

    /// Read an animation object; keys may carry the v2 underscore prefix.
    pub fn from_json(raw: &JsonValue) -> Result<Self> {
        let map = raw
            .as_object()
            .ok_or_else(|| AnimationError::parse(raw, "animation must be an object"))?;
        let mut animation = Self::new();
        for (key, value) in map {
            let property = Property::from_name(key);
            let parsed = AnimatedProperty::from_json(value, property.arity()).map_err(|e| {
                match e {
                    AnimationError::ArityMismatch {
                        expected, actual, ..
                    } => AnimationError::ArityMismatch {
                        property: property.name().to_string(),
                        expected,
                        actual,
                    },
                    other => other,
                }
            })?;
            animation.set(property, parsed)?;
        }
        Ok(animation)
    }
}

fn check_arity(property: &Property, value: &AnimatedProperty) -> Result<()> {
    match (property.arity(), value.arity()) {
        (Some(expected), Some(actual)) if expected != actual => {
            Err(AnimationError::ArityMismatch {
                property: property.name().to_string(),
                expected,
                actual,
            })
        }
        _ => Ok(()),
    }
}
