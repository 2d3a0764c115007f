//! Point definition registry: named, reusable property values that are
//! serialized alongside the authored output and resolved by the renderer.

use indexmap::IndexMap;
use serde_json::{json, Map, Value as JsonValue};

use crate::error::AnimationError;
use crate::json::Dialect;
use crate::property::AnimatedProperty;
use crate::Result;

/// Insertion-ordered `name -> value` table owned by one authoring session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointDefinitions {
    inner: IndexMap<String, AnimatedProperty>,
}

impl PointDefinitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `value` under `name` and return the name.
    ///
    /// Redefining a name with an identical value is a no-op; a different
    /// value fails with [`AnimationError::Conflict`]. A `Named` value copies
    /// the definition it refers to.
    pub fn define(
        &mut self,
        value: impl Into<AnimatedProperty>,
        name: impl Into<String>,
    ) -> Result<String> {
        let name = name.into();
        let value = match value.into() {
            AnimatedProperty::Named(other) => self.resolve(&other)?.clone(),
            v => v,
        };
        match self.inner.get(&name) {
            Some(existing) if *existing == value => {
                log::trace!("point definition '{name}' redefined with identical value");
            }
            Some(_) => return Err(AnimationError::Conflict { name }),
            None => {
                log::debug!("defining point definition '{name}'");
                self.inner.insert(name.clone(), value);
            }
        }
        Ok(name)
    }

    pub fn resolve(&self, name: &str) -> Result<&AnimatedProperty> {
        self.inner
            .get(name)
            .ok_or_else(|| AnimationError::UnknownPointDefinition {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnimatedProperty)> {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// v3: `{ name: points }`; v2: `[{ "_name": name, "_points": points }]`.
    pub fn to_json(&self, dialect: Dialect) -> JsonValue {
        match dialect {
            Dialect::V3 => {
                let map: Map<String, JsonValue> = self
                    .inner
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect();
                JsonValue::Object(map)
            }
            Dialect::V2 => JsonValue::Array(
                self.inner
                    .iter()
                    .map(|(k, v)| json!({ "_name": k, "_points": v.to_json() }))
                    .collect(),
            ),
        }
    }

    /// Read a serialized table in either dialect's shape.
    pub fn from_json(raw: &JsonValue) -> Result<Self> {
        let mut defs = Self::new();
        match raw {
            JsonValue::Object(map) => {
                for (name, points) in map {
                    defs.define(AnimatedProperty::from_json(points, None)?, name.clone())?;
                }
            }
            JsonValue::Array(entries) => {
                for entry in entries {
                    let name = entry
                        .get("_name")
                        .and_then(JsonValue::as_str)
                        .ok_or_else(|| AnimationError::parse(entry, "missing _name"))?;
                    let points = entry
                        .get("_points")
                        .ok_or_else(|| AnimationError::parse(entry, "missing _points"))?;
                    defs.define(AnimatedProperty::from_json(points, None)?, name)?;
                }
            }
            other => {
                return Err(AnimationError::parse(
                    other,
                    "point definitions must be an object or an array",
                ))
            }
        }
        Ok(defs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_is_idempotent_for_identical_values() {
        let mut defs = PointDefinitions::new();
        assert_eq!(defs.define(5.0, "x").unwrap(), "x");
        assert_eq!(defs.define(5.0, "x").unwrap(), "x");
        assert_eq!(defs.len(), 1);
    }

    #[test]
    fn define_conflicts_on_different_value() {
        let mut defs = PointDefinitions::new();
        defs.define(5.0, "x").unwrap();
        let err = defs.define(6.0, "x").unwrap_err();
        assert_eq!(err, AnimationError::Conflict { name: "x".into() });
        assert_eq!(
            defs.resolve("x").unwrap(),
            &AnimatedProperty::Static(vec![5.0])
        );
    }

    #[test]
    fn named_values_copy_their_target() {
        let mut defs = PointDefinitions::new();
        defs.define([1.0, 2.0, 3.0], "a").unwrap();
        defs.define("a", "b").unwrap();
        assert_eq!(defs.resolve("b").unwrap(), defs.resolve("a").unwrap());
        assert!(matches!(
            defs.define("missing", "c"),
            Err(AnimationError::UnknownPointDefinition { .. })
        ));
    }
}
