//! Small JSON object helpers shared by the entity encoders and importers.

use remap_animation_core::json::{number, numbers};
use remap_animation_core::Dialect;
use serde_json::{Map, Value as JsonValue};

use crate::error::MapError;
use crate::Result;

pub(crate) type Object = Map<String, JsonValue>;

pub(crate) fn put_num(map: &mut Object, key: impl Into<String>, v: f64) {
    map.insert(key.into(), number(v));
}

pub(crate) fn put_opt<T: Into<JsonValue>>(map: &mut Object, key: impl Into<String>, v: Option<T>) {
    if let Some(v) = v {
        map.insert(key.into(), v.into());
    }
}

pub(crate) fn put_opt_num(map: &mut Object, key: impl Into<String>, v: Option<f64>) {
    if let Some(v) = v {
        put_num(map, key, v);
    }
}

pub(crate) fn put_opt_nums(map: &mut Object, key: impl Into<String>, v: Option<&[f64]>) {
    if let Some(v) = v {
        map.insert(key.into(), numbers(v));
    }
}

/// Attach `custom` under the dialect's custom data key, merging `extra`
/// (user supplied, written verbatim) after the typed fields. Nothing is
/// written when both are empty.
pub(crate) fn attach_custom_data(
    map: &mut Object,
    dialect: Dialect,
    mut custom: Object,
    extra: &Object,
) {
    for (k, v) in extra {
        custom.insert(k.clone(), v.clone());
    }
    if !custom.is_empty() {
        map.insert(dialect.custom_data().to_string(), JsonValue::Object(custom));
    }
}

/// Guess the dialect of a document or entity from its keys: any top-level
/// key starting with `_` marks v2.
pub(crate) fn detect_dialect(raw: &JsonValue) -> Dialect {
    match raw.as_object() {
        Some(map) if map.keys().any(|k| k.starts_with('_')) => Dialect::V2,
        _ => Dialect::V3,
    }
}

pub(crate) fn get_i64(raw: &JsonValue, key: &str) -> Option<i64> {
    raw.get(key).and_then(JsonValue::as_i64)
}

pub(crate) fn get_str<'a>(raw: &'a JsonValue, key: &str) -> Option<&'a str> {
    raw.get(key).and_then(JsonValue::as_str)
}

pub(crate) fn get_bool(raw: &JsonValue, key: &str) -> Option<bool> {
    raw.get(key).and_then(JsonValue::as_bool)
}

/// Typed reader over one entity's JSON object. Absent optional fields take
/// their default; present fields of the wrong type are errors.
pub(crate) struct Fields<'a> {
    raw: &'a JsonValue,
    entity: &'static str,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(raw: &'a JsonValue, entity: &'static str) -> Result<Self> {
        if !raw.is_object() {
            return Err(MapError::InvalidField {
                entity: entity.into(),
                field: "<entry>".into(),
                value: raw.to_string(),
            });
        }
        Ok(Self { raw, entity })
    }

    fn invalid(&self, key: &str, value: &JsonValue) -> MapError {
        MapError::InvalidField {
            entity: self.entity.into(),
            field: key.into(),
            value: value.to_string(),
        }
    }

    pub(crate) fn f64(&self, key: &str) -> Result<f64> {
        let value = self
            .raw
            .get(key)
            .ok_or_else(|| MapError::missing(self.entity, key))?;
        value.as_f64().ok_or_else(|| self.invalid(key, value))
    }

    pub(crate) fn f64_or(&self, key: &str, default: f64) -> Result<f64> {
        match self.raw.get(key) {
            None => Ok(default),
            Some(value) => value.as_f64().ok_or_else(|| self.invalid(key, value)),
        }
    }

    pub(crate) fn i64_or(&self, key: &str, default: i64) -> Result<i64> {
        self.code(key, default, Some)
    }

    /// Integer field decoded through `decode` (enum codes, counts).
    pub(crate) fn code<T>(&self, key: &str, default: T, decode: fn(i64) -> Option<T>) -> Result<T> {
        match self.raw.get(key) {
            None => Ok(default),
            Some(value) => value
                .as_i64()
                .and_then(decode)
                .ok_or_else(|| self.invalid(key, value)),
        }
    }
}

pub(crate) fn get_nums(raw: &JsonValue, key: &str) -> Option<Vec<f64>> {
    raw.get(key)
        .and_then(JsonValue::as_array)
        .map(|items| items.iter().filter_map(JsonValue::as_f64).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn custom_data_is_omitted_when_empty() {
        let mut map = Object::new();
        attach_custom_data(&mut map, Dialect::V3, Object::new(), &Object::new());
        assert!(map.is_empty());

        let mut custom = Object::new();
        put_opt(&mut custom, "_track", Some("a"));
        let mut extra = Object::new();
        extra.insert("_fake".into(), json!(true));
        attach_custom_data(&mut map, Dialect::V2, custom, &extra);
        assert_eq!(
            JsonValue::Object(map),
            json!({ "_customData": { "_track": "a", "_fake": true } })
        );
    }

    #[test]
    fn fields_report_missing_and_mistyped_values() {
        let raw = json!({ "b": 2.5, "x": "left", "c": 7 });
        let fields = Fields::new(&raw, "note").unwrap();
        assert_eq!(fields.f64("b").unwrap(), 2.5);
        assert_eq!(fields.i64_or("y", 1).unwrap(), 1);
        assert!(matches!(fields.f64("tb"), Err(MapError::MissingField { .. })));
        assert!(matches!(fields.i64_or("x", 0), Err(MapError::InvalidField { .. })));
        let small = |v: i64| (0..=1).contains(&v).then_some(v);
        assert!(fields.code("c", 0, small).is_err());
        assert!(Fields::new(&json!([1, 2]), "note").is_err());
    }

    #[test]
    fn detects_dialect_from_keys() {
        assert_eq!(detect_dialect(&json!({ "_version": "2.6.0" })), Dialect::V2);
        assert_eq!(detect_dialect(&json!({ "version": "3.2.0" })), Dialect::V3);
    }
}
