//! JSON helpers shared by the wire encoders: dialect selection, number
//! emission and decimal-precision rounding.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Largest integer JSON numbers can carry without precision loss.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Wire dialect of the beatmap schema. The two dialects carry the same data
/// and differ in field naming (`_time`/`_customData` versus `b`/`customData`).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    V2,
    #[default]
    V3,
}

impl Dialect {
    /// Apply the dialect's naming convention to a v3-style key
    /// (`"animation"` becomes `"_animation"` in v2).
    pub fn key(self, name: &str) -> String {
        match self {
            Dialect::V2 => format!("_{name}"),
            Dialect::V3 => name.to_string(),
        }
    }

    /// Name of the custom data object for this dialect.
    pub fn custom_data(self) -> &'static str {
        match self {
            Dialect::V2 => "_customData",
            Dialect::V3 => "customData",
        }
    }
}

/// Emit `v` as a JSON number. Integral values become JSON integers so that
/// values read from integer literals serialize back unchanged; a float
/// literal such as `1.0` comes back as `1`.
pub fn number(v: f64) -> JsonValue {
    if v.is_finite() && v.fract() == 0.0 && v.abs() <= MAX_SAFE_INTEGER {
        JsonValue::from(v as i64)
    } else {
        serde_json::Number::from_f64(v)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null)
    }
}

/// Emit a value tuple as a JSON array of numbers.
pub fn numbers(values: &[f64]) -> JsonValue {
    JsonValue::Array(values.iter().copied().map(number).collect())
}

/// Round `v` to `decimals` fractional digits.
#[inline]
pub fn round_to(v: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (v * scale).round() / scale
}

/// Round every floating-point number in `value` to `decimals` fractional
/// digits, in place. Integers are left untouched.
pub fn round_json(value: &mut JsonValue, decimals: u32) {
    match value {
        JsonValue::Number(n) => {
            if n.is_f64() {
                if let Some(f) = n.as_f64() {
                    *value = number(round_to(f, decimals));
                }
            }
        }
        JsonValue::Array(items) => {
            for item in items.iter_mut() {
                round_json(item, decimals);
            }
        }
        JsonValue::Object(map) => {
            for (_, item) in map.iter_mut() {
                round_json(item, decimals);
            }
        }
        _ => {}
    }
}
