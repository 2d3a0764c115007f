//! Keyframe tracks: time-ordered keyframe sequences for one property.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::AnimationError;
use crate::keyframe::Keyframe;
use crate::Result;

/// Ordered keyframes for one property. Times are non-decreasing (ties are
/// instantaneous jumps) and every keyframe shares the same value arity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "JsonValue", into = "JsonValue")]
pub struct Track {
    keyframes: Vec<Keyframe>,
}

impl Track {
    /// Build a track, stable-sorting keyframes by time.
    pub fn new(mut keyframes: Vec<Keyframe>) -> Result<Self> {
        check_arity(&keyframes)?;
        let ordered = keyframes.windows(2).all(|w| w[0].time() <= w[1].time());
        if !ordered {
            log::warn!(
                "track keyframes were out of time order; reordering {} keyframes",
                keyframes.len()
            );
            keyframes.sort_by(|a, b| a.time().total_cmp(&b.time()));
        }
        Ok(Self { keyframes })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// A single keyframe at time 0 holding `values`.
    pub fn from_static(values: impl Into<Vec<f64>>) -> Self {
        Self {
            keyframes: vec![Keyframe::new(values, 0.0)],
        }
    }

    /// Build a track from either a flat value array (a static value, stored as
    /// one keyframe at time 0) or an array of keyframe arrays.
    pub fn from_raw(data: &JsonValue) -> Result<Self> {
        Self::from_raw_with_arity(data, None)
    }

    /// Like [`Track::from_raw`], using a known value arity instead of
    /// inferring it. Keyframes holding exactly `arity` numbers get time 0.
    pub fn from_raw_with_arity(data: &JsonValue, arity: Option<usize>) -> Result<Self> {
        let items = data
            .as_array()
            .ok_or_else(|| AnimationError::parse(data, "track must be an array"))?;
        if items.is_empty() {
            return Ok(Self::empty());
        }

        let nested: Vec<&Vec<JsonValue>> = items.iter().filter_map(JsonValue::as_array).collect();
        if nested.is_empty() {
            let keyframe = match arity {
                Some(n) => Keyframe::parse_with_arity(items, n)?,
                None if items.iter().all(JsonValue::is_number) => {
                    let values: Vec<f64> = items.iter().filter_map(JsonValue::as_f64).collect();
                    Keyframe::new(values, 0.0)
                }
                None => Keyframe::parse(items)?,
            };
            return Ok(Self {
                keyframes: vec![keyframe],
            });
        }
        if nested.len() != items.len() {
            return Err(AnimationError::parse(
                data,
                "track mixes keyframe arrays with bare values",
            ));
        }

        let arity = match arity {
            Some(n) => n,
            None => infer_arity(&nested)?,
        };
        let keyframes = nested
            .iter()
            .map(|raw| Keyframe::parse_with_arity(raw, arity))
            .collect::<Result<Vec<_>>>()?;
        Self::new(keyframes)
    }

    /// Array-of-keyframes encoding.
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Array(self.keyframes.iter().map(Keyframe::to_json).collect())
    }

    /// Static tracks (a single keyframe) return their sole value. Animated
    /// tracks return `None`: interpolation is left to the renderer.
    pub fn value_at(&self, _time: f64) -> Option<&[f64]> {
        match self.keyframes.as_slice() {
            [only] => Some(only.values()),
            _ => None,
        }
    }

    /// Insert a keyframe after any keyframes sharing its time.
    pub fn push(&mut self, keyframe: Keyframe) -> Result<()> {
        if let Some(expected) = self.arity() {
            if keyframe.arity() != expected {
                return Err(AnimationError::ArityMismatch {
                    property: "track".into(),
                    expected,
                    actual: keyframe.arity(),
                });
            }
        }
        let at = self
            .keyframes
            .partition_point(|k| k.time() <= keyframe.time());
        self.keyframes.insert(at, keyframe);
        Ok(())
    }

    /// Apply `f` to every keyframe's value tuple, keeping times and modifiers.
    pub fn map_values<F>(&self, mut f: F) -> Result<Self>
    where
        F: FnMut(&[f64]) -> Vec<f64>,
    {
        let keyframes = self
            .keyframes
            .iter()
            .map(|k| {
                let mut next = k.clone();
                next.set_values(f(k.values()));
                next
            })
            .collect();
        Self::new(keyframes)
    }

    #[inline]
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn into_keyframes(self) -> Vec<Keyframe> {
        self.keyframes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    pub fn is_static(&self) -> bool {
        self.keyframes.len() == 1
    }

    /// Value arity shared by every keyframe, `None` for an empty track.
    pub fn arity(&self) -> Option<usize> {
        self.keyframes.first().map(Keyframe::arity)
    }

    /// Time of the last keyframe (0 for an empty track).
    pub fn end_time(&self) -> f64 {
        self.keyframes.last().map(Keyframe::time).unwrap_or(0.0)
    }
}

fn check_arity(keyframes: &[Keyframe]) -> Result<()> {
    if let Some(first) = keyframes.first() {
        if let Some(bad) = keyframes.iter().find(|k| k.arity() != first.arity()) {
            return Err(AnimationError::ArityMismatch {
                property: "track".into(),
                expected: first.arity(),
                actual: bad.arity(),
            });
        }
    }
    Ok(())
}

/// Infer the value arity of a keyframe list: the longest numeric prefix
/// holds values plus time; entries one number shorter have implicit time 0.
fn infer_arity(items: &[&Vec<JsonValue>]) -> Result<usize> {
    let counts: Vec<usize> = items
        .iter()
        .map(|raw| raw.iter().take_while(|v| v.is_number()).count())
        .collect();
    let longest = counts.iter().copied().max().unwrap_or(0);
    if longest < 2 {
        return Err(AnimationError::parse(
            JsonValue::Array(items.iter().map(|r| JsonValue::Array(r.to_vec())).collect()),
            "time is not numeric",
        ));
    }
    if let Some(&bad) = counts.iter().find(|&&c| c + 1 < longest) {
        return Err(AnimationError::ArityMismatch {
            property: "track".into(),
            expected: longest - 1,
            actual: bad,
        });
    }
    Ok(longest - 1)
}

impl TryFrom<JsonValue> for Track {
    type Error = AnimationError;

    fn try_from(value: JsonValue) -> Result<Self> {
        Self::from_raw(&value)
    }
}

impl From<Track> for JsonValue {
    fn from(value: Track) -> Self {
        value.to_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_array_is_a_static_track() {
        let track = Track::from_raw(&json!([1, 2, 3])).unwrap();
        assert!(track.is_static());
        assert_eq!(track.value_at(10.0), Some(&[1.0, 2.0, 3.0][..]));
        assert_eq!(track.keyframes()[0].time(), 0.0);
    }

    #[test]
    fn infers_arity_and_implicit_start_time() {
        let track = Track::from_raw(&json!([[0, 0, 0], [1, 1, 1, 1]])).unwrap();
        assert_eq!(track.len(), 2);
        assert_eq!(track.arity(), Some(3));
        assert_eq!(track.keyframes()[0].time(), 0.0);
        assert_eq!(track.value_at(0.5), None);
        assert_eq!(track.to_json(), json!([[0, 0, 0, 0], [1, 1, 1, 1]]));
    }

    #[test]
    fn rejects_mixed_arity() {
        let err = Track::from_raw(&json!([[0, 0], [1, 1, 1, 1]])).unwrap_err();
        assert!(matches!(err, AnimationError::ArityMismatch { .. }));
    }

    #[test]
    fn sorts_stably_on_construction() {
        let track = Track::from_raw(&json!([[5, 1], [1, 0.5], [2, 0.5], [0, 0]])).unwrap();
        let order: Vec<f64> = track.keyframes().iter().map(|k| k.values()[0]).collect();
        assert_eq!(order, vec![0.0, 1.0, 2.0, 5.0]);
    }

    #[test]
    fn push_inserts_after_equal_times() {
        let mut track = Track::from_raw(&json!([[0, 0], [1, 1]])).unwrap();
        track.push(Keyframe::new(vec![9.0], 1.0)).unwrap();
        track.push(Keyframe::new(vec![4.0], 0.5)).unwrap();
        assert_eq!(track.to_json(), json!([[0, 0], [4, 0.5], [1, 1], [9, 1]]));
        assert!(track.push(Keyframe::new(vec![1.0, 2.0], 2.0)).is_err());
    }
}
