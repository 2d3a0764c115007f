//! Animation combination: time-ordered merge of two tracks for one property.
//!
//! Model:
//! - A static value is broadcast as a single keyframe at time 0.
//! - Keyframes interleave in non-decreasing time order. On equal times the
//!   left-hand keyframe comes first; resolving the instant is up to the renderer.
//! - No keyframe is dropped or deduplicated and values are never summed:
//!   this is a time-domain merge, not a spatial composition. Use
//!   [`crate::geometry::rotate_point`] before combining to compose spatially.

use crate::error::AnimationError;
use crate::keyframe::Keyframe;
use crate::point_definitions::PointDefinitions;
use crate::property::{AnimatedProperty, Property};
use crate::track::Track;
use crate::Result;

/// Merge two tracks of the same property. An empty side yields the other
/// side unchanged; differing value arities fail with
/// [`AnimationError::ArityMismatch`].
pub fn combine_tracks(a: &Track, b: &Track, property: &Property) -> Result<Track> {
    if a.is_empty() {
        return Ok(b.clone());
    }
    if b.is_empty() {
        return Ok(a.clone());
    }
    check_arity(a.arity(), b.arity(), property)?;

    let left = a.keyframes();
    let right = b.keyframes();
    let mut merged: Vec<Keyframe> = Vec::with_capacity(left.len() + right.len());
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        if right[j].time() < left[i].time() {
            merged.push(right[j].clone());
            j += 1;
        } else {
            merged.push(left[i].clone());
            i += 1;
        }
    }
    merged.extend_from_slice(&left[i..]);
    merged.extend_from_slice(&right[j..]);

    log::trace!(
        "combined '{}': {} + {} -> {} keyframes",
        property,
        left.len(),
        right.len(),
        merged.len()
    );
    Track::new(merged)
}

/// Merge two property payloads. Static sides are broadcast to time 0 and the
/// result is always a track, except when one side is an empty track, in
/// which case the other side is returned unchanged. Point definition names
/// must be resolved first (see [`combine_resolved`]).
pub fn combine(
    a: &AnimatedProperty,
    b: &AnimatedProperty,
    property: &Property,
) -> Result<AnimatedProperty> {
    if is_empty_track(a) {
        return Ok(b.clone());
    }
    if is_empty_track(b) {
        return Ok(a.clone());
    }
    let left = as_track(a)?;
    let right = as_track(b)?;
    combine_tracks(&left, &right, property).map(AnimatedProperty::Animated)
}

/// [`combine`] after resolving point definition names against `definitions`.
pub fn combine_resolved(
    a: &AnimatedProperty,
    b: &AnimatedProperty,
    property: &Property,
    definitions: &PointDefinitions,
) -> Result<AnimatedProperty> {
    let a = a.resolve(definitions)?;
    let b = b.resolve(definitions)?;
    combine(&a, &b, property)
}

fn is_empty_track(p: &AnimatedProperty) -> bool {
    matches!(p, AnimatedProperty::Animated(track) if track.is_empty())
}

fn as_track(p: &AnimatedProperty) -> Result<Track> {
    match p {
        AnimatedProperty::Named(name) => Err(AnimationError::UnknownPointDefinition {
            name: name.clone(),
        }),
        other => other
            .to_track()
            .ok_or_else(|| AnimationError::parse(other.to_json(), "property has no track form")),
    }
}

fn check_arity(a: Option<usize>, b: Option<usize>, property: &Property) -> Result<()> {
    match (a, b) {
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn track(v: serde_json::Value) -> Track {
        Track::from_raw(&v).unwrap()
    }

    #[test]
    fn merges_by_time_with_left_first_on_ties() {
        let a = track(json!([[0, 0], [1, 1], [3, 2]]));
        let b = track(json!([[10, 1], [20, 1.5]]));
        let out = combine_tracks(&a, &b, &Property::Dissolve).unwrap();
        assert_eq!(
            out.to_json(),
            json!([[0, 0], [1, 1], [10, 1], [20, 1.5], [3, 2]])
        );
    }

    #[test]
    fn empty_side_returns_other_unchanged() {
        let a = AnimatedProperty::Animated(Track::empty());
        let b = AnimatedProperty::Static(vec![1.0, 2.0, 3.0]);
        assert_eq!(combine(&a, &b, &Property::Position).unwrap(), b);
        assert_eq!(combine(&b, &a, &Property::Position).unwrap(), b);
    }

    #[test]
    fn arity_mismatch_is_rejected() {
        let a = AnimatedProperty::Static(vec![1.0, 2.0, 3.0]);
        let b = AnimatedProperty::Animated(track(json!([[0, 0], [1, 1]])));
        let err = combine(&a, &b, &Property::Position).unwrap_err();
        assert_eq!(
            err,
            AnimationError::ArityMismatch {
                property: "position".into(),
                expected: 3,
                actual: 1,
            }
        );
    }

    #[test]
    fn unresolved_names_are_rejected_until_resolved() {
        let a = AnimatedProperty::Named("bounce".into());
        let b = AnimatedProperty::Static(vec![0.0]);
        assert!(matches!(
            combine(&a, &b, &Property::Dissolve),
            Err(AnimationError::UnknownPointDefinition { .. })
        ));

        let mut defs = PointDefinitions::new();
        defs.define(track(json!([[0, 0], [1, 1]])), "bounce").unwrap();
        let out = combine_resolved(&a, &b, &Property::Dissolve, &defs).unwrap();
        assert_eq!(out.point_count(), 3);
    }
}
