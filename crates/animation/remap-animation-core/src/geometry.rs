//! Spatial helpers for authoring transforms.

use crate::error::AnimationError;
use crate::property::AnimatedProperty;
use crate::Result;

/// Rotate `point` about `anchor` by Euler angles in degrees, applied in the
/// renderer's order: Z, then X, then Y.
pub fn rotate_point(point: [f64; 3], rotation: [f64; 3], anchor: [f64; 3]) -> [f64; 3] {
    let mut v = [
        point[0] - anchor[0],
        point[1] - anchor[1],
        point[2] - anchor[2],
    ];
    let [rx, ry, rz] = rotation.map(f64::to_radians);

    let (s, c) = rz.sin_cos();
    v = [v[0] * c - v[1] * s, v[0] * s + v[1] * c, v[2]];
    let (s, c) = rx.sin_cos();
    v = [v[0], v[1] * c - v[2] * s, v[1] * s + v[2] * c];
    let (s, c) = ry.sin_cos();
    v = [v[0] * c + v[2] * s, v[1], -v[0] * s + v[2] * c];

    [v[0] + anchor[0], v[1] + anchor[1], v[2] + anchor[2]]
}

/// Apply [`rotate_point`] to every value of a 3-vector property, keeping
/// keyframe times and modifiers.
pub fn rotate_property(
    property: &AnimatedProperty,
    rotation: [f64; 3],
    anchor: [f64; 3],
) -> Result<AnimatedProperty> {
    if let Some(actual) = property.arity().filter(|n| *n != 3) {
        return Err(AnimationError::ArityMismatch {
            property: "value".into(),
            expected: 3,
            actual,
        });
    }
    let rotate = |v: &[f64]| rotate_point([v[0], v[1], v[2]], rotation, anchor).to_vec();
    match property {
        AnimatedProperty::Static(values) => Ok(AnimatedProperty::Static(rotate(values.as_slice()))),
        AnimatedProperty::Animated(track) => {
            track.map_values(rotate).map(AnimatedProperty::Animated)
        }
        AnimatedProperty::Named(name) => Err(AnimationError::UnknownPointDefinition {
            name: name.clone(),
        }),
    }
}
