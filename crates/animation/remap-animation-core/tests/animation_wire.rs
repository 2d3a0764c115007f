use remap_animation_core::{
    rotate_property, AnimatedProperty, Animation, Dialect, Keyframe, PointDefinitions, Property,
};
use serde_json::{json, Value};

#[test]
fn fade_out_fixture_round_trips_between_dialects() {
    let raw: Value =
        remap_test_fixtures::animations::load("fade-out").expect("load fade-out fixture");
    let anim = Animation::from_json(&raw).expect("parse animation");
    assert_eq!(anim.len(), 3);

    let color = anim.get(&Property::Color).expect("color");
    assert_eq!(color.arity(), Some(4));
    let track = color.to_track().expect("color track");
    let flags: Vec<&str> = track.keyframes()[1].flags().collect();
    assert_eq!(flags, ["lerpHSV"]);

    let v3 = anim.to_json(Dialect::V3);
    let keys: Vec<&String> = v3.as_object().expect("object").keys().collect();
    assert_eq!(keys, ["dissolve", "color", "scale"]);
    assert_eq!(v3["dissolve"], raw["_dissolve"]);

    assert_eq!(anim.to_json(Dialect::V2), raw);
}

#[test]
fn keyframe_modifiers_keep_authoring_order() {
    let raw = json!([0, 1, 0, 0.5, "lerpHSV", "easeOutBack", "splineCatmullRom"]);
    let key = Keyframe::from_json(&raw).expect("parse");
    assert_eq!(key.values(), &[0.0, 1.0, 0.0]);
    assert_eq!(key.time(), 0.5);
    assert!(key.easing().is_some());
    assert!(key.spline().is_some());
    assert_eq!(key.to_json(), raw);

    assert!(Keyframe::from_json(&json!([1])).is_err());
    assert!(Keyframe::from_json(&json!([1, "easeInQuad"])).is_err());
    assert!(Keyframe::from_json(&json!([0, 1, "easeSideways"])).is_err());
}

#[test]
fn point_definitions_serialize_per_dialect() {
    let mut defs = PointDefinitions::new();
    let bounce = AnimatedProperty::from_json(&json!([[0, 0], [1, 0.5, "easeOutBounce"]]), None)
        .expect("parse");
    defs.define(bounce.clone(), "bounce").expect("define");
    // Identical redefinition is accepted, a different value is not.
    defs.define(bounce, "bounce").expect("redefine");
    let err = defs.define(1.0, "bounce").unwrap_err();
    assert_eq!(err.category(), "conflict");

    let v3 = defs.to_json(Dialect::V3);
    assert_eq!(v3, json!({ "bounce": [[0, 0], [1, 0.5, "easeOutBounce"]] }));
    let v2 = defs.to_json(Dialect::V2);
    assert_eq!(
        v2,
        json!([{ "_name": "bounce", "_points": [[0, 0], [1, 0.5, "easeOutBounce"]] }])
    );
    assert_eq!(PointDefinitions::from_json(&v2).expect("parse v2"), defs);
    assert_eq!(PointDefinitions::from_json(&v3).expect("parse v3"), defs);
}

#[test]
fn rotated_track_keeps_times_and_modifiers() {
    let raw = json!([[0, 0, 10, 0], [0, 0, 20, 1, "easeInOutSine"]]);
    let path = AnimatedProperty::from_json(&raw, Some(3)).expect("parse");
    let turned = rotate_property(&path, [0.0, 90.0, 0.0], [0.0, 0.0, 0.0]).expect("rotate");
    let track = turned.to_track().expect("track");
    let last = &track.keyframes()[1];
    assert_eq!(last.time(), 1.0);
    assert!(last.easing().is_some());
    // +Z swings onto +X under a 90 degree yaw.
    approx::assert_abs_diff_eq!(last.values()[0], 20.0, epsilon = 1e-9);
    approx::assert_abs_diff_eq!(last.values()[2], 0.0, epsilon = 1e-9);

    let dissolve = AnimatedProperty::from(0.5);
    assert!(rotate_property(&dissolve, [0.0, 90.0, 0.0], [0.0; 3]).is_err());
}
