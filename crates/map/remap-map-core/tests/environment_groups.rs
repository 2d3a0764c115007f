use anyhow::Result;
use remap_map_core::animation::{AnimatedProperty, Ease, Property, Track};
use remap_map_core::{
    animate_env_group, animate_env_track, CustomEvent, Difficulty, EnvironmentObject, LookupMethod,
};
use serde_json::json;

fn pillar(id: &str) -> EnvironmentObject {
    EnvironmentObject::environment(id, LookupMethod::Contains).with_group("pillars")
}

fn event_tracks(diff: &Difficulty) -> Vec<String> {
    diff.custom_events
        .iter()
        .map(|e| match e {
            CustomEvent::AnimateTrack(a) => a.track.clone(),
        })
        .collect()
}

#[test]
fn group_animation_pushes_one_event_per_member() -> Result<()> {
    let mut diff = Difficulty::new();
    let mut placed = pillar("PillarL");
    placed.set_transform(Property::Position, [0.0, 0.0, 20.0])?;
    diff.push_environment(placed);
    diff.push_environment(pillar("PillarR"));
    diff.push_environment(EnvironmentObject::environment("Floor", LookupMethod::Exact));

    let lift = Track::from_raw(&json!([[0, 5, 0, 0.5]]))?;
    let pushed = animate_env_group(
        &mut diff,
        "pillars",
        16.0,
        |anim| {
            anim.set(Property::Position, lift.clone())?;
            Ok(())
        },
        Some(4.0),
        Some(Ease::InOutSine),
    )?;

    assert_eq!(pushed, 2);
    assert_eq!(event_tracks(&diff), ["environment_0", "environment_1"]);
    assert_eq!(diff.environment[0].track.as_deref(), Some("environment_0"));
    assert_eq!(diff.environment[1].track.as_deref(), Some("environment_1"));
    assert!(diff.environment[2].track.is_none());

    // The object's own position is merged in after the new keyframes.
    let first = diff.custom_events[0].animation();
    assert_eq!(
        first.get(&Property::Position).map(AnimatedProperty::to_json),
        Some(json!([[0, 0, 20, 0], [0, 5, 0, 0.5]]))
    );
    let second = diff.custom_events[1].animation();
    assert_eq!(
        second.get(&Property::Position).map(AnimatedProperty::to_json),
        Some(json!([[0, 5, 0, 0.5]]))
    );

    let out = diff.to_json()?;
    let event = &out["customData"]["customEvents"][0];
    assert_eq!(event["t"], json!("AnimateTrack"));
    assert_eq!(event["d"]["duration"], json!(4));
    assert_eq!(event["d"]["easing"], json!("easeInOutSine"));
    Ok(())
}

#[test]
fn repeated_group_calls_reuse_assigned_tracks() -> Result<()> {
    let mut diff = Difficulty::new();
    diff.push_environment(pillar("PillarL"));
    diff.push_environment(pillar("PillarR"));

    for time in [0.0, 8.0] {
        animate_env_group(
            &mut diff,
            "pillars",
            time,
            |anim| {
                anim.set(Property::Scale, [1.0, 2.0, 1.0])?;
                Ok(())
            },
            None,
            None,
        )?;
    }

    assert_eq!(
        event_tracks(&diff),
        ["environment_0", "environment_1", "environment_0", "environment_1"]
    );
    assert_eq!(diff.next_env_track(), "environment_2");
    Ok(())
}

#[test]
fn track_animation_resolves_point_definitions() -> Result<()> {
    let mut diff = Difficulty::new();
    diff.define(
        AnimatedProperty::from_json(&json!([[0, 0, 0, 0], [0, 10, 0, 1]]), Some(3))?,
        "rise",
    )?;
    let mut tower = EnvironmentObject::environment("Tower", LookupMethod::EndsWith)
        .with_track("towers");
    tower.set_transform(Property::Position, "rise")?;
    diff.push_environment(tower);

    let pushed = animate_env_track(
        &mut diff,
        "towers",
        2.0,
        |anim| {
            anim.set(Property::Position, [1.0, 0.0, 0.0])?;
            Ok(())
        },
        None,
        None,
    )?;
    assert_eq!(pushed, 1);
    assert_eq!(
        diff.custom_events[0]
            .animation()
            .get(&Property::Position)
            .map(AnimatedProperty::to_json),
        Some(json!([[1, 0, 0, 0], [0, 0, 0, 0], [0, 10, 0, 1]]))
    );
    Ok(())
}

#[test]
fn failing_builder_pushes_nothing() {
    let mut diff = Difficulty::new();
    diff.push_environment(pillar("PillarL").with_track("left"));

    let err = animate_env_track(
        &mut diff,
        "left",
        0.0,
        |anim| {
            anim.set(Property::Color, [1.0, 0.0, 0.0])?;
            Ok(())
        },
        None,
        None,
    )
    .unwrap_err();
    assert_eq!(err.category(), "type");
    assert!(diff.custom_events.is_empty());
}

#[test]
fn generated_names_avoid_tracks_used_elsewhere() {
    let mut diff = Difficulty::new();
    diff.push_custom_event(CustomEvent::animate_track(0.0, "environment_0"));
    diff.push_environment(pillar("PillarL"));

    animate_env_group(&mut diff, "pillars", 1.0, |_| Ok(()), None, None).expect("animate");
    assert_eq!(diff.environment[0].track.as_deref(), Some("environment_1"));
}

#[test]
fn failed_group_animation_leaves_the_document_unchanged() -> Result<()> {
    let mut diff = Difficulty::new();
    diff.push_environment(pillar("PillarL"));
    let mut unresolved = pillar("PillarR");
    unresolved.set_transform(Property::Position, "undefined")?;
    diff.push_environment(unresolved);
    let before = diff.clone();

    let err = animate_env_group(
        &mut diff,
        "pillars",
        4.0,
        |anim| {
            anim.set(Property::Position, [0.0, 1.0, 0.0])?;
            Ok(())
        },
        None,
        None,
    )
    .unwrap_err();

    assert_eq!(err.category(), "lookup");
    assert_eq!(diff, before);
    assert!(diff.environment.iter().all(|env| env.track.is_none()));
    assert_eq!(diff.next_env_track(), "environment_0");
    Ok(())
}
