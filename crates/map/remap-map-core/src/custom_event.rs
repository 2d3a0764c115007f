//! Custom (track) events.

use remap_animation_core::{Animation, Dialect, Ease, OptimizeSettings};
use serde_json::Value as JsonValue;

use crate::wire::{put_num, put_opt, put_opt_num, Object};
use crate::Result;

/// Animate every object on `track` over `duration` beats.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimateTrack {
    pub time: f64,
    pub track: String,
    pub duration: Option<f64>,
    pub easing: Option<Ease>,
    pub repeat: Option<u32>,
    pub animation: Animation,
}

impl AnimateTrack {
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_easing(mut self, easing: Ease) -> Self {
        self.easing = Some(easing);
        self
    }

    fn data(&self, dialect: Dialect) -> Object {
        let mut data = Object::new();
        data.insert(dialect.key("track"), self.track.clone().into());
        put_opt_num(&mut data, dialect.key("duration"), self.duration);
        put_opt(&mut data, dialect.key("easing"), self.easing.map(Ease::name));
        put_opt(&mut data, dialect.key("repeat"), self.repeat);
        if let JsonValue::Object(properties) = self.animation.to_json(dialect) {
            data.extend(properties);
        }
        data
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CustomEvent {
    AnimateTrack(AnimateTrack),
}

impl CustomEvent {
    pub fn animate_track(time: f64, track: impl Into<String>) -> AnimateTrack {
        AnimateTrack {
            time,
            track: track.into(),
            duration: None,
            easing: None,
            repeat: None,
            animation: Animation::new(),
        }
    }

    pub fn time(&self) -> f64 {
        match self {
            CustomEvent::AnimateTrack(e) => e.time,
        }
    }

    /// Wire type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            CustomEvent::AnimateTrack(_) => "AnimateTrack",
        }
    }

    pub fn animation(&self) -> &Animation {
        match self {
            CustomEvent::AnimateTrack(e) => &e.animation,
        }
    }

    pub fn optimize(&mut self, settings: &OptimizeSettings) -> Result<()> {
        match self {
            CustomEvent::AnimateTrack(e) => e.animation = e.animation.optimized(settings)?,
        }
        Ok(())
    }

    /// v3: `{b, t, d}`; v2: `{_time, _type, _data}`.
    pub fn to_json(&self, dialect: Dialect) -> JsonValue {
        let data = match self {
            CustomEvent::AnimateTrack(e) => e.data(dialect),
        };
        let mut map = Object::new();
        let (time, kind, payload) = match dialect {
            Dialect::V3 => ("b", "t", "d"),
            Dialect::V2 => ("_time", "_type", "_data"),
        };
        put_num(&mut map, time, self.time());
        map.insert(kind.into(), self.type_name().into());
        map.insert(payload.into(), JsonValue::Object(data));
        JsonValue::Object(map)
    }
}

impl From<AnimateTrack> for CustomEvent {
    fn from(value: AnimateTrack) -> Self {
        CustomEvent::AnimateTrack(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remap_animation_core::{Property, Track};
    use serde_json::json;

    fn event() -> CustomEvent {
        let mut e = CustomEvent::animate_track(8.0, "pillars")
            .with_duration(4.0)
            .with_easing(Ease::OutQuad);
        e.animation
            .set(
                Property::Position,
                Track::from_raw(&json!([[0, 0, 0, 0], [0, 10, 0, 1]])).unwrap(),
            )
            .unwrap();
        e.into()
    }

    #[test]
    fn v3_layout() {
        assert_eq!(
            event().to_json(Dialect::V3),
            json!({
                "b": 8,
                "t": "AnimateTrack",
                "d": {
                    "track": "pillars",
                    "duration": 4,
                    "easing": "easeOutQuad",
                    "position": [[0, 0, 0, 0], [0, 10, 0, 1]]
                }
            })
        );
    }

    #[test]
    fn v2_layout() {
        assert_eq!(
            event().to_json(Dialect::V2),
            json!({
                "_time": 8,
                "_type": "AnimateTrack",
                "_data": {
                    "_track": "pillars",
                    "_duration": 4,
                    "_easing": "easeOutQuad",
                    "_position": [[0, 0, 0, 0], [0, 10, 0, 1]]
                }
            })
        );
    }
}
