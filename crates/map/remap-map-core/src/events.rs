//! Basic (vanilla lighting) events.
//!
//! Each kind writes the shared `time/type/value/floatValue` header plus its
//! own custom data fields, named per dialect.

use remap_animation_core::{Dialect, Ease};
use serde_json::Value as JsonValue;

use crate::wire::{attach_custom_data, put_num, put_opt, put_opt_num, put_opt_nums, Object};

/// Event type numbers used by the helpers below.
pub mod group {
    pub const BACK_LASERS: i64 = 0;
    pub const RING_LIGHTS: i64 = 1;
    pub const LEFT_LASERS: i64 = 2;
    pub const RIGHT_LASERS: i64 = 3;
    pub const CENTER_LASERS: i64 = 4;
    pub const BOOST: i64 = 5;
    pub const RING_SPIN: i64 = 8;
    pub const RING_ZOOM: i64 = 9;
    pub const LEFT_LASER_SPEED: i64 = 12;
    pub const RIGHT_LASER_SPEED: i64 = 13;
    pub const EARLY_ROTATION: i64 = 14;
    pub const LATE_ROTATION: i64 = 15;
}

/// Light event values.
pub mod action {
    pub const OFF: i64 = 0;
    pub const BLUE_ON: i64 = 1;
    pub const BLUE_FLASH: i64 = 2;
    pub const BLUE_FADE: i64 = 3;
    pub const BLUE_IN: i64 = 4;
    pub const RED_ON: i64 = 5;
    pub const RED_FLASH: i64 = 6;
    pub const RED_FADE: i64 = 7;
    pub const RED_IN: i64 = 8;
}

/// Header shared by every basic event.
#[derive(Clone, Debug, PartialEq)]
pub struct EventBase {
    pub time: f64,
    /// Event type (`_type` / `et`).
    pub group: i64,
    pub value: i64,
    pub float_value: f64,
    /// Written verbatim after the typed custom data fields.
    pub custom_data: Object,
}

impl EventBase {
    pub fn new(time: f64, group: i64, value: i64) -> Self {
        Self {
            time,
            group,
            value,
            float_value: 1.0,
            custom_data: Object::new(),
        }
    }

    fn write(&self, dialect: Dialect, custom: Object) -> JsonValue {
        let mut map = Object::new();
        match dialect {
            Dialect::V3 => {
                put_num(&mut map, "b", self.time);
                map.insert("et".into(), self.group.into());
                map.insert("i".into(), self.value.into());
                put_num(&mut map, "f", self.float_value);
            }
            Dialect::V2 => {
                put_num(&mut map, "_time", self.time);
                map.insert("_type".into(), self.group.into());
                map.insert("_value".into(), self.value.into());
                put_num(&mut map, "_floatValue", self.float_value);
            }
        }
        attach_custom_data(&mut map, dialect, custom, &self.custom_data);
        JsonValue::Object(map)
    }
}

/// Light ids targeted by a light event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LightId {
    Single(i64),
    Many(Vec<i64>),
}

impl From<i64> for LightId {
    fn from(value: i64) -> Self {
        LightId::Single(value)
    }
}

impl From<Vec<i64>> for LightId {
    fn from(value: Vec<i64>) -> Self {
        LightId::Many(value)
    }
}

impl From<&LightId> for JsonValue {
    fn from(value: &LightId) -> Self {
        match value {
            LightId::Single(id) => (*id).into(),
            LightId::Many(ids) => ids.clone().into(),
        }
    }
}

/// Colour argument of the light helpers. A custom colour uses the red
/// event values and writes the colour to custom data.
#[derive(Clone, Debug, PartialEq)]
pub enum LightColor {
    Blue,
    Red,
    Custom(Vec<f64>),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LerpType {
    Rgb,
    Hsv,
}

impl LerpType {
    pub fn name(self) -> &'static str {
        match self {
            LerpType::Rgb => "RGB",
            LerpType::Hsv => "HSV",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LightEvent {
    pub base: EventBase,
    pub light_id: Option<LightId>,
    pub color: Option<Vec<f64>>,
    /// Transition easing; goes on the start event.
    pub easing: Option<Ease>,
    /// Colour interpolation of transitions; goes on the start event.
    pub lerp_type: Option<LerpType>,
}

impl LightEvent {
    /// An event on light group `group`, initially off.
    pub fn new(time: f64, group: i64) -> Self {
        Self {
            base: EventBase::new(time, group, action::OFF),
            light_id: None,
            color: None,
            easing: None,
            lerp_type: None,
        }
    }

    pub fn off(mut self, light_id: Option<LightId>) -> Self {
        self.base.value = action::OFF;
        if light_id.is_some() {
            self.light_id = light_id;
        }
        self
    }

    pub fn on(self, color: LightColor, light_id: Option<LightId>) -> Self {
        self.with_action(action::BLUE_ON, action::RED_ON, color, light_id)
    }

    pub fn flash(self, color: LightColor, light_id: Option<LightId>) -> Self {
        self.with_action(action::BLUE_FLASH, action::RED_FLASH, color, light_id)
    }

    /// Fade the lights out from `color`.
    pub fn fade(self, color: LightColor, light_id: Option<LightId>) -> Self {
        self.with_action(action::BLUE_FADE, action::RED_FADE, color, light_id)
    }

    /// Transition into `color` from the previous event.
    pub fn fade_in(self, color: LightColor, light_id: Option<LightId>) -> Self {
        self.with_action(action::BLUE_IN, action::RED_IN, color, light_id)
    }

    fn with_action(
        mut self,
        blue: i64,
        red: i64,
        color: LightColor,
        light_id: Option<LightId>,
    ) -> Self {
        self.base.value = match color {
            LightColor::Blue => blue,
            LightColor::Red => red,
            LightColor::Custom(rgba) => {
                self.color = Some(rgba);
                red
            }
        };
        if light_id.is_some() {
            self.light_id = light_id;
        }
        self
    }

    pub fn to_json(&self, dialect: Dialect) -> JsonValue {
        let mut custom = Object::new();
        put_opt_nums(&mut custom, dialect.key("color"), self.color.as_deref());
        put_opt(&mut custom, dialect.key("easing"), self.easing.map(Ease::name));
        put_opt(
            &mut custom,
            dialect.key("lerpType"),
            self.lerp_type.map(LerpType::name),
        );
        put_opt(&mut custom, dialect.key("lightID"), self.light_id.as_ref());
        self.base.write(dialect, custom)
    }
}

/// Rotating laser speed.
#[derive(Clone, Debug, PartialEq)]
pub struct LaserSpeedEvent {
    pub base: EventBase,
    /// Precise speed, written when the speed is not integral.
    pub speed: Option<f64>,
    pub direction: Option<i64>,
    /// Keep the current laser rotation.
    pub lock_rotation: Option<bool>,
}

impl LaserSpeedEvent {
    pub fn new(time: f64, group: i64, speed: f64) -> Self {
        Self {
            base: EventBase::new(time, group, speed.trunc() as i64),
            speed: (speed.fract() != 0.0).then_some(speed),
            direction: None,
            lock_rotation: None,
        }
    }

    pub fn to_json(&self, dialect: Dialect) -> JsonValue {
        let mut custom = Object::new();
        match dialect {
            Dialect::V3 => {
                put_opt(&mut custom, "direction", self.direction);
                put_opt(&mut custom, "lockRotation", self.lock_rotation);
                put_opt_num(&mut custom, "speed", self.speed);
            }
            Dialect::V2 => {
                put_opt(&mut custom, "_direction", self.direction);
                put_opt(&mut custom, "_lockPosition", self.lock_rotation);
                put_opt_num(&mut custom, "_preciseSpeed", self.speed);
                put_opt_num(&mut custom, "_speed", self.speed);
            }
        }
        self.base.write(dialect, custom)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RingZoomEvent {
    pub base: EventBase,
    /// Position offset between rings.
    pub step: Option<f64>,
    pub speed: Option<f64>,
}

impl RingZoomEvent {
    pub fn new(time: f64, step: Option<f64>, speed: Option<f64>) -> Self {
        Self {
            base: EventBase::new(time, group::RING_ZOOM, 0),
            step,
            speed,
        }
    }

    pub fn to_json(&self, dialect: Dialect) -> JsonValue {
        let mut custom = Object::new();
        put_opt_num(&mut custom, dialect.key("speed"), self.speed);
        put_opt_num(&mut custom, dialect.key("step"), self.step);
        self.base.write(dialect, custom)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RingSpinEvent {
    pub base: EventBase,
    pub speed: Option<f64>,
    /// 1 is clockwise, 0 counter-clockwise.
    pub direction: Option<i64>,
    pub name_filter: Option<String>,
    /// Degrees of the spin.
    pub rotation: Option<f64>,
    /// Angle between rings.
    pub step: Option<f64>,
    /// Propagation rate through the rings.
    pub prop: Option<f64>,
}

impl RingSpinEvent {
    pub fn new(time: f64) -> Self {
        Self {
            base: EventBase::new(time, group::RING_SPIN, 0),
            speed: None,
            direction: None,
            name_filter: None,
            rotation: None,
            step: None,
            prop: None,
        }
    }

    pub fn to_json(&self, dialect: Dialect) -> JsonValue {
        let mut custom = Object::new();
        put_opt(&mut custom, dialect.key("direction"), self.direction);
        put_opt(
            &mut custom,
            dialect.key("nameFilter"),
            self.name_filter.clone(),
        );
        put_opt_num(&mut custom, dialect.key("prop"), self.prop);
        put_opt_num(&mut custom, dialect.key("rotation"), self.rotation);
        put_opt_num(&mut custom, dialect.key("speed"), self.speed);
        put_opt_num(&mut custom, dialect.key("step"), self.step);
        self.base.write(dialect, custom)
    }
}

/// Lane rotation of the gameplay objects (early or late group).
#[derive(Clone, Debug, PartialEq)]
pub struct RotationEvent {
    pub base: EventBase,
}

impl RotationEvent {
    pub fn new(time: f64, group: i64, rotation: i64) -> Self {
        Self {
            base: EventBase::new(time, group, rotation),
        }
    }

    pub fn to_json(&self, dialect: Dialect) -> JsonValue {
        let mut custom = Object::new();
        if dialect == Dialect::V2 {
            custom.insert("_rotation".into(), self.base.value.into());
        }
        self.base.write(dialect, custom)
    }
}

/// Any basic event stored by a difficulty.
#[derive(Clone, Debug, PartialEq)]
pub enum BasicEvent {
    Light(LightEvent),
    LaserSpeed(LaserSpeedEvent),
    RingZoom(RingZoomEvent),
    RingSpin(RingSpinEvent),
    Rotation(RotationEvent),
}

impl BasicEvent {
    pub fn base(&self) -> &EventBase {
        match self {
            BasicEvent::Light(e) => &e.base,
            BasicEvent::LaserSpeed(e) => &e.base,
            BasicEvent::RingZoom(e) => &e.base,
            BasicEvent::RingSpin(e) => &e.base,
            BasicEvent::Rotation(e) => &e.base,
        }
    }

    pub fn time(&self) -> f64 {
        self.base().time
    }

    pub fn to_json(&self, dialect: Dialect) -> JsonValue {
        match self {
            BasicEvent::Light(e) => e.to_json(dialect),
            BasicEvent::LaserSpeed(e) => e.to_json(dialect),
            BasicEvent::RingZoom(e) => e.to_json(dialect),
            BasicEvent::RingSpin(e) => e.to_json(dialect),
            BasicEvent::Rotation(e) => e.to_json(dialect),
        }
    }
}

impl From<LightEvent> for BasicEvent {
    fn from(value: LightEvent) -> Self {
        BasicEvent::Light(value)
    }
}

impl From<LaserSpeedEvent> for BasicEvent {
    fn from(value: LaserSpeedEvent) -> Self {
        BasicEvent::LaserSpeed(value)
    }
}

impl From<RingZoomEvent> for BasicEvent {
    fn from(value: RingZoomEvent) -> Self {
        BasicEvent::RingZoom(value)
    }
}

impl From<RingSpinEvent> for BasicEvent {
    fn from(value: RingSpinEvent) -> Self {
        BasicEvent::RingSpin(value)
    }
}

impl From<RotationEvent> for BasicEvent {
    fn from(value: RotationEvent) -> Self {
        BasicEvent::Rotation(value)
    }
}
