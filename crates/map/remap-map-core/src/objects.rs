//! Gameplay objects: notes, bombs, walls, chains and arcs.
//!
//! Every object carries the same custom data block (track, animation and
//! note modifiers). Fake variants are the same types stored in the
//! difficulty's fake lists.

use remap_animation_core::{Animation, Dialect, OptimizeSettings};
use serde_json::Value as JsonValue;

use crate::error::MapError;
use crate::wire::{attach_custom_data, put_num, put_opt, put_opt_nums, Fields, Object};
use crate::Result;

/// Saber colour of a note, chain or arc.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum NoteColor {
    Red = 0,
    #[default]
    Blue = 1,
}

/// Cut direction, numbered as on the wire.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CutDirection {
    Up = 0,
    #[default]
    Down = 1,
    Left = 2,
    Right = 3,
    UpLeft = 4,
    UpRight = 5,
    DownLeft = 6,
    DownRight = 7,
    Dot = 8,
}

/// How an arc's midpoint bends.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum AnchorMode {
    #[default]
    Straight = 0,
    Clockwise = 1,
    CounterClockwise = 2,
}

impl NoteColor {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(NoteColor::Red),
            1 => Some(NoteColor::Blue),
            _ => None,
        }
    }
}

impl CutDirection {
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => CutDirection::Up,
            1 => CutDirection::Down,
            2 => CutDirection::Left,
            3 => CutDirection::Right,
            4 => CutDirection::UpLeft,
            5 => CutDirection::UpRight,
            6 => CutDirection::DownLeft,
            7 => CutDirection::DownRight,
            8 => CutDirection::Dot,
            _ => return None,
        })
    }
}

impl AnchorMode {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(AnchorMode::Straight),
            1 => Some(AnchorMode::Clockwise),
            2 => Some(AnchorMode::CounterClockwise),
            _ => None,
        }
    }
}

/// Custom data shared by every gameplay object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectCustomData {
    pub track: Option<String>,
    pub animation: Animation,
    pub flip: Option<[f64; 2]>,
    pub note_gravity: Option<bool>,
    pub note_look: Option<bool>,
    pub spawn_effect: Option<bool>,
    /// Written verbatim after the typed fields.
    pub extra: Object,
}

impl ObjectCustomData {
    fn write(&self, dialect: Dialect) -> Object {
        let mut custom = Object::new();
        put_opt(&mut custom, dialect.key("track"), self.track.clone());
        if !self.animation.is_empty() {
            custom.insert(dialect.key("animation"), self.animation.to_json(dialect));
        }
        put_opt_nums(
            &mut custom,
            dialect.key("flip"),
            self.flip.as_ref().map(|f| f.as_slice()),
        );
        put_opt(
            &mut custom,
            dialect.key("disableNoteGravity"),
            self.note_gravity.map(|g| !g),
        );
        put_opt(
            &mut custom,
            dialect.key("disableNoteLook"),
            self.note_look.map(|l| !l),
        );
        match dialect {
            Dialect::V3 => put_opt(&mut custom, "spawnEffect", self.spawn_effect),
            Dialect::V2 => put_opt(
                &mut custom,
                "_disableSpawnEffect",
                self.spawn_effect.map(|s| !s),
            ),
        }
        custom
    }

    /// Read the dialect's custom data block of `raw`. Keys without a typed
    /// field land in `extra`.
    fn read(raw: &JsonValue, dialect: Dialect, entity: &'static str) -> Result<Self> {
        let mut custom = Self::default();
        let Some(block) = raw.get(dialect.custom_data()) else {
            return Ok(custom);
        };
        let block = block.as_object().ok_or_else(|| MapError::InvalidField {
            entity: entity.into(),
            field: dialect.custom_data().into(),
            value: block.to_string(),
        })?;
        let invalid = |key: &str, value: &JsonValue| MapError::InvalidField {
            entity: entity.into(),
            field: key.into(),
            value: value.to_string(),
        };
        let flag =
            |key: &str, value: &JsonValue| value.as_bool().ok_or_else(|| invalid(key, value));

        for (key, value) in block {
            let name = match dialect {
                Dialect::V2 => key.strip_prefix('_'),
                Dialect::V3 => Some(key.as_str()).filter(|k| !k.starts_with('_')),
            };
            match name {
                Some("track") => {
                    let track = value.as_str().ok_or_else(|| invalid(key, value))?;
                    custom.track = Some(track.to_string());
                }
                Some("animation") => custom.animation = Animation::from_json(value)?,
                Some("flip") => {
                    let flip = value
                        .as_array()
                        .filter(|items| items.len() == 2)
                        .and_then(|items| Some([items[0].as_f64()?, items[1].as_f64()?]))
                        .ok_or_else(|| invalid(key, value))?;
                    custom.flip = Some(flip);
                }
                Some("disableNoteGravity") => custom.note_gravity = Some(!flag(key, value)?),
                Some("disableNoteLook") => custom.note_look = Some(!flag(key, value)?),
                Some("spawnEffect") if dialect == Dialect::V3 => {
                    custom.spawn_effect = Some(flag(key, value)?);
                }
                Some("disableSpawnEffect") if dialect == Dialect::V2 => {
                    custom.spawn_effect = Some(!flag(key, value)?);
                }
                _ => {
                    custom.extra.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(custom)
    }
}

/// Common surface used by the difficulty to sort, optimize and write
/// object lists.
pub trait GameplayObject {
    /// Short entity name used in errors and logs.
    const ENTITY: &'static str;

    fn time(&self) -> f64;
    fn custom_data(&self) -> &ObjectCustomData;
    fn custom_data_mut(&mut self) -> &mut ObjectCustomData;
    fn to_json(&self, dialect: Dialect) -> Result<JsonValue>;

    /// Read one object written in `dialect`, custom data included.
    fn from_json(raw: &JsonValue, dialect: Dialect) -> Result<Self>
    where
        Self: Sized;

    fn animation_mut(&mut self) -> &mut Animation {
        &mut self.custom_data_mut().animation
    }

    fn set_track(&mut self, track: impl Into<String>) {
        self.custom_data_mut().track = Some(track.into());
    }

    /// Decimate the object's animation in place.
    fn optimize(&mut self, settings: &OptimizeSettings) -> Result<()> {
        let custom = self.custom_data_mut();
        custom.animation = custom.animation.optimized(settings)?;
        Ok(())
    }
}

fn finish(mut map: Object, dialect: Dialect, custom: &ObjectCustomData) -> JsonValue {
    attach_custom_data(&mut map, dialect, custom.write(dialect), &custom.extra);
    JsonValue::Object(map)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Note {
    pub time: f64,
    pub x: i64,
    pub y: i64,
    pub color: NoteColor,
    pub direction: CutDirection,
    pub angle_offset: f64,
    pub custom: ObjectCustomData,
}

impl Note {
    pub fn new(time: f64, color: NoteColor, direction: CutDirection, x: i64, y: i64) -> Self {
        Self {
            time,
            x,
            y,
            color,
            direction,
            ..Self::default()
        }
    }
}

impl GameplayObject for Note {
    const ENTITY: &'static str = "note";

    fn time(&self) -> f64 {
        self.time
    }

    fn custom_data(&self) -> &ObjectCustomData {
        &self.custom
    }

    fn custom_data_mut(&mut self) -> &mut ObjectCustomData {
        &mut self.custom
    }

    fn from_json(raw: &JsonValue, dialect: Dialect) -> Result<Self> {
        let f = Fields::new(raw, Self::ENTITY)?;
        let color = |key| f.code(key, NoteColor::default(), NoteColor::from_code);
        let direction = |key| f.code(key, CutDirection::default(), CutDirection::from_code);
        let note = match dialect {
            Dialect::V3 => Self {
                time: f.f64("b")?,
                x: f.i64_or("x", 0)?,
                y: f.i64_or("y", 0)?,
                color: color("c")?,
                direction: direction("d")?,
                angle_offset: f.f64_or("a", 0.0)?,
                custom: ObjectCustomData::read(raw, dialect, Self::ENTITY)?,
            },
            Dialect::V2 => Self {
                time: f.f64("_time")?,
                x: f.i64_or("_lineIndex", 0)?,
                y: f.i64_or("_lineLayer", 0)?,
                color: color("_type")?,
                direction: direction("_cutDirection")?,
                angle_offset: 0.0,
                custom: ObjectCustomData::read(raw, dialect, Self::ENTITY)?,
            },
        };
        Ok(note)
    }

    fn to_json(&self, dialect: Dialect) -> Result<JsonValue> {
        let mut map = Object::new();
        match dialect {
            Dialect::V3 => {
                put_num(&mut map, "b", self.time);
                map.insert("x".into(), self.x.into());
                map.insert("y".into(), self.y.into());
                map.insert("c".into(), (self.color as i64).into());
                map.insert("d".into(), (self.direction as i64).into());
                put_num(&mut map, "a", self.angle_offset);
            }
            Dialect::V2 => {
                put_num(&mut map, "_time", self.time);
                map.insert("_lineIndex".into(), self.x.into());
                map.insert("_lineLayer".into(), self.y.into());
                map.insert("_type".into(), (self.color as i64).into());
                map.insert("_cutDirection".into(), (self.direction as i64).into());
            }
        }
        Ok(finish(map, dialect, &self.custom))
    }
}

/// v2 note type used for bombs.
pub(crate) const V2_BOMB_TYPE: i64 = 3;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bomb {
    pub time: f64,
    pub x: i64,
    pub y: i64,
    pub custom: ObjectCustomData,
}

impl Bomb {
    pub fn new(time: f64, x: i64, y: i64) -> Self {
        Self {
            time,
            x,
            y,
            custom: ObjectCustomData::default(),
        }
    }
}

impl GameplayObject for Bomb {
    const ENTITY: &'static str = "bomb";

    fn time(&self) -> f64 {
        self.time
    }

    fn custom_data(&self) -> &ObjectCustomData {
        &self.custom
    }

    fn custom_data_mut(&mut self) -> &mut ObjectCustomData {
        &mut self.custom
    }

    fn from_json(raw: &JsonValue, dialect: Dialect) -> Result<Self> {
        let f = Fields::new(raw, Self::ENTITY)?;
        let (time, x, y) = match dialect {
            Dialect::V3 => (f.f64("b")?, f.i64_or("x", 0)?, f.i64_or("y", 0)?),
            Dialect::V2 => {
                f.code("_type", V2_BOMB_TYPE, |t| (t == V2_BOMB_TYPE).then_some(t))?;
                (
                    f.f64("_time")?,
                    f.i64_or("_lineIndex", 0)?,
                    f.i64_or("_lineLayer", 0)?,
                )
            }
        };
        Ok(Self {
            time,
            x,
            y,
            custom: ObjectCustomData::read(raw, dialect, Self::ENTITY)?,
        })
    }

    fn to_json(&self, dialect: Dialect) -> Result<JsonValue> {
        let mut map = Object::new();
        match dialect {
            Dialect::V3 => {
                put_num(&mut map, "b", self.time);
                map.insert("x".into(), self.x.into());
                map.insert("y".into(), self.y.into());
            }
            Dialect::V2 => {
                put_num(&mut map, "_time", self.time);
                map.insert("_lineIndex".into(), self.x.into());
                map.insert("_lineLayer".into(), self.y.into());
                map.insert("_type".into(), V2_BOMB_TYPE.into());
                map.insert("_cutDirection".into(), 0.into());
            }
        }
        Ok(finish(map, dialect, &self.custom))
    }
}

/// v2 wall types: full height from the floor, or a crouch wall from layer 2.
const V2_FULL_WALL: i64 = 0;
const V2_CROUCH_WALL: i64 = 1;

/// Obstacle spanning `width` lanes and `height` layers for `duration` beats.
///
/// v2 only knows full-height and crouch walls; other shapes are written as
/// whichever of the two starts nearer (`y >= 2` is a crouch wall).
#[derive(Clone, Debug, PartialEq)]
pub struct Wall {
    pub time: f64,
    pub x: i64,
    pub y: i64,
    pub duration: f64,
    pub width: i64,
    pub height: i64,
    pub custom: ObjectCustomData,
}

impl Default for Wall {
    fn default() -> Self {
        Self {
            time: 0.0,
            x: 0,
            y: 0,
            duration: 1.0,
            width: 1,
            height: 5,
            custom: ObjectCustomData::default(),
        }
    }
}

impl Wall {
    pub fn new(time: f64, duration: f64, x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            time,
            x,
            y,
            duration,
            width,
            height,
            custom: ObjectCustomData::default(),
        }
    }
}

impl GameplayObject for Wall {
    const ENTITY: &'static str = "wall";

    fn time(&self) -> f64 {
        self.time
    }

    fn custom_data(&self) -> &ObjectCustomData {
        &self.custom
    }

    fn custom_data_mut(&mut self) -> &mut ObjectCustomData {
        &mut self.custom
    }

    fn from_json(raw: &JsonValue, dialect: Dialect) -> Result<Self> {
        let f = Fields::new(raw, Self::ENTITY)?;
        let custom = ObjectCustomData::read(raw, dialect, Self::ENTITY)?;
        match dialect {
            Dialect::V3 => Ok(Self {
                time: f.f64("b")?,
                x: f.i64_or("x", 0)?,
                y: f.i64_or("y", 0)?,
                duration: f.f64_or("d", 0.0)?,
                width: f.i64_or("w", 1)?,
                height: f.i64_or("h", 5)?,
                custom,
            }),
            Dialect::V2 => {
                let (y, height) = match f.i64_or("_type", V2_FULL_WALL)? {
                    V2_FULL_WALL => (0, 5),
                    V2_CROUCH_WALL => (2, 3),
                    other => {
                        return Err(MapError::InvalidField {
                            entity: Self::ENTITY.into(),
                            field: "_type".into(),
                            value: other.to_string(),
                        })
                    }
                };
                Ok(Self {
                    time: f.f64("_time")?,
                    x: f.i64_or("_lineIndex", 0)?,
                    y,
                    duration: f.f64_or("_duration", 0.0)?,
                    width: f.i64_or("_width", 1)?,
                    height,
                    custom,
                })
            }
        }
    }

    fn to_json(&self, dialect: Dialect) -> Result<JsonValue> {
        let mut map = Object::new();
        match dialect {
            Dialect::V3 => {
                put_num(&mut map, "b", self.time);
                map.insert("x".into(), self.x.into());
                map.insert("y".into(), self.y.into());
                put_num(&mut map, "d", self.duration);
                map.insert("w".into(), self.width.into());
                map.insert("h".into(), self.height.into());
            }
            Dialect::V2 => {
                let kind = if self.y >= 2 {
                    V2_CROUCH_WALL
                } else {
                    V2_FULL_WALL
                };
                put_num(&mut map, "_time", self.time);
                map.insert("_lineIndex".into(), self.x.into());
                map.insert("_type".into(), kind.into());
                put_num(&mut map, "_duration", self.duration);
                map.insert("_width".into(), self.width.into());
            }
        }
        Ok(finish(map, dialect, &self.custom))
    }
}

/// Burst slider: a head note followed by `links` segments. v3 only.
#[derive(Clone, Debug, PartialEq)]
pub struct Chain {
    pub time: f64,
    pub color: NoteColor,
    pub x: i64,
    pub y: i64,
    pub direction: CutDirection,
    pub tail_time: f64,
    pub tail_x: i64,
    pub tail_y: i64,
    pub links: u32,
    pub squish: f64,
    pub custom: ObjectCustomData,
}

impl Default for Chain {
    fn default() -> Self {
        Self {
            time: 0.0,
            color: NoteColor::Blue,
            x: 0,
            y: 0,
            direction: CutDirection::Down,
            tail_time: 0.0,
            tail_x: 0,
            tail_y: 0,
            links: 4,
            squish: 1.0,
            custom: ObjectCustomData::default(),
        }
    }
}

impl Chain {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        time: f64,
        color: NoteColor,
        x: i64,
        y: i64,
        tail_time: f64,
        tail_x: i64,
        tail_y: i64,
        direction: CutDirection,
        links: u32,
    ) -> Self {
        Self {
            time,
            color,
            x,
            y,
            direction,
            tail_time,
            tail_x,
            tail_y,
            links,
            ..Self::default()
        }
    }
}

impl GameplayObject for Chain {
    const ENTITY: &'static str = "chain";

    fn time(&self) -> f64 {
        self.time
    }

    fn custom_data(&self) -> &ObjectCustomData {
        &self.custom
    }

    fn custom_data_mut(&mut self) -> &mut ObjectCustomData {
        &mut self.custom
    }

    fn from_json(raw: &JsonValue, dialect: Dialect) -> Result<Self> {
        if dialect == Dialect::V2 {
            return Err(MapError::UnsupportedInDialect {
                entity: Self::ENTITY,
                dialect,
            });
        }
        let f = Fields::new(raw, Self::ENTITY)?;
        let defaults = Self::default();
        Ok(Self {
            time: f.f64("b")?,
            color: f.code("c", defaults.color, NoteColor::from_code)?,
            x: f.i64_or("x", 0)?,
            y: f.i64_or("y", 0)?,
            direction: f.code("d", defaults.direction, CutDirection::from_code)?,
            tail_time: f.f64("tb")?,
            tail_x: f.i64_or("tx", 0)?,
            tail_y: f.i64_or("ty", 0)?,
            links: f.code("sc", defaults.links, |n| u32::try_from(n).ok())?,
            squish: f.f64_or("s", defaults.squish)?,
            custom: ObjectCustomData::read(raw, dialect, Self::ENTITY)?,
        })
    }

    fn to_json(&self, dialect: Dialect) -> Result<JsonValue> {
        if dialect == Dialect::V2 {
            return Err(MapError::UnsupportedInDialect {
                entity: Self::ENTITY,
                dialect,
            });
        }
        let mut map = Object::new();
        put_num(&mut map, "b", self.time);
        map.insert("x".into(), self.x.into());
        map.insert("y".into(), self.y.into());
        map.insert("c".into(), (self.color as i64).into());
        map.insert("d".into(), (self.direction as i64).into());
        put_num(&mut map, "tb", self.tail_time);
        map.insert("tx".into(), self.tail_x.into());
        map.insert("ty".into(), self.tail_y.into());
        map.insert("sc".into(), self.links.into());
        put_num(&mut map, "s", self.squish);
        Ok(finish(map, dialect, &self.custom))
    }
}

/// Arc (slider) between a head and a tail position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arc {
    pub time: f64,
    pub color: NoteColor,
    pub x: i64,
    pub y: i64,
    pub head_direction: CutDirection,
    pub head_length: f64,
    pub tail_time: f64,
    pub tail_x: i64,
    pub tail_y: i64,
    pub tail_direction: CutDirection,
    pub tail_length: f64,
    pub anchor_mode: AnchorMode,
    pub custom: ObjectCustomData,
}

impl Arc {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        time: f64,
        color: NoteColor,
        x: i64,
        y: i64,
        head_direction: CutDirection,
        tail_time: f64,
        tail_x: i64,
        tail_y: i64,
        tail_direction: CutDirection,
    ) -> Self {
        Self {
            time,
            color,
            x,
            y,
            head_direction,
            tail_time,
            tail_x,
            tail_y,
            tail_direction,
            ..Self::default()
        }
    }
}

impl GameplayObject for Arc {
    const ENTITY: &'static str = "arc";

    fn time(&self) -> f64 {
        self.time
    }

    fn custom_data(&self) -> &ObjectCustomData {
        &self.custom
    }

    fn custom_data_mut(&mut self) -> &mut ObjectCustomData {
        &mut self.custom
    }

    fn from_json(raw: &JsonValue, dialect: Dialect) -> Result<Self> {
        let f = Fields::new(raw, Self::ENTITY)?;
        let direction = |key| f.code(key, CutDirection::default(), CutDirection::from_code);
        let arc = match dialect {
            Dialect::V3 => Self {
                time: f.f64("b")?,
                color: f.code("c", NoteColor::default(), NoteColor::from_code)?,
                x: f.i64_or("x", 0)?,
                y: f.i64_or("y", 0)?,
                head_direction: direction("d")?,
                head_length: f.f64_or("mu", 0.0)?,
                tail_time: f.f64("tb")?,
                tail_x: f.i64_or("tx", 0)?,
                tail_y: f.i64_or("ty", 0)?,
                tail_direction: direction("tc")?,
                tail_length: f.f64_or("tmu", 0.0)?,
                anchor_mode: f.code("m", AnchorMode::default(), AnchorMode::from_code)?,
                custom: ObjectCustomData::read(raw, dialect, Self::ENTITY)?,
            },
            Dialect::V2 => Self {
                time: f.f64("_headTime")?,
                color: f.code("_colorType", NoteColor::default(), NoteColor::from_code)?,
                x: f.i64_or("_headLineIndex", 0)?,
                y: f.i64_or("_headLineLayer", 0)?,
                head_direction: direction("_headCutDirection")?,
                head_length: f.f64_or("_headControlPointLengthMultiplier", 0.0)?,
                tail_time: f.f64("_tailTime")?,
                tail_x: f.i64_or("_tailLineIndex", 0)?,
                tail_y: f.i64_or("_tailLineLayer", 0)?,
                tail_direction: direction("_tailCutDirection")?,
                tail_length: f.f64_or("_tailControlPointLengthMultiplier", 0.0)?,
                anchor_mode: f.code(
                    "_sliderMidAnchorMode",
                    AnchorMode::default(),
                    AnchorMode::from_code,
                )?,
                custom: ObjectCustomData::read(raw, dialect, Self::ENTITY)?,
            },
        };
        Ok(arc)
    }

    fn to_json(&self, dialect: Dialect) -> Result<JsonValue> {
        let mut map = Object::new();
        match dialect {
            Dialect::V3 => {
                put_num(&mut map, "b", self.time);
                map.insert("c".into(), (self.color as i64).into());
                map.insert("x".into(), self.x.into());
                map.insert("y".into(), self.y.into());
                map.insert("d".into(), (self.head_direction as i64).into());
                put_num(&mut map, "mu", self.head_length);
                put_num(&mut map, "tb", self.tail_time);
                map.insert("tx".into(), self.tail_x.into());
                map.insert("ty".into(), self.tail_y.into());
                map.insert("tc".into(), (self.tail_direction as i64).into());
                put_num(&mut map, "tmu", self.tail_length);
                map.insert("m".into(), (self.anchor_mode as i64).into());
            }
            Dialect::V2 => {
                map.insert("_colorType".into(), (self.color as i64).into());
                put_num(&mut map, "_headTime", self.time);
                map.insert("_headLineIndex".into(), self.x.into());
                map.insert("_headLineLayer".into(), self.y.into());
                map.insert(
                    "_headCutDirection".into(),
                    (self.head_direction as i64).into(),
                );
                put_num(
                    &mut map,
                    "_headControlPointLengthMultiplier",
                    self.head_length,
                );
                put_num(&mut map, "_tailTime", self.tail_time);
                map.insert("_tailLineIndex".into(), self.tail_x.into());
                map.insert("_tailLineLayer".into(), self.tail_y.into());
                map.insert(
                    "_tailCutDirection".into(),
                    (self.tail_direction as i64).into(),
                );
                put_num(
                    &mut map,
                    "_tailControlPointLengthMultiplier",
                    self.tail_length,
                );
                map.insert(
                    "_sliderMidAnchorMode".into(),
                    (self.anchor_mode as i64).into(),
                );
            }
        }
        Ok(finish(map, dialect, &self.custom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remap_animation_core::{AnimatedProperty, Property};
    use serde_json::json;

    #[test]
    fn note_fields_per_dialect() {
        let mut note = Note::new(4.0, NoteColor::Red, CutDirection::Left, 1, 2);
        note.set_track("notes");
        note.custom.note_gravity = Some(false);
        note.custom.spawn_effect = Some(false);

        assert_eq!(
            note.to_json(Dialect::V3).unwrap(),
            json!({
                "b": 4, "x": 1, "y": 2, "c": 0, "d": 2, "a": 0,
                "customData": { "track": "notes", "disableNoteGravity": true, "spawnEffect": false }
            })
        );
        assert_eq!(
            note.to_json(Dialect::V2).unwrap(),
            json!({
                "_time": 4, "_lineIndex": 1, "_lineLayer": 2, "_type": 0, "_cutDirection": 2,
                "_customData": {
                    "_track": "notes",
                    "_disableNoteGravity": true,
                    "_disableSpawnEffect": true
                }
            })
        );
    }

    #[test]
    fn animation_is_written_with_dialect_keys() {
        let mut bomb = Bomb::new(1.0, 0, 0);
        bomb.animation_mut().set(Property::Dissolve, 0.5).unwrap();
        assert_eq!(
            bomb.to_json(Dialect::V2).unwrap()["_customData"]["_animation"],
            json!({ "_dissolve": [0.5] })
        );
        assert_eq!(bomb.to_json(Dialect::V2).unwrap()["_type"], json!(3));
    }

    #[test]
    fn chains_have_no_v2_form() {
        let chain = Chain::new(1.0, NoteColor::Blue, 0, 0, 1.5, 1, 1, CutDirection::Down, 5);
        let err = chain.to_json(Dialect::V2).unwrap_err();
        assert!(matches!(err, MapError::UnsupportedInDialect { entity: "chain", .. }));
        let v3 = chain.to_json(Dialect::V3).unwrap();
        assert_eq!(v3["sc"], json!(5));
        assert_eq!(v3["tb"], json!(1.5));
        assert!(v3.get("customData").is_none());
    }

    #[test]
    fn arcs_map_to_v2_sliders() {
        let arc = Arc::new(
            2.0,
            NoteColor::Blue,
            1,
            0,
            CutDirection::Up,
            3.0,
            2,
            2,
            CutDirection::Down,
        );
        let v2 = arc.to_json(Dialect::V2).unwrap();
        assert_eq!(v2["_headTime"], json!(2));
        assert_eq!(v2["_tailCutDirection"], json!(1));
        assert_eq!(v2["_sliderMidAnchorMode"], json!(0));
        let v3 = arc.to_json(Dialect::V3).unwrap();
        assert_eq!(v3["tc"], json!(1));
        assert_eq!(v3["d"], json!(0));
    }

    fn animated() -> ObjectCustomData {
        let mut custom = ObjectCustomData {
            track: Some("objects".into()),
            flip: Some([1.0, 0.5]),
            note_look: Some(false),
            spawn_effect: Some(false),
            ..ObjectCustomData::default()
        };
        custom
            .animation
            .set(
                Property::Dissolve,
                AnimatedProperty::from_json(&json!([[0, 0], [1, 0.5, "easeOutQuad"]]), Some(1))
                    .unwrap(),
            )
            .unwrap();
        custom.extra.insert("color".into(), json!([1, 0, 0, 1]));
        custom
    }

    fn read_back<T: GameplayObject + PartialEq + std::fmt::Debug>(object: &T, dialect: Dialect) {
        let written = object.to_json(dialect).unwrap();
        let back = T::from_json(&written, dialect).unwrap();
        assert_eq!(&back, object, "{dialect:?}: {written}");
    }

    #[test]
    fn objects_read_back_what_they_write() {
        let mut note = Note::new(4.5, NoteColor::Red, CutDirection::UpLeft, 3, 1);
        note.custom = animated();
        let mut bomb = Bomb::new(2.0, 1, 2);
        bomb.custom = animated();
        let mut arc = Arc::new(
            1.0,
            NoteColor::Red,
            0,
            1,
            CutDirection::Right,
            2.5,
            3,
            2,
            CutDirection::Dot,
        );
        arc.head_length = 0.75;
        arc.anchor_mode = AnchorMode::Clockwise;
        arc.custom = animated();
        let mut crouch = Wall::new(8.0, 2.5, 1, 2, 2, 3);
        crouch.custom = animated();

        for dialect in [Dialect::V2, Dialect::V3] {
            read_back(&note, dialect);
            read_back(&bomb, dialect);
            read_back(&arc, dialect);
            read_back(&crouch, dialect);
            read_back(&Wall::new(0.0, 1.0, 0, 0, 1, 5), dialect);
        }

        note.angle_offset = 45.0;
        read_back(&note, Dialect::V3);
        let mut chain = Chain::new(1.0, NoteColor::Red, 1, 0, 1.25, 2, 2, CutDirection::Left, 7);
        chain.squish = 0.5;
        chain.custom = animated();
        read_back(&chain, Dialect::V3);
        let err = Chain::from_json(&json!({ "b": 1 }), Dialect::V2).unwrap_err();
        assert_eq!(err.category(), "dialect");
    }

    #[test]
    fn walls_fold_to_v2_types() {
        let odd = Wall::new(3.0, 1.0, 0, 1, 4, 2);
        let v2 = odd.to_json(Dialect::V2).unwrap();
        assert_eq!(
            v2,
            json!({ "_time": 3, "_lineIndex": 0, "_type": 0, "_duration": 1, "_width": 4 })
        );
        let v3 = odd.to_json(Dialect::V3).unwrap();
        assert_eq!(v3, json!({ "b": 3, "x": 0, "y": 1, "d": 1, "w": 4, "h": 2 }));
        let err = Wall::from_json(&json!({ "_time": 0, "_type": 2 }), Dialect::V2).unwrap_err();
        assert!(matches!(err, MapError::InvalidField { ref field, .. } if field == "_type"));
    }

    #[test]
    fn reading_rejects_bad_codes_and_missing_times() {
        let err = Note::from_json(&json!({ "b": 1, "c": 5 }), Dialect::V3).unwrap_err();
        assert!(matches!(err, MapError::InvalidField { ref field, .. } if field == "c"));
        let err = Note::from_json(&json!({ "x": 1 }), Dialect::V3).unwrap_err();
        assert!(matches!(err, MapError::MissingField { .. }));
        let err = Bomb::from_json(&json!({ "_time": 1, "_type": 0 }), Dialect::V2).unwrap_err();
        assert_eq!(err.category(), "parse");
        let err = Note::from_json(
            &json!({ "b": 1, "customData": { "disableNoteGravity": "yes" } }),
            Dialect::V3,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MapError::InvalidField { ref field, .. } if field == "disableNoteGravity"
        ));
    }
}
