//! Environment objects and the group/track animation helpers.

use remap_animation_core::{
    combine_resolved, optimize_property, AnimatedProperty, Animation, AnimationError, Dialect,
    Ease, OptimizeSettings, Property,
};
use serde_json::{Map, Value as JsonValue};

use crate::custom_event::CustomEvent;
use crate::difficulty::Difficulty;
use crate::error::MapError;
use crate::wire::{get_bool, get_i64, get_nums, get_str, put_opt, put_opt_nums, Object};
use crate::Result;

const ENTITY: &str = "environment";
const LIGHT_COMPONENT: &str = "ILightWithId";

/// How an environment `id` is matched against scene object names.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LookupMethod {
    #[default]
    Contains,
    Regex,
    Exact,
    StartsWith,
    EndsWith,
}

impl LookupMethod {
    pub fn name(self) -> &'static str {
        match self {
            LookupMethod::Contains => "Contains",
            LookupMethod::Regex => "Regex",
            LookupMethod::Exact => "Exact",
            LookupMethod::StartsWith => "StartsWith",
            LookupMethod::EndsWith => "EndsWith",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Contains" => Some(LookupMethod::Contains),
            "Regex" => Some(LookupMethod::Regex),
            "Exact" => Some(LookupMethod::Exact),
            "StartsWith" => Some(LookupMethod::StartsWith),
            "EndsWith" => Some(LookupMethod::EndsWith),
            _ => None,
        }
    }
}

/// Primitive mesh of a geometry object.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum GeometryType {
    Sphere,
    Capsule,
    Cylinder,
    #[default]
    Cube,
    Plane,
    Quad,
    Triangle,
}

impl GeometryType {
    pub fn name(self) -> &'static str {
        match self {
            GeometryType::Sphere => "Sphere",
            GeometryType::Capsule => "Capsule",
            GeometryType::Cylinder => "Cylinder",
            GeometryType::Cube => "Cube",
            GeometryType::Plane => "Plane",
            GeometryType::Quad => "Quad",
            GeometryType::Triangle => "Triangle",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Sphere" => Some(GeometryType::Sphere),
            "Capsule" => Some(GeometryType::Capsule),
            "Cylinder" => Some(GeometryType::Cylinder),
            "Cube" => Some(GeometryType::Cube),
            "Plane" => Some(GeometryType::Plane),
            "Quad" => Some(GeometryType::Quad),
            "Triangle" => Some(GeometryType::Triangle),
            _ => None,
        }
    }
}

/// Inline material of a geometry object.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialDef {
    pub shader: String,
    pub color: Option<Vec<f64>>,
    pub track: Option<String>,
    pub shader_keywords: Option<Vec<String>>,
}

impl Default for MaterialDef {
    fn default() -> Self {
        Self {
            shader: "Standard".to_string(),
            color: None,
            track: None,
            shader_keywords: None,
        }
    }
}

/// Geometry material: a reference to a named material or an inline one.
#[derive(Clone, Debug, PartialEq)]
pub enum Material {
    Named(String),
    Inline(MaterialDef),
}

impl Default for Material {
    fn default() -> Self {
        Material::Inline(MaterialDef::default())
    }
}

impl Material {
    fn to_json(&self, dialect: Dialect) -> JsonValue {
        match self {
            Material::Named(name) => JsonValue::String(name.clone()),
            Material::Inline(def) => {
                let mut map = Object::new();
                map.insert(dialect.key("shader"), def.shader.clone().into());
                put_opt_nums(&mut map, dialect.key("color"), def.color.as_deref());
                put_opt(&mut map, dialect.key("track"), def.track.clone());
                put_opt(
                    &mut map,
                    dialect.key("shaderKeywords"),
                    def.shader_keywords.clone(),
                );
                JsonValue::Object(map)
            }
        }
    }

    fn from_json(raw: &JsonValue, dialect: Dialect) -> Result<Self> {
        match raw {
            JsonValue::String(name) => Ok(Material::Named(name.clone())),
            JsonValue::Object(_) => Ok(Material::Inline(MaterialDef {
                shader: get_str(raw, &dialect.key("shader"))
                    .unwrap_or("Standard")
                    .to_string(),
                color: get_nums(raw, &dialect.key("color")),
                track: get_str(raw, &dialect.key("track")).map(str::to_string),
                shader_keywords: raw
                    .get(dialect.key("shaderKeywords"))
                    .and_then(JsonValue::as_array)
                    .map(|k| {
                        k.iter()
                            .filter_map(|s| s.as_str().map(str::to_string))
                            .collect()
                    }),
            })),
            other => Err(MapError::InvalidField {
                entity: ENTITY.into(),
                field: dialect.key("material"),
                value: other.to_string(),
            }),
        }
    }
}

/// What an environment entry targets: existing scene objects or new geometry.
#[derive(Clone, Debug, PartialEq)]
pub enum EnvironmentKind {
    Environment {
        id: String,
        lookup_method: LookupMethod,
    },
    Geometry {
        geometry_type: GeometryType,
        material: Material,
        collision: Option<bool>,
    },
}

/// One environment enhancement entry.
#[derive(Clone, Debug, PartialEq)]
pub struct EnvironmentObject {
    pub kind: EnvironmentKind,
    pub duplicate: Option<u32>,
    pub active: Option<bool>,
    pub position: Option<AnimatedProperty>,
    pub local_position: Option<AnimatedProperty>,
    pub rotation: Option<AnimatedProperty>,
    pub local_rotation: Option<AnimatedProperty>,
    pub scale: Option<AnimatedProperty>,
    pub track: Option<String>,
    /// Authoring-only grouping used by [`animate_env_group`]; never written.
    pub group: Option<String>,
    pub light_id: Option<i64>,
    pub light_type: Option<i64>,
    /// v3 components other than `ILightWithId` (fog, bloom, tube lights),
    /// written verbatim.
    pub components: Map<String, JsonValue>,
}

/// Transform channels an environment object carries, in output order.
const TRANSFORMS: [Property; 5] = [
    Property::Scale,
    Property::Position,
    Property::LocalPosition,
    Property::Rotation,
    Property::LocalRotation,
];

impl EnvironmentObject {
    fn with_kind(kind: EnvironmentKind) -> Self {
        Self {
            kind,
            duplicate: None,
            active: None,
            position: None,
            local_position: None,
            rotation: None,
            local_rotation: None,
            scale: None,
            track: None,
            group: None,
            light_id: None,
            light_type: None,
            components: Map::new(),
        }
    }

    /// Target existing scene objects whose name matches `id`.
    pub fn environment(id: impl Into<String>, lookup_method: LookupMethod) -> Self {
        Self::with_kind(EnvironmentKind::Environment {
            id: id.into(),
            lookup_method,
        })
    }

    /// Spawn a primitive.
    pub fn geometry(geometry_type: GeometryType, material: Material) -> Self {
        Self::with_kind(EnvironmentKind::Geometry {
            geometry_type,
            material,
            collision: None,
        })
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_track(mut self, track: impl Into<String>) -> Self {
        self.track = Some(track.into());
        self
    }

    pub fn transform(&self, property: &Property) -> Option<&AnimatedProperty> {
        match property {
            Property::Position => self.position.as_ref(),
            Property::LocalPosition => self.local_position.as_ref(),
            Property::Rotation => self.rotation.as_ref(),
            Property::LocalRotation => self.local_rotation.as_ref(),
            Property::Scale => self.scale.as_ref(),
            _ => None,
        }
    }

    fn transform_slot(
        &mut self,
        property: &Property,
    ) -> Option<&mut Option<AnimatedProperty>> {
        match property {
            Property::Position => Some(&mut self.position),
            Property::LocalPosition => Some(&mut self.local_position),
            Property::Rotation => Some(&mut self.rotation),
            Property::LocalRotation => Some(&mut self.local_rotation),
            Property::Scale => Some(&mut self.scale),
            _ => None,
        }
    }

    /// Assign a transform channel. Only position, local position, rotation,
    /// local rotation and scale exist on environment objects.
    pub fn set_transform(
        &mut self,
        property: Property,
        value: impl Into<AnimatedProperty>,
    ) -> Result<()> {
        let value = value.into();
        if let Some(actual) = value.arity().filter(|n| *n != 3) {
            return Err(AnimationError::ArityMismatch {
                property: property.name().to_string(),
                expected: 3,
                actual,
            }
            .into());
        }
        match self.transform_slot(&property) {
            Some(slot) => {
                *slot = Some(value);
                Ok(())
            }
            None => Err(MapError::UnsupportedProperty {
                entity: ENTITY,
                property: property.name().to_string(),
            }),
        }
    }

    /// Id or geometry type, for logs.
    fn describe(&self) -> &str {
        match &self.kind {
            EnvironmentKind::Environment { id, .. } => id.as_str(),
            EnvironmentKind::Geometry { geometry_type, .. } => geometry_type.name(),
        }
    }

    /// Decimate animated transforms in place.
    pub fn optimize(&mut self, settings: &OptimizeSettings) -> Result<()> {
        for property in TRANSFORMS {
            if let Some(Some(value)) = self.transform_slot(&property) {
                *value = optimize_property(value, settings)?;
            }
        }
        Ok(())
    }

    pub fn to_json(&self, dialect: Dialect) -> JsonValue {
        let mut map = Object::new();
        match &self.kind {
            EnvironmentKind::Environment { id, lookup_method } => {
                map.insert(dialect.key("id"), id.clone().into());
                map.insert(dialect.key("lookupMethod"), lookup_method.name().into());
            }
            EnvironmentKind::Geometry {
                geometry_type,
                material,
                collision,
            } => {
                let mut geometry = Object::new();
                geometry.insert(dialect.key("type"), geometry_type.name().into());
                geometry.insert(dialect.key("material"), material.to_json(dialect));
                put_opt(&mut geometry, dialect.key("collision"), *collision);
                map.insert(dialect.key("geometry"), JsonValue::Object(geometry));
            }
        }
        put_opt(&mut map, dialect.key("duplicate"), self.duplicate);
        put_opt(&mut map, dialect.key("active"), self.active);
        for property in TRANSFORMS {
            if let Some(value) = self.transform(&property) {
                map.insert(dialect.key(property.name()), value.to_json());
            }
        }
        put_opt(&mut map, dialect.key("track"), self.track.clone());

        match dialect {
            Dialect::V3 => {
                let mut components = self.components.clone();
                if self.light_id.is_some() || self.light_type.is_some() {
                    let mut light = Object::new();
                    put_opt(&mut light, "lightID", self.light_id);
                    put_opt(&mut light, "type", self.light_type);
                    components.insert(LIGHT_COMPONENT.into(), JsonValue::Object(light));
                }
                if !components.is_empty() {
                    map.insert("components".into(), JsonValue::Object(components));
                }
            }
            Dialect::V2 => {
                put_opt(&mut map, "_lightID", self.light_id);
                if self.light_type.is_some() || !self.components.is_empty() {
                    log::warn!(
                        "environment '{}': light type and components have no v2 form, dropped",
                        self.describe()
                    );
                }
            }
        }
        JsonValue::Object(map)
    }

    /// Read one environment entry written in `dialect`.
    pub fn from_json(raw: &JsonValue, dialect: Dialect) -> Result<Self> {
        let kind = if let Some(id) = get_str(raw, &dialect.key("id")) {
            let lookup_method = match get_str(raw, &dialect.key("lookupMethod")) {
                None => LookupMethod::default(),
                Some(name) => {
                    LookupMethod::from_name(name).ok_or_else(|| MapError::InvalidField {
                        entity: ENTITY.into(),
                        field: dialect.key("lookupMethod"),
                        value: name.to_string(),
                    })?
                }
            };
            EnvironmentKind::Environment {
                id: id.to_string(),
                lookup_method,
            }
        } else if let Some(geometry) = raw.get(dialect.key("geometry")) {
            let type_key = dialect.key("type");
            let name = get_str(geometry, &type_key)
                .ok_or_else(|| MapError::missing(ENTITY, &type_key))?;
            let geometry_type =
                GeometryType::from_name(name).ok_or_else(|| MapError::InvalidField {
                    entity: ENTITY.into(),
                    field: type_key.clone(),
                    value: name.to_string(),
                })?;
            let material = match geometry.get(dialect.key("material")) {
                Some(m) => Material::from_json(m, dialect)?,
                None => Material::default(),
            };
            EnvironmentKind::Geometry {
                geometry_type,
                material,
                collision: get_bool(geometry, &dialect.key("collision")),
            }
        } else {
            return Err(MapError::missing(ENTITY, dialect.key("id")));
        };

        let mut object = Self::with_kind(kind);
        object.duplicate =
            get_i64(raw, &dialect.key("duplicate")).and_then(|d| u32::try_from(d).ok());
        object.active = get_bool(raw, &dialect.key("active"));
        object.track = get_str(raw, &dialect.key("track")).map(str::to_string);
        for property in TRANSFORMS {
            if let Some(value) = raw.get(dialect.key(property.name())) {
                let parsed = AnimatedProperty::from_json(value, property.arity())?;
                object.set_transform(property, parsed)?;
            }
        }
        match dialect {
            Dialect::V3 => {
                if let Some(components) = raw.get("components").and_then(JsonValue::as_object) {
                    for (name, component) in components {
                        if name == LIGHT_COMPONENT {
                            object.light_id = get_i64(component, "lightID");
                            object.light_type = get_i64(component, "type");
                        } else {
                            object.components.insert(name.clone(), component.clone());
                        }
                    }
                }
            }
            Dialect::V2 => object.light_id = get_i64(raw, "_lightID"),
        }
        Ok(object)
    }
}

/// Push one `AnimateTrack` event per environment object in `group`.
///
/// Objects without a track get a generated one. `build` fills a fresh
/// animation for each object; every property it sets is combined with the
/// object's own value for that property (new keyframes first on ties).
/// On error the document is left untouched. Returns the number of events
/// pushed.
pub fn animate_env_group<F>(
    diff: &mut Difficulty,
    group: &str,
    time: f64,
    build: F,
    duration: Option<f64>,
    easing: Option<Ease>,
) -> Result<usize>
where
    F: FnMut(&mut Animation) -> Result<()>,
{
    let mut namer = diff.track_namer();
    let targets: Vec<(usize, String)> = diff
        .environment
        .iter()
        .enumerate()
        .filter(|(_, env)| env.group.as_deref() == Some(group))
        .map(|(i, env)| {
            let track = env.track.clone().unwrap_or_else(|| namer.next_name());
            (i, track)
        })
        .collect();
    let events = build_events(diff, &targets, time, build, duration, easing)?;

    diff.commit_track_namer(&namer);
    for (i, track) in targets {
        diff.environment[i].track.get_or_insert(track);
    }
    Ok(push_events(diff, events))
}

/// Like [`animate_env_group`] for objects already on `track`; no tracks are
/// assigned.
pub fn animate_env_track<F>(
    diff: &mut Difficulty,
    track: &str,
    time: f64,
    build: F,
    duration: Option<f64>,
    easing: Option<Ease>,
) -> Result<usize>
where
    F: FnMut(&mut Animation) -> Result<()>,
{
    let targets: Vec<(usize, String)> = diff
        .environment
        .iter()
        .enumerate()
        .filter(|(_, env)| env.track.as_deref() == Some(track))
        .map(|(i, _)| (i, track.to_string()))
        .collect();
    let events = build_events(diff, &targets, time, build, duration, easing)?;
    Ok(push_events(diff, events))
}

/// One event per `(environment index, track)` target; reads the document
/// only.
fn build_events<F>(
    diff: &Difficulty,
    targets: &[(usize, String)],
    time: f64,
    mut build: F,
    duration: Option<f64>,
    easing: Option<Ease>,
) -> Result<Vec<CustomEvent>>
where
    F: FnMut(&mut Animation) -> Result<()>,
{
    let mut events = Vec::with_capacity(targets.len());
    for (i, track) in targets {
        let env = &diff.environment[*i];
        let mut fresh = Animation::new();
        build(&mut fresh)?;

        let mut event = CustomEvent::animate_track(time, track.clone());
        event.duration = duration;
        event.easing = easing;
        for (property, value) in fresh.iter() {
            let merged = match env.transform(property) {
                Some(existing) => {
                    combine_resolved(value, existing, property, &diff.point_definitions)?
                }
                None => value.clone(),
            };
            event.animation.set(property.clone(), merged)?;
        }
        events.push(event.into());
    }
    Ok(events)
}

fn push_events(diff: &mut Difficulty, events: Vec<CustomEvent>) -> usize {
    let pushed = events.len();
    for event in events {
        diff.push_custom_event(event);
    }
    pushed
}
