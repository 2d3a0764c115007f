//! The difficulty document: everything one authoring session writes.

use std::borrow::Cow;

use hashbrown::HashSet;
use remap_animation_core::json::round_json;
use remap_animation_core::{
    optimize_property, AnimatedProperty, Dialect, OptimizeSettings, PointDefinitions,
};
use serde_json::Value as JsonValue;

use crate::config::SessionConfig;
use crate::custom_event::CustomEvent;
use crate::environment::EnvironmentObject;
use crate::error::MapError;
use crate::events::BasicEvent;
use crate::objects::{Arc, Bomb, Chain, GameplayObject, Note, Wall, V2_BOMB_TYPE};
use crate::wire::{detect_dialect, get_bool, get_i64, Object};
use crate::Result;

const V3_VERSION: &str = "3.2.0";
const V2_VERSION: &str = "2.6.0";

/// Append-only store of the authored content plus the session state that
/// goes with it (point definitions, generated track names, output config).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Difficulty {
    config: SessionConfig,
    pub notes: Vec<Note>,
    pub fake_notes: Vec<Note>,
    pub bombs: Vec<Bomb>,
    pub fake_bombs: Vec<Bomb>,
    pub walls: Vec<Wall>,
    pub fake_walls: Vec<Wall>,
    pub chains: Vec<Chain>,
    pub fake_chains: Vec<Chain>,
    pub arcs: Vec<Arc>,
    pub events: Vec<BasicEvent>,
    pub custom_events: Vec<CustomEvent>,
    pub environment: Vec<EnvironmentObject>,
    pub point_definitions: PointDefinitions,
    env_count: usize,
}

impl Difficulty {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn push_note(&mut self, note: Note) {
        self.notes.push(note);
    }

    pub fn push_fake_note(&mut self, note: Note) {
        self.fake_notes.push(note);
    }

    pub fn push_bomb(&mut self, bomb: Bomb) {
        self.bombs.push(bomb);
    }

    pub fn push_fake_bomb(&mut self, bomb: Bomb) {
        self.fake_bombs.push(bomb);
    }

    pub fn push_wall(&mut self, wall: Wall) {
        self.walls.push(wall);
    }

    pub fn push_fake_wall(&mut self, wall: Wall) {
        self.fake_walls.push(wall);
    }

    pub fn push_chain(&mut self, chain: Chain) {
        self.chains.push(chain);
    }

    pub fn push_fake_chain(&mut self, chain: Chain) {
        self.fake_chains.push(chain);
    }

    pub fn push_arc(&mut self, arc: Arc) {
        self.arcs.push(arc);
    }

    pub fn push_event(&mut self, event: impl Into<BasicEvent>) {
        self.events.push(event.into());
    }

    pub fn push_custom_event(&mut self, event: impl Into<CustomEvent>) {
        let event = event.into();
        log::debug!(
            "pushing {} custom event at {}",
            event.type_name(),
            event.time()
        );
        self.custom_events.push(event);
    }

    pub fn push_environment(&mut self, object: EnvironmentObject) {
        self.environment.push(object);
    }

    /// Register a point definition in this document's registry.
    pub fn define(
        &mut self,
        value: impl Into<AnimatedProperty>,
        name: impl Into<String>,
    ) -> Result<String> {
        Ok(self.point_definitions.define(value, name)?)
    }

    /// Next generated environment track name (`<prefix><n>`), skipping
    /// names already used anywhere in the document.
    pub fn next_env_track(&mut self) -> String {
        let mut namer = self.track_namer();
        let name = namer.next_name();
        self.commit_track_namer(&namer);
        name
    }

    /// Name generator seeded from the current counter and used tracks.
    /// Nothing changes until [`Difficulty::commit_track_namer`].
    pub(crate) fn track_namer(&self) -> TrackNamer {
        TrackNamer {
            prefix: self.config.env_track_prefix.clone(),
            count: self.env_count,
            used: self.used_tracks(),
            issued: Vec::new(),
        }
    }

    pub(crate) fn commit_track_namer(&mut self, namer: &TrackNamer) {
        for name in &namer.issued {
            log::debug!("generated environment track '{name}'");
        }
        self.env_count = namer.count;
    }

    fn used_tracks(&self) -> HashSet<String> {
        let objects = self
            .notes
            .iter()
            .chain(&self.fake_notes)
            .map(|n| n.custom_data())
            .chain(
                self.bombs
                    .iter()
                    .chain(&self.fake_bombs)
                    .map(|b| b.custom_data()),
            )
            .chain(
                self.walls
                    .iter()
                    .chain(&self.fake_walls)
                    .map(|w| w.custom_data()),
            )
            .chain(
                self.chains
                    .iter()
                    .chain(&self.fake_chains)
                    .map(|c| c.custom_data()),
            )
            .chain(self.arcs.iter().map(|a| a.custom_data()))
            .filter_map(|c| c.track.clone());
        let environment = self.environment.iter().filter_map(|e| e.track.clone());
        let events = self.custom_events.iter().map(|e| match e {
            CustomEvent::AnimateTrack(a) => a.track.clone(),
        });
        objects.chain(environment).chain(events).collect()
    }

    /// Serialize in the configured dialect, applying the configured
    /// optimizer and decimal precision.
    pub fn to_json(&self) -> Result<JsonValue> {
        let doc = match &self.config.optimize {
            Some(settings) => Cow::Owned(self.optimized(settings)?),
            None => Cow::Borrowed(self),
        };
        let mut out = match self.config.dialect {
            Dialect::V3 => doc.write_v3()?,
            Dialect::V2 => doc.write_v2()?,
        };
        if let Some(decimals) = self.config.decimal_precision {
            round_json(&mut out, decimals);
        }
        Ok(out)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_json()?)?)
    }

    /// Copy with every animated property decimated.
    pub fn optimized(&self, settings: &OptimizeSettings) -> Result<Self> {
        settings.validate()?;
        let mut doc = self.clone();
        optimize_all(&mut doc.notes, settings)?;
        optimize_all(&mut doc.fake_notes, settings)?;
        optimize_all(&mut doc.bombs, settings)?;
        optimize_all(&mut doc.fake_bombs, settings)?;
        optimize_all(&mut doc.walls, settings)?;
        optimize_all(&mut doc.fake_walls, settings)?;
        optimize_all(&mut doc.chains, settings)?;
        optimize_all(&mut doc.fake_chains, settings)?;
        optimize_all(&mut doc.arcs, settings)?;
        for event in &mut doc.custom_events {
            event.optimize(settings)?;
        }
        for env in &mut doc.environment {
            env.optimize(settings)?;
        }
        let mut definitions = PointDefinitions::new();
        for (name, value) in self.point_definitions.iter() {
            definitions.define(optimize_property(value, settings)?, name.clone())?;
        }
        doc.point_definitions = definitions;
        Ok(doc)
    }

    fn write_v3(&self) -> Result<JsonValue> {
        let dialect = Dialect::V3;
        let mut map = Object::new();
        map.insert("version".into(), V3_VERSION.into());
        let sections = [
            ("colorNotes", write_objects(&self.notes, dialect, false)?),
            ("bombNotes", write_objects(&self.bombs, dialect, false)?),
            ("obstacles", write_objects(&self.walls, dialect, false)?),
            ("sliders", write_objects(&self.arcs, dialect, false)?),
            ("burstSliders", write_objects(&self.chains, dialect, false)?),
            ("basicBeatmapEvents", self.write_events(dialect)),
        ];
        for (key, items) in sections {
            map.insert(key.into(), items.into());
        }

        let mut custom = Object::new();
        let fakes = [
            ("fakeColorNotes", write_objects(&self.fake_notes, dialect, true)?),
            ("fakeBombNotes", write_objects(&self.fake_bombs, dialect, true)?),
            ("fakeObstacles", write_objects(&self.fake_walls, dialect, true)?),
            (
                "fakeBurstSliders",
                write_objects(&self.fake_chains, dialect, true)?,
            ),
        ];
        for (key, items) in fakes {
            if !items.is_empty() {
                custom.insert(key.into(), items.into());
            }
        }
        self.write_custom_sections(&mut custom, dialect);
        if !custom.is_empty() {
            map.insert("customData".into(), JsonValue::Object(custom));
        }
        Ok(JsonValue::Object(map))
    }

    fn write_v2(&self) -> Result<JsonValue> {
        let dialect = Dialect::V2;
        if !self.chains.is_empty() || !self.fake_chains.is_empty() {
            return Err(MapError::UnsupportedInDialect {
                entity: Chain::ENTITY,
                dialect,
            });
        }

        // v2 stores bombs and fakes alongside notes, ordered by time.
        let mut notes: Vec<(f64, JsonValue)> = Vec::new();
        notes.extend(timed(&self.notes, dialect, false)?);
        notes.extend(timed(&self.bombs, dialect, false)?);
        notes.extend(timed(&self.fake_notes, dialect, true)?);
        notes.extend(timed(&self.fake_bombs, dialect, true)?);
        notes.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut map = Object::new();
        map.insert("_version".into(), V2_VERSION.into());
        map.insert(
            "_notes".into(),
            notes.into_iter().map(|(_, n)| n).collect::<Vec<_>>().into(),
        );
        map.insert(
            "_sliders".into(),
            write_objects(&self.arcs, dialect, false)?.into(),
        );
        let mut walls = timed(&self.walls, dialect, false)?;
        walls.extend(timed(&self.fake_walls, dialect, true)?);
        walls.sort_by(|a, b| a.0.total_cmp(&b.0));
        map.insert(
            "_obstacles".into(),
            walls.into_iter().map(|(_, w)| w).collect::<Vec<_>>().into(),
        );
        map.insert("_events".into(), self.write_events(dialect).into());

        let mut custom = Object::new();
        self.write_custom_sections(&mut custom, dialect);
        if !custom.is_empty() {
            map.insert("_customData".into(), JsonValue::Object(custom));
        }
        Ok(JsonValue::Object(map))
    }

    fn write_events(&self, dialect: Dialect) -> Vec<JsonValue> {
        let mut events: Vec<&BasicEvent> = self.events.iter().collect();
        events.sort_by(|a, b| a.time().total_cmp(&b.time()));
        events.into_iter().map(|e| e.to_json(dialect)).collect()
    }

    fn write_custom_sections(&self, custom: &mut Object, dialect: Dialect) {
        if !self.custom_events.is_empty() {
            let mut events: Vec<&CustomEvent> = self.custom_events.iter().collect();
            events.sort_by(|a, b| a.time().total_cmp(&b.time()));
            custom.insert(
                dialect.key("customEvents"),
                events
                    .into_iter()
                    .map(|e| e.to_json(dialect))
                    .collect::<Vec<_>>()
                    .into(),
            );
        }
        if !self.environment.is_empty() {
            custom.insert(
                dialect.key("environment"),
                self.environment
                    .iter()
                    .map(|e| e.to_json(dialect))
                    .collect::<Vec<_>>()
                    .into(),
            );
        }
        if !self.point_definitions.is_empty() {
            custom.insert(
                dialect.key("pointDefinitions"),
                self.point_definitions.to_json(dialect),
            );
        }
    }

    /// Read environment objects and point definitions from an existing
    /// difficulty JSON in either dialect. Entries that are neither an
    /// environment lookup nor a geometry object are skipped with a warning.
    /// Nothing is added when any entry fails to parse. Returns the number of
    /// environment objects added.
    pub fn import_environment(&mut self, raw: &JsonValue) -> Result<usize> {
        let (environment, definitions) = self.read_environment(raw)?;
        Ok(self.commit_environment(environment, definitions))
    }

    /// Read notes, bombs, walls, chains and arcs (fakes included) from an
    /// existing difficulty JSON in either dialect. Nothing is added when any
    /// object fails to parse. Returns the number of objects added.
    pub fn import_objects(&mut self, raw: &JsonValue) -> Result<usize> {
        let objects = ImportedObjects::read(raw)?;
        Ok(self.commit_objects(objects))
    }

    /// [`Difficulty::import_objects`] and [`Difficulty::import_environment`]
    /// as one step: either everything is added or nothing is.
    pub fn import(&mut self, raw: &JsonValue) -> Result<usize> {
        let objects = ImportedObjects::read(raw)?;
        let (environment, definitions) = self.read_environment(raw)?;
        Ok(self.commit_objects(objects) + self.commit_environment(environment, definitions))
    }

    fn read_environment(
        &self,
        raw: &JsonValue,
    ) -> Result<(Vec<EnvironmentObject>, PointDefinitions)> {
        let dialect = detect_dialect(raw);
        let mut imported = Vec::new();
        let mut definitions = self.point_definitions.clone();
        let Some(custom) = raw.get(dialect.custom_data()) else {
            return Ok((imported, definitions));
        };

        if let Some(entries) = custom.get(dialect.key("environment")) {
            let entries = entries
                .as_array()
                .ok_or_else(|| MapError::missing("difficulty", dialect.key("environment")))?;
            for entry in entries {
                let is_known = entry.get(dialect.key("id")).is_some()
                    || entry.get(dialect.key("geometry")).is_some();
                if !is_known {
                    log::warn!("skipping environment entry without id or geometry: {entry}");
                    continue;
                }
                imported.push(EnvironmentObject::from_json(entry, dialect)?);
            }
        }

        if let Some(raw_defs) = custom.get(dialect.key("pointDefinitions")) {
            for (name, value) in PointDefinitions::from_json(raw_defs)?.iter() {
                definitions.define(value.clone(), name.clone())?;
            }
        }
        Ok((imported, definitions))
    }

    fn commit_environment(
        &mut self,
        environment: Vec<EnvironmentObject>,
        definitions: PointDefinitions,
    ) -> usize {
        let count = environment.len();
        self.point_definitions = definitions;
        self.environment.extend(environment);
        log::debug!("imported {count} environment objects");
        count
    }

    fn commit_objects(&mut self, objects: ImportedObjects) -> usize {
        let count = objects.len();
        self.notes.extend(objects.notes);
        self.fake_notes.extend(objects.fake_notes);
        self.bombs.extend(objects.bombs);
        self.fake_bombs.extend(objects.fake_bombs);
        self.walls.extend(objects.walls);
        self.fake_walls.extend(objects.fake_walls);
        self.chains.extend(objects.chains);
        self.fake_chains.extend(objects.fake_chains);
        self.arcs.extend(objects.arcs);
        log::debug!("imported {count} gameplay objects");
        count
    }
}

/// Gameplay objects read from one document, added together.
#[derive(Default)]
struct ImportedObjects {
    notes: Vec<Note>,
    fake_notes: Vec<Note>,
    bombs: Vec<Bomb>,
    fake_bombs: Vec<Bomb>,
    walls: Vec<Wall>,
    fake_walls: Vec<Wall>,
    chains: Vec<Chain>,
    fake_chains: Vec<Chain>,
    arcs: Vec<Arc>,
}

impl ImportedObjects {
    fn read(raw: &JsonValue) -> Result<Self> {
        let dialect = detect_dialect(raw);
        let mut out = Self::default();
        match dialect {
            Dialect::V3 => {
                read_list(raw, "colorNotes", dialect, &mut out.notes)?;
                read_list(raw, "bombNotes", dialect, &mut out.bombs)?;
                read_list(raw, "obstacles", dialect, &mut out.walls)?;
                read_list(raw, "burstSliders", dialect, &mut out.chains)?;
                read_list(raw, "sliders", dialect, &mut out.arcs)?;
                if let Some(custom) = raw.get("customData") {
                    read_list(custom, "fakeColorNotes", dialect, &mut out.fake_notes)?;
                    read_list(custom, "fakeBombNotes", dialect, &mut out.fake_bombs)?;
                    read_list(custom, "fakeObstacles", dialect, &mut out.fake_walls)?;
                    read_list(custom, "fakeBurstSliders", dialect, &mut out.fake_chains)?;
                }
            }
            Dialect::V2 => {
                // Bombs share `_notes` with notes; fakes carry `_customData._fake`.
                for entry in entries(raw, "_notes")? {
                    if get_i64(entry, "_type") == Some(V2_BOMB_TYPE) {
                        read_v2(entry, &mut out.bombs, &mut out.fake_bombs)?;
                    } else {
                        read_v2(entry, &mut out.notes, &mut out.fake_notes)?;
                    }
                }
                for entry in entries(raw, "_obstacles")? {
                    read_v2(entry, &mut out.walls, &mut out.fake_walls)?;
                }
                read_list(raw, "_sliders", dialect, &mut out.arcs)?;
            }
        }
        Ok(out)
    }

    fn len(&self) -> usize {
        self.notes.len()
            + self.fake_notes.len()
            + self.bombs.len()
            + self.fake_bombs.len()
            + self.walls.len()
            + self.fake_walls.len()
            + self.chains.len()
            + self.fake_chains.len()
            + self.arcs.len()
    }
}

/// Items of the array under `key`; an absent key reads as empty.
fn entries<'a>(raw: &'a JsonValue, key: &str) -> Result<&'a [JsonValue]> {
    match raw.get(key) {
        None => Ok(&[][..]),
        Some(JsonValue::Array(items)) => Ok(items.as_slice()),
        Some(other) => Err(MapError::InvalidField {
            entity: "difficulty".into(),
            field: key.into(),
            value: other.to_string(),
        }),
    }
}

fn read_list<T: GameplayObject>(
    raw: &JsonValue,
    key: &str,
    dialect: Dialect,
    out: &mut Vec<T>,
) -> Result<()> {
    for entry in entries(raw, key)? {
        out.push(T::from_json(entry, dialect)?);
    }
    Ok(())
}

fn read_v2<T: GameplayObject>(
    entry: &JsonValue,
    real: &mut Vec<T>,
    fake: &mut Vec<T>,
) -> Result<()> {
    let mut object = T::from_json(entry, Dialect::V2)?;
    let is_fake = entry
        .get("_customData")
        .and_then(|c| get_bool(c, "_fake"))
        .unwrap_or(false);
    if is_fake {
        object.custom_data_mut().extra.remove("_fake");
        fake.push(object);
    } else {
        real.push(object);
    }
    Ok(())
}

/// Planned environment track names; see [`Difficulty::track_namer`].
pub(crate) struct TrackNamer {
    prefix: String,
    count: usize,
    used: HashSet<String>,
    issued: Vec<String>,
}

impl TrackNamer {
    pub(crate) fn next_name(&mut self) -> String {
        loop {
            let name = format!("{}{}", self.prefix, self.count);
            self.count += 1;
            if self.used.insert(name.clone()) {
                self.issued.push(name.clone());
                return name;
            }
        }
    }
}

fn optimize_all<T: GameplayObject>(items: &mut [T], settings: &OptimizeSettings) -> Result<()> {
    items.iter_mut().try_for_each(|item| item.optimize(settings))
}

fn timed<T: GameplayObject>(
    items: &[T],
    dialect: Dialect,
    fake: bool,
) -> Result<Vec<(f64, JsonValue)>> {
    items
        .iter()
        .map(|item| {
            let mut json = item.to_json(dialect)?;
            if fake && dialect == Dialect::V2 {
                mark_fake(&mut json);
            }
            Ok((item.time(), json))
        })
        .collect()
}

/// Serialize `items` ordered by time (stable for equal times).
fn write_objects<T: GameplayObject>(
    items: &[T],
    dialect: Dialect,
    fake: bool,
) -> Result<Vec<JsonValue>> {
    let mut out = timed(items, dialect, fake)?;
    out.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(out.into_iter().map(|(_, json)| json).collect())
}

fn mark_fake(json: &mut JsonValue) {
    if let JsonValue::Object(map) = json {
        let custom = map
            .entry("_customData")
            .or_insert_with(|| JsonValue::Object(Object::new()));
        if let JsonValue::Object(custom) = custom {
            custom.insert("_fake".into(), JsonValue::Bool(true));
        }
    }
}
