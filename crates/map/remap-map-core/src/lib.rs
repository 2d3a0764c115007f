//! ReMap Map Core
//!
//! The authored difficulty document and its entities: gameplay objects,
//! basic and custom events, environment objects and the helpers that
//! animate environment groups. Reads and writes either wire dialect.

pub mod config;
pub mod custom_event;
pub mod difficulty;
pub mod environment;
pub mod error;
pub mod events;
pub mod objects;
mod wire;

pub use config::SessionConfig;
pub use custom_event::{AnimateTrack, CustomEvent};
pub use difficulty::Difficulty;
pub use environment::{
    animate_env_group, animate_env_track, EnvironmentKind, EnvironmentObject, GeometryType,
    LookupMethod, Material, MaterialDef,
};
pub use error::MapError;
pub use events::{
    BasicEvent, EventBase, LaserSpeedEvent, LerpType, LightColor, LightEvent, LightId,
    RingSpinEvent, RingZoomEvent, RotationEvent,
};
pub use objects::{
    AnchorMode, Arc, Bomb, Chain, CutDirection, GameplayObject, Note, NoteColor, ObjectCustomData,
    Wall,
};

pub use remap_animation_core as animation;

pub type Result<T> = core::result::Result<T, MapError>;
