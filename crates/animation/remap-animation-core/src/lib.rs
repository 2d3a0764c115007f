//! ReMap Animation Core
//!
//! Authoring-side keyframe model for beatmap animations: parsing the flat
//! keyframe encoding, time-ordered track combination, tolerance-based point
//! decimation and the point definition registry. Nothing here samples or
//! plays animations; interpolation is the renderer's job.

pub mod animation;
pub mod combine;
pub mod config;
pub mod easing;
pub mod error;
pub mod geometry;
pub mod interp;
pub mod json;
pub mod keyframe;
pub mod optimize;
pub mod point_definitions;
pub mod property;
pub mod track;

// Re-exports for consumers (map layer, tools)
pub use animation::Animation;
pub use combine::{combine, combine_resolved, combine_tracks};
pub use config::OptimizeSettings;
pub use easing::{Ease, Spline};
pub use error::AnimationError;
pub use geometry::{rotate_point, rotate_property};
pub use json::Dialect;
pub use keyframe::{Keyframe, Modifier};
pub use optimize::{optimize, optimize_property};
pub use point_definitions::PointDefinitions;
pub use property::{AnimatedProperty, Property};
pub use track::Track;

pub type Result<T> = core::result::Result<T, AnimationError>;
