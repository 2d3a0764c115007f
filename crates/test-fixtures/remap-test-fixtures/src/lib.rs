//! Shared JSON fixtures for the remap crates' tests and benches.
//!
//! Fixtures live under `fixtures/` at the workspace root and are listed by
//! name in `fixtures/manifest.json`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../../../fixtures/manifest.json"))
        .expect("fixtures/manifest.json should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    /// Raw tracks and animation objects, `name -> path`.
    animations: BTreeMap<String, String>,
    maps: BTreeMap<String, MapEntry>,
}

/// A difficulty document, optionally tagged with the dialect it is written in.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MapEntry {
    Bare(String),
    Tagged {
        path: String,
        #[serde(default)]
        dialect: Option<String>,
    },
}

impl MapEntry {
    fn rel(&self) -> &str {
        match self {
            MapEntry::Bare(path) | MapEntry::Tagged { path, .. } => path,
        }
    }
}

/// Absolute location of a fixture given relative to `fixtures/`.
fn absolute(rel: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../../fixtures")
        .join(rel)
}

fn read(rel: &str) -> Result<String> {
    let path = absolute(rel);
    fs::read_to_string(&path).with_context(|| format!("failed to read fixture {}", path.display()))
}

fn parse<T: DeserializeOwned>(rel: &str) -> Result<T> {
    serde_json::from_str(&read(rel)?)
        .with_context(|| format!("fixture {rel} does not match the requested shape"))
}

fn entry<'a, T>(section: &'a BTreeMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    section.get(name).ok_or_else(|| {
        let known: Vec<&str> = section.keys().map(String::as_str).collect();
        anyhow!("unknown {kind} fixture '{name}' (known: {})", known.join(", "))
    })
}

/// Keyframe tracks and animation objects.
pub mod animations {
    use super::*;

    /// Fixture names in sorted order.
    pub fn names() -> Vec<&'static str> {
        MANIFEST.animations.keys().map(String::as_str).collect()
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        parse(entry(&MANIFEST.animations, "animation", name)?)
    }
}

/// Difficulty documents.
pub mod maps {
    use super::*;

    pub fn names() -> Vec<&'static str> {
        MANIFEST.maps.keys().map(String::as_str).collect()
    }

    pub fn json(name: &str) -> Result<String> {
        read(entry(&MANIFEST.maps, "map", name)?.rel())
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        parse(entry(&MANIFEST.maps, "map", name)?.rel())
    }

    /// Dialect tag from the manifest (`"v2"` or `"v3"`), if present.
    pub fn dialect(name: &str) -> Result<Option<String>> {
        Ok(match entry(&MANIFEST.maps, "map", name)? {
            MapEntry::Bare(_) => None,
            MapEntry::Tagged { dialect, .. } => dialect.clone(),
        })
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Ok(absolute(entry(&MANIFEST.maps, "map", name)?.rel()))
    }
}
