use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    scenes: HashMap<String, SceneEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SceneEntry {
    Path(String),
    Detailed {
        path: String,
        #[serde(default)]
        expect_error: Option<String>,
    },
}

impl SceneEntry {
    fn as_path(&self) -> &str {
        match self {
            SceneEntry::Path(path) => path,
            SceneEntry::Detailed { path, .. } => path,
        }
    }

    fn expect_error(&self) -> Option<&str> {
        match self {
            SceneEntry::Path(_) => None,
            SceneEntry::Detailed { expect_error, .. } => expect_error.as_deref(),
        }
    }
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Host scenes dumped as JSON.
pub mod scenes {
    use super::*;

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.scenes.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.scenes, "scene", name)?;
        read_to_string(entry.as_path())
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let entry = lookup(&MANIFEST.scenes, "scene", name)?;
        Ok(resolve_path(entry.as_path()))
    }

    /// Error variant the export of this scene is expected to fail with, if any.
    pub fn expected_error(name: &str) -> Result<Option<String>> {
        let entry = lookup(&MANIFEST.scenes, "scene", name)?;
        Ok(entry.expect_error().map(str::to_string))
    }
}
