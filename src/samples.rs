use include_dir::{include_dir, Dir};
use itertools::Itertools;
use log::debug;
use std::fs;
use std::path::PathBuf;

use crate::error::{Result, SpotError};
use crate::game_config::GameConfig;

static SAMPLES_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/samples");

/// Somewhere a game config can be fetched from by reference
pub trait ConfigSource {
    fn fetch(&self, reference: &str) -> Result<GameConfig>;
}

/// Sample games compiled into the binary, addressed by name ("park", "kitchen", ...)
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledSamples;

impl BundledSamples {
    pub fn names(&self) -> Vec<String> {
        SAMPLES_DIR
            .files()
            .filter(|f| f.path().extension().is_some_and(|ext| ext == "json"))
            .filter_map(|f| f.path().file_stem())
            .map(|stem| stem.to_string_lossy().into_owned())
            .sorted()
            .collect()
    }
}

impl ConfigSource for BundledSamples {
    fn fetch(&self, reference: &str) -> Result<GameConfig> {
        let file = SAMPLES_DIR
            .get_file(format!("{reference}.json"))
            .ok_or_else(|| SpotError::UnknownSample(reference.to_string()))?;
        let text = file
            .contents_utf8()
            .ok_or_else(|| SpotError::UnknownSample(reference.to_string()))?;
        debug!("samples: fetched bundled '{reference}'");
        Ok(GameConfig::from_json(text)?)
    }
}

/// Game configs stored as JSON files; the reference is a path relative to `root`
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }
}

impl ConfigSource for FileSource {
    fn fetch(&self, reference: &str) -> Result<GameConfig> {
        let path = self.root.join(reference);
        debug!("samples: reading {:?}", path);
        let text = fs::read_to_string(&path)?;
        Ok(GameConfig::from_json(&text)?)
    }
}
