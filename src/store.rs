use log::{debug, warn};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::error::Result;
use crate::game_config::GameConfig;

/// Key under which the last saved custom game is remembered
pub const CUSTOM_CONFIG_KEY: &str = "spotTheDiffCustomConfig";

/// Opaque string key/value persistence
pub trait KeyValueStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&self, key: &str, value: &str) -> std::io::Result<()>;
}

/// One file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            dir: AppDirs::store_dir(),
        }
    }

    pub fn with_dir<P: AsRef<Path>>(p: P) -> Self {
        Self {
            dir: p.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn save(&self, key: &str, value: &str) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)
    }
}

/// In-memory store for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn save(&self, key: &str, value: &str) -> std::io::Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn load(&self, key: &str) -> Option<String> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> std::io::Result<()> {
        (**self).save(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn load(&self, key: &str) -> Option<String> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> std::io::Result<()> {
        (**self).save(key, value)
    }
}

/// Remembers the last custom game the user built
#[derive(Debug, Clone)]
pub struct CustomConfigStore<S> {
    store: S,
}

impl<S: KeyValueStore> CustomConfigStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Missing or malformed content both read as "no custom game".
    pub fn load(&self) -> Option<GameConfig> {
        let raw = self.store.load(CUSTOM_CONFIG_KEY)?;
        match GameConfig::from_json(&raw) {
            Ok(cfg) => {
                debug!("store: loaded custom game '{}'", cfg.title);
                Some(cfg)
            }
            Err(e) => {
                warn!("store: ignoring malformed custom game: {e}");
                None
            }
        }
    }

    pub fn save(&self, cfg: &GameConfig) -> Result<()> {
        let data = cfg.to_json()?;
        self.store.save(CUSTOM_CONFIG_KEY, &data)?;
        debug!("store: saved custom game '{}'", cfg.title);
        Ok(())
    }
}
