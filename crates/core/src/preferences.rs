//! Persisted UI preferences.
//!
//! Values are opaque string blobs keyed by name. Reading is best effort: a
//! missing or malformed blob keeps the default for that key only.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use tracing::warn;

use crate::{error::Result, message::MessageOptions, types::InitScope};

pub const SCOPE_KEY: &str = "scope";
pub const OPTIONS_KEY: &str = "options";

pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: HashMap<String, String>,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Preferences kept as one JSON object on disk.
pub struct JsonFilePreferenceStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl JsonFilePreferenceStore {
    /// Open the store at `path`. An unreadable or malformed file starts empty.
    pub fn open(path: &Path) -> Self {
        let values = match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!(path = %path.display(), "Ignoring malformed preferences: {err}");
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };
        Self {
            path: path.to_path_buf(),
            values,
        }
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&self.values)?)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    pub scope: InitScope,
    pub options: MessageOptions,
}

impl Preferences {
    /// Overlay stored values on `defaults`, key by key.
    pub fn load(store: &impl PreferenceStore, defaults: Preferences) -> Self {
        let scope = store
            .get(SCOPE_KEY)
            .map(|raw| InitScope::parse(&raw))
            .unwrap_or(defaults.scope);

        let options = match store.get(OPTIONS_KEY) {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!("Ignoring malformed {OPTIONS_KEY} preference: {err}");
                defaults.options
            }),
            None => defaults.options,
        };

        Self { scope, options }
    }

    pub fn save(&self, store: &mut impl PreferenceStore) -> Result<()> {
        store.set(SCOPE_KEY, self.scope.as_str().to_string())?;
        store.set(OPTIONS_KEY, serde_json::to_string(&self.options)?)?;
        Ok(())
    }
}
