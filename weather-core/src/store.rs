//! Durable preferences and search history.
//!
//! [`Store`] owns the state and writes the whole record through a
//! [`Persistence`] after every mutation. A failed write is logged and the
//! in-memory state is kept, so the session stays consistent even when the
//! disk is not.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, path::PathBuf};

use crate::{
    history::SearchHistory,
    preferences::{TempUnit, Theme, UserPreferences},
};

/// Fixed identifier the state is stored under.
pub const STORAGE_KEY: &str = "weather-storage";

/// Load/save of one serialized blob.
pub trait Persistence: Send + Sync + Debug {
    /// The stored blob, or `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, blob: &str) -> Result<()>;
}

/// Everything that survives a restart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
    pub preferences: UserPreferences,
    pub search_history: SearchHistory,
}

/// JSON file named after [`STORAGE_KEY`] inside a directory.
#[derive(Debug, Clone)]
pub struct FilePersistence {
    path: PathBuf,
}

impl FilePersistence {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(format!("{STORAGE_KEY}.json")),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Persistence for FilePersistence {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&self.path)
            .map(Some)
            .with_context(|| format!("Failed to read state file: {}", self.path.display()))
    }

    fn save(&self, blob: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create state directory: {}", parent.display())
            })?;
        }

        // Write a sibling then rename so readers never see a half-written blob.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, blob)
            .with_context(|| format!("Failed to write state file: {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace state file: {}", self.path.display()))?;

        Ok(())
    }
}

/// Keeps the blob in memory. Useful for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    blob: Mutex<Option<String>>,
}

impl MemoryPersistence {
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(blob.into())),
        }
    }

    pub fn blob(&self) -> Option<String> {
        self.blob.lock().clone()
    }
}

impl Persistence for MemoryPersistence {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.blob.lock().clone())
    }

    fn save(&self, blob: &str) -> Result<()> {
        *self.blob.lock() = Some(blob.to_string());
        Ok(())
    }
}

#[derive(Debug)]
pub struct Store<P: Persistence> {
    persistence: P,
    state: PersistedState,
}

impl<P: Persistence> Store<P> {
    /// Read the persisted state, falling back to defaults if it is missing or unreadable.
    pub fn open(persistence: P) -> Self {
        let state = match persistence.load() {
            Ok(Some(blob)) => match serde_json::from_str::<PersistedState>(&blob) {
                Ok(state) => PersistedState {
                    search_history: state.search_history.sanitized(),
                    ..state
                },
                Err(e) => {
                    tracing::warn!("Stored state is corrupt, starting from defaults: {e}");
                    PersistedState::default()
                }
            },
            Ok(None) => PersistedState::default(),
            Err(e) => {
                tracing::warn!("Failed to load stored state, starting from defaults: {e:#}");
                PersistedState::default()
            }
        };

        Self { persistence, state }
    }

    pub fn state(&self) -> &PersistedState {
        &self.state
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.state.preferences
    }

    pub fn history(&self) -> &SearchHistory {
        &self.state.search_history
    }

    pub fn set_temp_unit(&mut self, unit: TempUnit) {
        self.state.preferences.temp_unit = unit;
        self.persist();
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.state.preferences.theme = theme;
        self.persist();
    }

    pub fn set_language(&mut self, language: &str) {
        self.state.preferences.language = language.to_string();
        self.persist();
    }

    /// Returns whether `name` is a favorite after the toggle.
    pub fn toggle_favorite(&mut self, name: &str) -> bool {
        let added = self.state.preferences.toggle_favorite(name);
        self.persist();
        added
    }

    pub fn add_to_history(&mut self, name: &str) {
        self.state.search_history.add(name);
        self.persist();
    }

    pub fn clear_history(&mut self) {
        self.state.search_history.clear();
        self.persist();
    }

    fn persist(&self) {
        let blob = match serde_json::to_string(&self.state) {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!("Failed to serialize state: {e}");
                return;
            }
        };
        if let Err(e) = self.persistence.save(&blob) {
            tracing::warn!("Failed to persist state, keeping changes in memory only: {e:#}");
        }
    }
}
