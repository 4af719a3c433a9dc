//! Save slot persistence
//!
//! Features:
//! - Versionless JSON record of player name, level, gems and score
//! - Lenient loading (missing fields take defaults, malformed saves are dropped)
//! - Backends: in-memory, JSON file (native), LocalStorage (wasm32)

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStorageStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default save slot identifier
pub const SAVE_SLOT: &str = "jungleRunSave";
/// Name used when no identity has been supplied
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Persisted progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveData {
    pub player_name: String,
    pub level: u32,
    pub gems: u32,
    pub score: u64,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            level: 1,
            gems: 0,
            score: 0,
        }
    }
}

impl SaveData {
    /// Replace out-of-range values with safe defaults
    pub fn sanitized(mut self) -> Self {
        if self.level == 0 {
            log::warn!("Saved level 0 is invalid, starting at level 1");
            self.level = 1;
        }
        if self.player_name.trim().is_empty() {
            self.player_name = DEFAULT_PLAYER_NAME.to_string();
        }
        self
    }

    /// Parse a save record; malformed input yields `None`
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str::<SaveData>(json) {
            Ok(data) => Some(data.sanitized()),
            Err(e) => {
                log::warn!("Discarding malformed save: {}", e);
                None
            }
        }
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Persistence failures
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("save I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("save encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A save slot backend
pub trait SaveStore {
    /// Write the slot
    fn save(&mut self, data: &SaveData) -> Result<(), PersistError>;
    /// Read the slot; `None` when empty or unreadable
    fn load(&self) -> Option<SaveData>;
}

/// Keeps the slot in memory as JSON
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Option<String>,
    /// Number of successful writes
    pub writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with raw slot contents
    pub fn with_raw(json: impl Into<String>) -> Self {
        Self {
            slot: Some(json.into()),
            writes: 0,
        }
    }

    /// Raw slot contents
    pub fn raw(&self) -> Option<&str> {
        self.slot.as_deref()
    }
}

impl SaveStore for MemoryStore {
    fn save(&mut self, data: &SaveData) -> Result<(), PersistError> {
        self.slot = Some(data.to_json()?);
        self.writes += 1;
        Ok(())
    }

    fn load(&self) -> Option<SaveData> {
        self.slot.as_deref().and_then(SaveData::from_json)
    }
}
