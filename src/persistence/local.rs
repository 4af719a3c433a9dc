//! LocalStorage save slot (wasm32)

use super::{PersistError, SaveData, SaveStore};

/// Save slot kept under a LocalStorage key
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

impl LocalStorageStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

impl SaveStore for LocalStorageStore {
    fn save(&mut self, data: &SaveData) -> Result<(), PersistError> {
        let storage = Self::storage()
            .ok_or_else(|| PersistError::Unavailable("no LocalStorage".into()))?;
        storage
            .set_item(&self.key, &data.to_json()?)
            .map_err(|e| PersistError::Unavailable(format!("{:?}", e)))?;
        log::debug!("Progress saved to LocalStorage");
        Ok(())
    }

    fn load(&self) -> Option<SaveData> {
        let storage = Self::storage()?;
        match storage.get_item(&self.key) {
            Ok(Some(json)) => {
                let data = SaveData::from_json(&json);
                if data.is_some() {
                    log::info!("Loaded save from LocalStorage");
                }
                data
            }
            _ => {
                log::info!("No save found, starting fresh");
                None
            }
        }
    }
}
