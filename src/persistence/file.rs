//! JSON file save slot (native)

use std::fs;
use std::path::{Path, PathBuf};

use super::{PersistError, SaveData, SaveStore};

/// Save slot stored as `<dir>/<slot>.json`
///
/// Writes go to a temporary file first and are renamed over the slot so a
/// crash mid-write never leaves a truncated save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl AsRef<Path>, slot: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{slot}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SaveStore for JsonFileStore {
    fn save(&mut self, data: &SaveData) -> Result<(), PersistError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data.to_json()?)?;
        fs::rename(&tmp, &self.path)?;
        log::debug!("Saved progress to {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> Option<SaveData> {
        match fs::read_to_string(&self.path) {
            Ok(json) => {
                let data = SaveData::from_json(&json);
                if data.is_some() {
                    log::info!("Loaded save from {}", self.path.display());
                }
                data
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No save found, starting fresh");
                None
            }
            Err(e) => {
                log::warn!("Could not read {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("jungle-run-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_file_round_trip() {
        let dir = temp_dir("round-trip");
        let mut store = JsonFileStore::new(&dir, "slot");
        assert!(store.load().is_none());

        let data = SaveData {
            player_name: "Google User".into(),
            level: 3,
            gems: 5,
            score: 50,
        };
        store.save(&data).unwrap();
        assert_eq!(store.load(), Some(data));
        assert!(!store.path().with_extension("json.tmp").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_corrupt_file_starts_fresh() {
        let dir = temp_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        let store = JsonFileStore::new(&dir, "slot");
        fs::write(store.path(), "{ truncated").unwrap();
        assert!(store.load().is_none());

        let _ = fs::remove_dir_all(&dir);
    }
}
