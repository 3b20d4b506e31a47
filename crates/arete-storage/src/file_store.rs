use std::fs;
use std::path::{Path, PathBuf};

use arete_core::config::StorageConfig;
use arete_core::errors::{AreteResult, StorageError};
use arete_core::traits::ILocalStore;
use arete_core::{Store, SyncState};
use arete_observability::events;
use serde::de::DeserializeOwned;

use crate::atomic::{atomic_write, read_optional};

/// Identity store and sync state as JSON files.
#[derive(Debug, Clone)]
pub struct FileStore {
    identity_path: PathBuf,
    sync_state_path: PathBuf,
}

impl FileStore {
    /// Files named by `config`, rooted at its data directory.
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            identity_path: config.identity_path(),
            sync_state_path: config.sync_state_path(),
        }
    }

    /// Default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let config = StorageConfig {
            data_dir: dir.as_ref().display().to_string(),
            ..StorageConfig::default()
        };
        Self::new(&config)
    }

    pub fn identity_path(&self) -> &Path {
        &self.identity_path
    }

    pub fn sync_state_path(&self) -> &Path {
        &self.sync_state_path
    }

    /// Missing file or unparseable content both yield `None`; only read
    /// failures are errors.
    fn read_json<T: DeserializeOwned>(path: &Path) -> AreteResult<Option<T>> {
        let Some(bytes) = read_optional(path)? else {
            return Ok(None);
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                set_aside_corrupt(path, &e.to_string());
                Ok(None)
            }
        }
    }

    fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> AreteResult<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        atomic_write(path, &bytes)?;
        Ok(())
    }
}

impl ILocalStore for FileStore {
    fn load_identity(&self) -> AreteResult<Option<Store>> {
        let Some(value) = Self::read_json::<serde_json::Value>(&self.identity_path)? else {
            return Ok(None);
        };
        let (store, dropped) = match Store::from_json_value(value) {
            Ok(decoded) => decoded,
            Err(e) => {
                set_aside_corrupt(&self.identity_path, &e.to_string());
                return Ok(None);
            }
        };
        if !dropped.is_empty() {
            events::invalid_facts_dropped("local", &dropped);
        }
        Ok(Some(store))
    }

    fn save_identity(&self, store: &Store) -> AreteResult<()> {
        Self::write_json(&self.identity_path, store)
    }

    fn load_sync_state(&self) -> AreteResult<SyncState> {
        Ok(Self::read_json(&self.sync_state_path)?.unwrap_or_default())
    }

    fn save_sync_state(&self, state: &SyncState) -> AreteResult<()> {
        Self::write_json(&self.sync_state_path, state)
    }
}

/// Log unreadable content and move the file to `<name>.corrupt`, so the next
/// save cannot overwrite the only copy of it.
fn set_aside_corrupt(path: &Path, details: &str) {
    let corrupt = StorageError::Corrupt {
        path: path.display().to_string(),
        details: details.to_string(),
    };
    events::corrupt_data_ignored(path, &corrupt.to_string());

    let mut aside = path.as_os_str().to_owned();
    aside.push(".corrupt");
    if let Err(e) = fs::rename(path, &aside) {
        tracing::warn!(path = %path.display(), error = %e, "could not set corrupt file aside");
    }
}
