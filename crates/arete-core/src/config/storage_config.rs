use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Local persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the identity, sync state, and archive.
    pub data_dir: String,
    /// Identity store file name inside `data_dir`.
    pub identity_file: String,
    /// Sync state file name inside `data_dir`.
    pub sync_state_file: String,
    /// Archive directory name inside `data_dir`.
    pub archive_dir: String,
}

impl StorageConfig {
    pub fn identity_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.identity_file)
    }

    pub fn sync_state_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.sync_state_file)
    }

    pub fn archive_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.archive_dir)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: defaults::DEFAULT_DATA_DIR.to_string(),
            identity_file: defaults::DEFAULT_IDENTITY_FILE.to_string(),
            sync_state_file: defaults::DEFAULT_SYNC_STATE_FILE.to_string(),
            archive_dir: defaults::DEFAULT_ARCHIVE_DIR.to_string(),
        }
    }
}
