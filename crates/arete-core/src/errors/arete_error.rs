use super::{ArchiveError, CloudError, StorageError, ValidationError};

/// Top-level error for the Arete identity store.
///
/// Subsystem errors convert into this via `#[from]`, so `?` works across
/// crate boundaries.
#[derive(Debug, thiserror::Error)]
pub enum AreteError {
    #[error("fact not found: {id}")]
    FactNotFound { id: String },

    #[error("invalid fact: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("cloud sync error: {0}")]
    CloudSyncError(#[from] CloudError),

    #[error("archive error: {0}")]
    ArchiveError(#[from] ArchiveError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

impl AreteError {
    /// Whether this failure is transient and worth retrying after backoff.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::CloudSyncError(e) => e.is_transient(),
            Self::StorageError(StorageError::Io { .. }) => true,
            _ => false,
        }
    }
}
