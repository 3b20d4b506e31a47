mod archive_error;
mod arete_error;
mod cloud_error;
mod storage_error;
mod validation_error;

pub use archive_error::ArchiveError;
pub use arete_error::AreteError;
pub use cloud_error::CloudError;
pub use storage_error::StorageError;
pub use validation_error::ValidationError;

/// Convenience alias used across the workspace.
pub type AreteResult<T> = Result<T, AreteError>;
