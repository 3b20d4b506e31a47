/// Local persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("corrupt data in {path}: {details}")]
    Corrupt { path: String, details: String },
}
