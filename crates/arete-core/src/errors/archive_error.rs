/// Archival errors. Kept apart from storage errors because a failed archive
/// means expired facts could not be preserved before removal.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("could not create archive directory {path}: {reason}")]
    CreateDirFailed { path: String, reason: String },

    #[error("could not write archive batch {path}: {reason}")]
    WriteFailed { path: String, reason: String },

    #[error("store rewrite after archiving {archived} facts failed: {reason}")]
    RewriteFailed { archived: usize, reason: String },
}
