use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use arete_core::errors::{ArchiveError, AreteResult, StorageError};
use arete_core::traits::IArchiveSink;
use arete_core::Fact;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::atomic::io_error;

/// Collision suffixes tried before giving up on a batch name.
const MAX_NAME_ATTEMPTS: u32 = 1_000;

/// One archived batch as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveBatch {
    pub facts: Vec<Fact>,
    pub archived_at: DateTime<Utc>,
}

/// Append-only archive of timestamp-named JSON batches.
#[derive(Debug, Clone)]
pub struct FileArchive {
    dir: PathBuf,
}

impl FileArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read one batch back.
    pub fn read_batch(path: &Path) -> AreteResult<ArchiveBatch> {
        let bytes = fs::read(path).map_err(|e| io_error(path, e))?;
        let batch = serde_json::from_slice(&bytes).map_err(|e| StorageError::Corrupt {
            path: path.display().to_string(),
            details: e.to_string(),
        })?;
        Ok(batch)
    }

    /// Batch files in name order. Names carry the UTC timestamp and a
    /// zero-padded counter, so this is also creation order.
    pub fn list_batches(&self) -> AreteResult<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(&self.dir, e).into()),
        };
        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| io_error(&self.dir, e))?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    fn batch_stem(archived_at: DateTime<Utc>) -> String {
        format!("archive-{}", archived_at.format("%Y%m%dT%H%M%S%.3fZ"))
    }

    fn create_batch_file(&self, archived_at: DateTime<Utc>) -> AreteResult<(PathBuf, fs::File)> {
        let stem = Self::batch_stem(archived_at);
        for attempt in 0..MAX_NAME_ATTEMPTS {
            // Fixed-width counter so name order matches creation order.
            let path = self.dir.join(format!("{stem}-{attempt:03}.json"));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(ArchiveError::WriteFailed {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    }
                    .into())
                }
            }
        }
        Err(ArchiveError::WriteFailed {
            path: self.dir.join(format!("{stem}-*.json")).display().to_string(),
            reason: "no free batch name".to_string(),
        }
        .into())
    }
}

impl IArchiveSink for FileArchive {
    fn archive(&self, facts: &[Fact], archived_at: DateTime<Utc>) -> AreteResult<Option<PathBuf>> {
        if facts.is_empty() {
            return Ok(None);
        }

        fs::create_dir_all(&self.dir).map_err(|e| ArchiveError::CreateDirFailed {
            path: self.dir.display().to_string(),
            reason: e.to_string(),
        })?;

        let batch = ArchiveBatch {
            facts: facts.to_vec(),
            archived_at,
        };
        let bytes = serde_json::to_vec_pretty(&batch)?;

        let (path, mut file) = self.create_batch_file(archived_at)?;
        let written = file.write_all(&bytes).and_then(|()| file.sync_all());
        if let Err(e) = written {
            // Leave no half-written batch behind.
            let _ = fs::remove_file(&path);
            return Err(ArchiveError::WriteFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
            .into());
        }

        tracing::debug!(path = %path.display(), count = facts.len(), "archive batch written");
        Ok(Some(path))
    }
}
