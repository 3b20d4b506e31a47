use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use arete_core::errors::{ArchiveError, AreteResult};
use arete_core::traits::{Clock, IArchiveSink, ILocalStore};
use arete_observability::events;

use crate::archival::{find_expired, DEFAULT_ARCHIVAL_THRESHOLD};

/// Outcome of one cleanup pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanupReport {
    pub archived_count: usize,
    pub remaining_count: usize,
    pub archive_path: Option<PathBuf>,
}

/// Moves expired facts out of the local store into the archive sink.
pub struct Archiver {
    local: Arc<dyn ILocalStore>,
    sink: Arc<dyn IArchiveSink>,
    clock: Arc<dyn Clock>,
    threshold: f64,
}

impl Archiver {
    pub fn new(
        local: Arc<dyn ILocalStore>,
        sink: Arc<dyn IArchiveSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            local,
            sink,
            clock,
            threshold: DEFAULT_ARCHIVAL_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Archive expired facts and rewrite the store with the survivors.
    ///
    /// A missing store counts as empty and nothing is written. Archived ids are
    /// tombstoned in the sync state so a stale remote copy cannot bring them
    /// back on the next merge.
    pub fn run_cleanup(&self) -> AreteResult<CleanupReport> {
        let mut store = self.local.load_identity()?.unwrap_or_default();
        let now = self.clock.now();
        let expired = find_expired(&store, self.threshold, now);

        if expired.is_empty() {
            return Ok(CleanupReport {
                archived_count: 0,
                remaining_count: store.len(),
                archive_path: None,
            });
        }

        let archive_path = self.sink.archive(&expired, now)?;

        let expired_ids: HashSet<&str> = expired.iter().map(|f| f.id.as_str()).collect();
        store.facts.retain(|f| !expired_ids.contains(f.id.as_str()));

        self.local
            .save_identity(&store)
            .map_err(|e| ArchiveError::RewriteFailed {
                archived: expired.len(),
                reason: e.to_string(),
            })?;

        let mut sync_state = self.local.load_sync_state()?;
        for fact in &expired {
            sync_state.add_tombstone(&fact.id, now);
        }
        sync_state.pending_push = true;
        self.local
            .save_sync_state(&sync_state)
            .map_err(|e| ArchiveError::RewriteFailed {
                archived: expired.len(),
                reason: format!("tombstones not saved: {e}"),
            })?;

        if let Some(path) = &archive_path {
            events::facts_archived(expired.len(), store.len(), path);
        }

        Ok(CleanupReport {
            archived_count: expired.len(),
            remaining_count: store.len(),
            archive_path,
        })
    }
}
