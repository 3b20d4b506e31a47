//! Structured log events for key identity-store operations.
//!
//! Each function emits a `tracing` event with structured fields.

use std::path::Path;
use std::time::Duration;

/// Log the start of a pull/merge/push cycle.
pub fn sync_started(kinds: &[&str]) {
    tracing::debug!(event = "sync_started", kinds = ?kinds, "sync cycle started");
}

/// Log a completed sync cycle.
pub fn sync_completed(added: usize, updated: usize, conflicts: usize, deleted_from_cloud: usize) {
    tracing::info!(
        event = "sync_completed",
        added = added,
        updated = updated,
        conflicts = conflicts,
        deleted_from_cloud = deleted_from_cloud,
        "sync completed"
    );
}

/// Log a failed sync cycle and the backoff that follows.
///
/// Transient failures (network) are expected and logged at warn. Anything
/// else will keep failing until fixed elsewhere, so it is logged at error.
pub fn sync_failed(error: &str, error_count: u32, backoff: Duration, transient: bool) {
    let backoff_ms = backoff.as_millis() as u64;
    if transient {
        tracing::warn!(
            event = "sync_failed",
            error = %error,
            error_count = error_count,
            backoff_ms = backoff_ms,
            transient = true,
            "sync failed, backing off"
        );
    } else {
        tracing::error!(
            event = "sync_failed",
            error = %error,
            error_count = error_count,
            backoff_ms = backoff_ms,
            transient = false,
            "sync failed with a non-transient error, backing off"
        );
    }
}

/// Log a conflict resolved during merge.
pub fn conflict_recorded(fact_id: &str, resolution: &str) {
    tracing::info!(
        event = "conflict_recorded",
        fact_id = %fact_id,
        resolution = %resolution,
        "merge conflict resolved"
    );
}

/// Log an archival batch.
pub fn facts_archived(count: usize, remaining: usize, path: &Path) {
    tracing::info!(
        event = "facts_archived",
        count = count,
        remaining = remaining,
        path = %path.display(),
        "expired facts archived"
    );
}

/// Log persisted data that could not be parsed and was ignored.
pub fn corrupt_data_ignored(path: &Path, details: &str) {
    tracing::warn!(
        event = "corrupt_data_ignored",
        path = %path.display(),
        details = %details,
        "corrupt data treated as absent"
    );
}

/// Log facts dropped at the load boundary for violating fact invariants.
pub fn invalid_facts_dropped(origin: &str, ids: &[String]) {
    tracing::warn!(
        event = "invalid_facts_dropped",
        origin = %origin,
        ids = ?ids,
        "invalid facts dropped"
    );
}
