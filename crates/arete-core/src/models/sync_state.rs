use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded local deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tombstone {
    pub fact_id: String,
    pub deleted_at: DateTime<Utc>,
}

/// Process-independent record of sync progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncState {
    pub last_push_at: Option<DateTime<Utc>>,
    pub last_pull_at: Option<DateTime<Utc>>,
    /// Local changes exist that have not reached the remote store.
    pub pending_push: bool,
    /// Consecutive failed sync attempts.
    pub error_count: u32,
    pub last_error: Option<String>,
    pub tombstones: Vec<Tombstone>,
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tombstone_for(&self, fact_id: &str) -> Option<&Tombstone> {
        self.tombstones.iter().find(|t| t.fact_id == fact_id)
    }

    /// Record a deletion. A repeated deletion keeps the later timestamp.
    pub fn add_tombstone(&mut self, fact_id: &str, deleted_at: DateTime<Utc>) {
        match self.tombstones.iter_mut().find(|t| t.fact_id == fact_id) {
            Some(existing) => existing.deleted_at = existing.deleted_at.max(deleted_at),
            None => self.tombstones.push(Tombstone {
                fact_id: fact_id.to_string(),
                deleted_at,
            }),
        }
    }

    /// Drop tombstones recorded before `cutoff`. Returns how many were dropped.
    pub fn prune_tombstones(&mut self, cutoff: DateTime<Utc>) -> usize {
        let before = self.tombstones.len();
        self.tombstones.retain(|t| t.deleted_at >= cutoff);
        before - self.tombstones.len()
    }

    /// Record a completed pull/merge/push cycle.
    pub fn record_success(&mut self, pulled_at: DateTime<Utc>, pushed_at: DateTime<Utc>) {
        self.last_pull_at = Some(pulled_at);
        self.last_push_at = Some(pushed_at);
        self.pending_push = false;
        self.error_count = 0;
        self.last_error = None;
    }

    /// Record a failed attempt.
    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.error_count = self.error_count.saturating_add(1);
        self.last_error = Some(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn repeated_tombstone_keeps_latest() {
        let t0 = Utc::now();
        let mut s = SyncState::new();
        s.add_tombstone("f1", t0);
        s.add_tombstone("f1", t0 - Duration::days(1));
        s.add_tombstone("f1", t0 + Duration::days(1));
        assert_eq!(s.tombstones.len(), 1);
        assert_eq!(s.tombstone_for("f1").unwrap().deleted_at, t0 + Duration::days(1));
    }

    #[test]
    fn prune_drops_old_tombstones() {
        let now = Utc::now();
        let mut s = SyncState::new();
        s.add_tombstone("old", now - Duration::days(200));
        s.add_tombstone("new", now - Duration::days(2));
        assert_eq!(s.prune_tombstones(now - Duration::days(90)), 1);
        assert!(s.tombstone_for("old").is_none());
        assert!(s.tombstone_for("new").is_some());
    }

    #[test]
    fn success_clears_error_state() {
        let now = Utc::now();
        let mut s = SyncState::new();
        s.pending_push = true;
        s.record_failure("timeout");
        s.record_failure("timeout again");
        assert_eq!(s.error_count, 2);
        s.record_success(now, now);
        assert_eq!(s.error_count, 0);
        assert!(s.last_error.is_none());
        assert!(!s.pending_push);
        assert_eq!(s.last_push_at, Some(now));
    }
}
