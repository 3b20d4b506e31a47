use std::fmt;

use serde::{Deserialize, Serialize};

use super::scheduler::SyncPhase;

/// Externally visible sync status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncStatus {
    /// No remote store configured. Nothing ever leaves the device.
    LocalOnly,
    Idle,
    Pending,
    Syncing,
    Backoff,
    /// `shutdown` was called.
    Stopped,
}

impl SyncStatus {
    pub(crate) fn from_phase(phase: SyncPhase) -> Self {
        match phase {
            SyncPhase::Idle => SyncStatus::Idle,
            SyncPhase::Pending => SyncStatus::Pending,
            SyncPhase::Syncing => SyncStatus::Syncing,
            SyncPhase::Backoff => SyncStatus::Backoff,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SyncStatus::LocalOnly => "local-only",
            SyncStatus::Idle => "idle",
            SyncStatus::Pending => "pending",
            SyncStatus::Syncing => "syncing",
            SyncStatus::Backoff => "backoff",
            SyncStatus::Stopped => "stopped",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
