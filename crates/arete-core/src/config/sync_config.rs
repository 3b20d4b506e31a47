use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Sync scheduling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Quiet period after the last queued change before a cycle starts.
    pub debounce_ms: u64,
    /// Backoff after the first failure; doubles per consecutive failure.
    pub backoff_base_ms: u64,
    /// Upper bound on the backoff.
    pub backoff_cap_ms: u64,
    /// How often the background ticker polls the scheduler.
    pub tick_interval_ms: u64,
    /// Tombstones older than this are pruned after a successful push.
    pub tombstone_retention_days: i64,
}

impl SyncConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_ms: defaults::DEFAULT_DEBOUNCE_MS,
            backoff_base_ms: defaults::DEFAULT_BACKOFF_BASE_MS,
            backoff_cap_ms: defaults::DEFAULT_BACKOFF_CAP_MS,
            tick_interval_ms: defaults::DEFAULT_TICK_INTERVAL_MS,
            tombstone_retention_days: defaults::DEFAULT_TOMBSTONE_RETENTION_DAYS,
        }
    }
}
