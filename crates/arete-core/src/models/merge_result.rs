use serde::{Deserialize, Serialize};

use super::store::Store;

/// Which side won a conflicting fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Local,
    Cloud,
}

/// A fact present on both sides with differing content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeConflict {
    pub fact_id: String,
    pub resolution: Resolution,
    pub local_content: String,
    pub cloud_content: String,
}

/// Output of one merge. Ephemeral: consumed by the caller, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeResult {
    pub store: Store,
    /// Ids taken from the remote side that were not present locally.
    pub added: Vec<String>,
    /// Ids where the remote version replaced the local one.
    pub updated: Vec<String>,
    pub conflicts: Vec<MergeConflict>,
    /// Remote ids suppressed by a local tombstone.
    pub deleted_from_cloud: Vec<String>,
    /// Ids dropped as semantic duplicates of a kept fact.
    pub deduplicated: Vec<String>,
}

impl MergeResult {
    /// Whether the merge changed anything relative to the local store.
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty()
            || !self.updated.is_empty()
            || !self.deleted_from_cloud.is_empty()
            || !self.deduplicated.is_empty()
    }
}
