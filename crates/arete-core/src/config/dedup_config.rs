use serde::{Deserialize, Serialize};

use super::defaults;

/// Deduplication and fuzzy-lookup thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Similarity at or above which two same-category facts are duplicates.
    pub similarity_threshold: f64,
    /// Minimum similarity for a fuzzy lookup hit.
    pub match_threshold: f64,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: defaults::DEFAULT_DEDUP_SIMILARITY,
            match_threshold: defaults::DEFAULT_MATCH_THRESHOLD,
        }
    }
}
