//! Store merge: id-level last-writer-wins with tombstones, then dedup.

pub mod resolution;

use std::collections::{HashMap, HashSet};

use arete_consolidation::Deduplicator;
use arete_core::{Fact, MergeConflict, MergeResult, Resolution, Store, SyncState};
use arete_observability::events;

use resolution::{resolve_shared, SharedOutcome};

/// Merge with the default duplicate threshold.
pub fn merge(local: &Store, remote: &Store, sync_state: &SyncState) -> MergeResult {
    Merger::default().merge(local, remote, sync_state)
}

/// Merges a local and a remote store into one.
///
/// Pure and deterministic: the same inputs always give the same output,
/// including fact order. No I/O.
#[derive(Debug, Clone, Default)]
pub struct Merger {
    dedup: Deduplicator,
}

impl Merger {
    pub fn new(similarity_threshold: f64) -> Self {
        Self {
            dedup: Deduplicator::with_threshold(similarity_threshold),
        }
    }

    pub fn merge(&self, local: &Store, remote: &Store, sync_state: &SyncState) -> MergeResult {
        let remote_by_id: HashMap<&str, &Fact> =
            remote.facts.iter().map(|f| (f.id.as_str(), f)).collect();
        let local_ids: HashSet<&str> = local.facts.iter().map(|f| f.id.as_str()).collect();
        let tombstones: HashMap<&str, _> = sync_state
            .tombstones
            .iter()
            .map(|t| (t.fact_id.as_str(), t.deleted_at))
            .collect();

        let mut result = MergeResult::default();
        let mut pool: Vec<Fact> = Vec::with_capacity(local.facts.len() + remote.facts.len());

        for ours in &local.facts {
            let Some(theirs) = remote_by_id.get(ours.id.as_str()) else {
                pool.push(ours.clone());
                continue;
            };
            let SharedOutcome {
                winner,
                remote_won,
                conflict,
            } = resolve_shared(ours, theirs);
            if remote_won {
                result.updated.push(ours.id.clone());
            }
            if let Some(conflict) = conflict {
                events::conflict_recorded(&conflict.fact_id, resolution_label(&conflict));
                result.conflicts.push(conflict);
            }
            pool.push(winner.clone());
        }

        let mut seen_remote: HashSet<&str> = HashSet::new();
        for theirs in &remote.facts {
            let id = theirs.id.as_str();
            if local_ids.contains(id) || !seen_remote.insert(id) {
                continue;
            }
            match tombstones.get(id) {
                Some(deleted_at) if *deleted_at >= theirs.updated_at => {
                    result.deleted_from_cloud.push(theirs.id.clone());
                }
                _ => {
                    result.added.push(theirs.id.clone());
                    pool.push(theirs.clone());
                }
            }
        }

        let outcome = self.dedup.deduplicate(pool);
        result.deduplicated = outcome.dropped_ids();
        if !result.deduplicated.is_empty() {
            let dropped: HashSet<&str> = result.deduplicated.iter().map(String::as_str).collect();
            result.added.retain(|id| !dropped.contains(id.as_str()));
            result.updated.retain(|id| !dropped.contains(id.as_str()));
        }

        result.store = Store {
            core: local.core.filled_from(&remote.core),
            facts: outcome.kept,
            settings: local.settings.clone(),
        };
        result
    }
}

fn resolution_label(conflict: &MergeConflict) -> &'static str {
    match conflict.resolution {
        Resolution::Local => "local",
        Resolution::Cloud => "cloud",
    }
}
