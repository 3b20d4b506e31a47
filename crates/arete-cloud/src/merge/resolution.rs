//! Per-id resolution when both sides hold the same fact.

use arete_core::{Fact, MergeConflict, Resolution};

/// Result of resolving one shared id.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedOutcome<'a> {
    pub winner: &'a Fact,
    /// The remote version replaced the local one.
    pub remote_won: bool,
    /// Present when the two contents differ, whoever won.
    pub conflict: Option<MergeConflict>,
}

/// Last writer wins by `updatedAt`; local wins ties.
///
/// Differing content always yields a conflict entry, including on a
/// timestamp tie. Identical content never does, even when other fields
/// (confidence, maturity) differ.
pub fn resolve_shared<'a>(local: &'a Fact, remote: &'a Fact) -> SharedOutcome<'a> {
    let remote_won = remote.updated_at > local.updated_at;
    let (winner, resolution) = if remote_won {
        (remote, Resolution::Cloud)
    } else {
        (local, Resolution::Local)
    };

    let conflict = (local.content != remote.content).then(|| MergeConflict {
        fact_id: local.id.clone(),
        resolution,
        local_content: local.content.clone(),
        cloud_content: remote.content.clone(),
    });

    SharedOutcome {
        winner,
        remote_won,
        conflict,
    }
}
