use arete_core::{Confidence, Fact, Store};
use chrono::{DateTime, Utc};

use crate::formula::effective_confidence;

/// Default archival threshold for effective confidence.
pub const DEFAULT_ARCHIVAL_THRESHOLD: f64 = Confidence::ARCHIVAL;

/// Archival decision with metadata for audit logging.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchivalDecision {
    pub fact_id: String,
    pub should_archive: bool,
    pub effective_confidence: f64,
    pub threshold: f64,
    pub reason: String,
}

/// Evaluate archival eligibility for one fact.
///
/// Proven facts are exempt from threshold filtering and never expire.
pub fn evaluate(
    fact: &Fact,
    half_life_days: f64,
    threshold: f64,
    now: DateTime<Utc>,
) -> ArchivalDecision {
    let effective = effective_confidence(fact, half_life_days, now);

    if fact.maturity.is_proven() {
        return ArchivalDecision {
            fact_id: fact.id.clone(),
            should_archive: false,
            effective_confidence: effective,
            threshold,
            reason: "proven facts do not expire".to_string(),
        };
    }

    let archive = effective < threshold;
    let reason = if archive {
        format!(
            "effective confidence {:.4} below threshold {:.4} ({})",
            effective, threshold, fact.category
        )
    } else {
        "effective confidence above threshold".to_string()
    };

    ArchivalDecision {
        fact_id: fact.id.clone(),
        should_archive: archive,
        effective_confidence: effective,
        threshold,
        reason,
    }
}

/// Facts whose effective confidence has decayed below `threshold`, in store order.
pub fn find_expired(store: &Store, threshold: f64, now: DateTime<Utc>) -> Vec<Fact> {
    let half_life = store.settings.decay_half_life_days;
    store
        .facts
        .iter()
        .filter(|f| evaluate(f, half_life, threshold, now).should_archive)
        .cloned()
        .collect()
}
