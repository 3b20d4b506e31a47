use arete_core::{Fact, Store};
use chrono::{DateTime, Utc};

use crate::archival::{self, ArchivalDecision};
use crate::formula::{self, DecayBreakdown};

/// Decay engine bound to an archival threshold.
#[derive(Debug, Clone)]
pub struct DecayEngine {
    /// Archival threshold (default 0.1).
    archival_threshold: f64,
}

impl DecayEngine {
    /// Create a new DecayEngine with the default archival threshold.
    pub fn new() -> Self {
        Self {
            archival_threshold: archival::DEFAULT_ARCHIVAL_THRESHOLD,
        }
    }

    /// Create with a custom archival threshold.
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            archival_threshold: threshold,
        }
    }

    pub fn archival_threshold(&self) -> f64 {
        self.archival_threshold
    }

    /// Effective confidence of a fact under the store's half-life.
    pub fn effective(&self, store: &Store, fact: &Fact, now: DateTime<Utc>) -> f64 {
        formula::effective_confidence(fact, store.settings.decay_half_life_days, now)
    }

    /// Full breakdown for one fact.
    pub fn breakdown(&self, store: &Store, fact: &Fact, now: DateTime<Utc>) -> DecayBreakdown {
        formula::compute_breakdown(fact, store.settings.decay_half_life_days, now)
    }

    /// Facts below the threshold at `now`.
    pub fn find_expired(&self, store: &Store, now: DateTime<Utc>) -> Vec<Fact> {
        archival::find_expired(store, self.archival_threshold, now)
    }

    /// Evaluate every fact in the store: effective confidence plus decision.
    pub fn process_batch(&self, store: &Store, now: DateTime<Utc>) -> Vec<ArchivalDecision> {
        let half_life = store.settings.decay_half_life_days;
        store
            .facts
            .iter()
            .map(|f| archival::evaluate(f, half_life, self.archival_threshold, now))
            .collect()
    }
}

impl Default for DecayEngine {
    fn default() -> Self {
        Self::new()
    }
}
