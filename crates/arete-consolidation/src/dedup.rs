//! Near-duplicate consolidation.
//!
//! Two facts are duplicates when they share a category and their normalized
//! contents are equal, one contains the other, or their similarity reaches
//! [`DUPLICATE_THRESHOLD`]. Within a duplicate cluster the most confident fact
//! survives, then the most recently updated, then whichever was kept first.

use std::collections::HashMap;

use arete_core::config::defaults;
use arete_core::{Category, Fact};

use crate::algorithms::similarity::{normalize, normalized_similarity};

/// Similarity at or above which two same-category facts are duplicates.
pub const DUPLICATE_THRESHOLD: f64 = defaults::DEFAULT_DEDUP_SIMILARITY;

/// Result of a deduplication pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DedupOutcome {
    /// Surviving facts, pairwise non-duplicate.
    pub kept: Vec<Fact>,
    /// Facts that lost to a duplicate, in the order they were eliminated.
    pub dropped: Vec<Fact>,
}

impl DedupOutcome {
    pub fn dropped_ids(&self) -> Vec<String> {
        self.dropped.iter().map(|f| f.id.clone()).collect()
    }
}

/// Whether `a` and `b` are duplicates at the default threshold.
pub fn are_similar(a: &Fact, b: &Fact) -> bool {
    Deduplicator::default().are_similar(a, b)
}

/// Deduplicate at the default threshold.
pub fn deduplicate(facts: Vec<Fact>) -> DedupOutcome {
    Deduplicator::default().deduplicate(facts)
}

/// Deduplicator bound to a similarity threshold.
#[derive(Debug, Clone)]
pub struct Deduplicator {
    threshold: f64,
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self {
            threshold: DUPLICATE_THRESHOLD,
        }
    }
}

struct Slot {
    fact: Fact,
    normalized: String,
}

impl Deduplicator {
    pub fn with_threshold(threshold: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&threshold), "threshold out of range");
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn are_similar(&self, a: &Fact, b: &Fact) -> bool {
        a.category == b.category
            && self.contents_similar(&normalize(&a.content), &normalize(&b.content))
    }

    fn contents_similar(&self, a: &str, b: &str) -> bool {
        if a == b {
            return true;
        }
        if !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a)) {
            return true;
        }
        normalized_similarity(a, b) >= self.threshold
    }

    /// Collapse duplicates in a single pass over `facts`.
    ///
    /// Each incoming fact is compared against every kept fact of its category.
    /// The winner of the cluster takes the slot of the earliest kept member and
    /// the other members are dropped, so the kept set stays pairwise
    /// dissimilar and a second pass is a no-op.
    pub fn deduplicate(&self, facts: Vec<Fact>) -> DedupOutcome {
        let mut slots: Vec<Option<Slot>> = Vec::with_capacity(facts.len());
        let mut by_category: HashMap<Category, Vec<usize>> = HashMap::new();
        let mut exact: HashMap<(Category, String), usize> = HashMap::new();
        let mut dropped = Vec::new();

        for fact in facts {
            let normalized = normalize(&fact.content);
            let key = (fact.category, normalized.clone());

            // An exact hit is the only possible match: anything similar to the
            // incoming fact would be similar to the kept one too.
            let matches: Vec<usize> = match exact.get(&key) {
                Some(&slot) => vec![slot],
                None => by_category
                    .get(&fact.category)
                    .map(|indices| {
                        indices
                            .iter()
                            .copied()
                            .filter(|&i| {
                                slots[i]
                                    .as_ref()
                                    .is_some_and(|s| self.contents_similar(&s.normalized, &normalized))
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            };

            let Some(&first) = matches.first() else {
                let index = slots.len();
                slots.push(Some(Slot { fact, normalized }));
                by_category.entry(key.0).or_default().push(index);
                exact.insert(key, index);
                continue;
            };

            let mut cluster: Vec<Slot> = matches
                .iter()
                .filter_map(|&i| {
                    let slot = slots[i].take()?;
                    exact.remove(&(slot.fact.category, slot.normalized.clone()));
                    Some(slot)
                })
                .collect();
            cluster.push(Slot { fact, normalized });

            let mut winner = 0;
            for (i, candidate) in cluster.iter().enumerate().skip(1) {
                if outranks(&candidate.fact, &cluster[winner].fact) {
                    winner = i;
                }
            }
            let survivor = cluster.swap_remove(winner);
            for loser in cluster {
                tracing::debug!(
                    dropped = %loser.fact.id,
                    kept = %survivor.fact.id,
                    "duplicate fact dropped"
                );
                dropped.push(loser.fact);
            }

            if let Some(indices) = by_category.get_mut(&survivor.fact.category) {
                indices.retain(|i| *i == first || !matches.contains(i));
            }
            exact.insert(
                (survivor.fact.category, survivor.normalized.clone()),
                first,
            );
            slots[first] = Some(survivor);
        }

        DedupOutcome {
            kept: slots.into_iter().flatten().map(|s| s.fact).collect(),
            dropped,
        }
    }
}

/// Strictly better: higher confidence, then later `updatedAt`.
fn outranks(candidate: &Fact, incumbent: &Fact) -> bool {
    let (c, i) = (candidate.confidence.value(), incumbent.confidence.value());
    c > i || (c == i && candidate.updated_at > incumbent.updated_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arete_core::FactDraft;
    use chrono::{Duration, Utc};

    fn fact(category: Category, content: &str, confidence: f64) -> Fact {
        FactDraft::new(category, content)
            .confidence(confidence)
            .into_fact(Utc::now())
            .unwrap()
    }

    #[test]
    fn different_categories_never_match() {
        let a = fact(Category::Expertise, "Rust", 0.5);
        let b = fact(Category::Preference, "Rust", 0.5);
        assert!(!are_similar(&a, &b));
    }

    #[test]
    fn substring_counts_as_similar() {
        let a = fact(Category::Expertise, "Rust", 0.5);
        let b = fact(Category::Expertise, "Writes Rust at work every day", 0.5);
        assert!(are_similar(&a, &b));
    }

    #[test]
    fn punctuation_only_content_is_not_contained_in_everything() {
        let a = fact(Category::Focus, "!!!", 0.5);
        let b = fact(Category::Focus, "Shipping the beta", 0.5);
        assert!(!are_similar(&a, &b));
    }

    #[test]
    fn higher_confidence_wins_and_takes_first_slot() {
        let a = fact(Category::Expertise, "Uses React", 0.5);
        let other = fact(Category::Focus, "Hiring", 0.5);
        let b = fact(Category::Expertise, "uses react.", 0.9);
        let out = deduplicate(vec![a.clone(), other.clone(), b.clone()]);
        assert_eq!(out.kept, vec![b, other]);
        assert_eq!(out.dropped_ids(), vec![a.id]);
    }

    #[test]
    fn confidence_tie_goes_to_most_recent_then_to_kept() {
        let a = fact(Category::Expertise, "Uses React", 0.7);
        let mut b = fact(Category::Expertise, "uses react", 0.7);
        b.updated_at = a.updated_at + Duration::seconds(5);
        let out = deduplicate(vec![a.clone(), b.clone()]);
        assert_eq!(out.kept[0].id, b.id);

        let mut c = b.clone();
        c.id = "c".into();
        let out = deduplicate(vec![b.clone(), c]);
        assert_eq!(out.kept[0].id, b.id);
    }

    #[test]
    fn incoming_fact_can_absorb_several_kept_facts() {
        let a = fact(Category::Expertise, "Rust", 0.4);
        let b = fact(Category::Expertise, "Go", 0.4);
        let c = fact(Category::Expertise, "Rust and Go", 0.6);
        let out = deduplicate(vec![a, b, c.clone()]);
        assert_eq!(out.kept, vec![c]);
        assert_eq!(out.dropped.len(), 2);
    }
}
