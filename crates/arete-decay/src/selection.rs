use arete_core::{Category, Fact, Maturity, Store, Visibility};
use chrono::{DateTime, Utc};

use crate::formula::effective_confidence;

/// Criteria for choosing which facts to export or show.
#[derive(Debug, Clone)]
pub struct FactFilter {
    /// Export tier; the public tier only sees public facts.
    pub tier: Visibility,
    /// Minimum effective confidence. Proven facts always pass.
    pub min_confidence: Option<f64>,
    /// Whether provisional facts are included.
    pub include_candidates: bool,
    /// Restrict to these categories when set.
    pub categories: Option<Vec<Category>>,
}

impl Default for FactFilter {
    fn default() -> Self {
        Self {
            tier: Visibility::Trusted,
            min_confidence: None,
            include_candidates: true,
            categories: None,
        }
    }
}

impl FactFilter {
    pub fn public() -> Self {
        Self {
            tier: Visibility::Public,
            ..Self::default()
        }
    }

    pub fn min_confidence(mut self, min: f64) -> Self {
        self.min_confidence = Some(min);
        self
    }

    pub fn exclude_candidates(mut self) -> Self {
        self.include_candidates = false;
        self
    }

    pub fn categories(mut self, categories: &[Category]) -> Self {
        self.categories = Some(categories.to_vec());
        self
    }
}

/// Facts matching `filter`, in store order.
pub fn select_facts<'a>(store: &'a Store, filter: &FactFilter, now: DateTime<Utc>) -> Vec<&'a Fact> {
    let half_life = store.settings.decay_half_life_days;
    store
        .facts
        .iter()
        .filter(|f| f.visibility.visible_at(filter.tier))
        .filter(|f| filter.include_candidates || f.maturity != Maturity::Candidate)
        .filter(|f| {
            filter
                .categories
                .as_ref()
                .map_or(true, |cats| cats.contains(&f.category))
        })
        .filter(|f| match filter.min_confidence {
            Some(min) => f.maturity.is_proven() || effective_confidence(f, half_life, now) >= min,
            None => true,
        })
        .collect()
}
