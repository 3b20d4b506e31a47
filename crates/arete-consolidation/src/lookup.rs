use arete_core::{Fact, Store};

use crate::algorithms::similarity::find_best_match;

/// Fact whose content best matches `query`, with its score.
pub fn find_by_content<'a>(store: &'a Store, query: &str, threshold: f64) -> Option<(&'a Fact, f64)> {
    find_best_match(query, &store.facts, |f| f.content.as_str(), threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_MATCH_THRESHOLD;
    use arete_core::{Category, FactDraft};
    use chrono::Utc;

    #[test]
    fn finds_fuzzy_match() {
        let now = Utc::now();
        let store = Store::with_facts(vec![
            FactDraft::new(Category::Preference, "Prefers dark mode").into_fact(now).unwrap(),
            FactDraft::new(Category::Expertise, "Kubernetes operator").into_fact(now).unwrap(),
        ]);
        let (hit, score) = find_by_content(&store, "prefers dark-mode", DEFAULT_MATCH_THRESHOLD).unwrap();
        assert_eq!(hit.content, "Prefers dark mode");
        assert!(score > 0.9);
        assert!(find_by_content(&store, "zzz", DEFAULT_MATCH_THRESHOLD).is_none());
    }
}
