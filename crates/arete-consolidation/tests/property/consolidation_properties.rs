use arete_consolidation::{deduplicate, normalize, similarity};
use arete_core::{Category, Fact};
use proptest::prelude::*;
use test_fixtures::{fixed_now, FactBuilder};

fn arb_category() -> impl Strategy<Value = Category> {
    prop_oneof![
        Just(Category::Core),
        Just(Category::Expertise),
        Just(Category::Preference),
        Just(Category::Context),
        Just(Category::Focus),
    ]
}

fn arb_facts() -> impl Strategy<Value = Vec<Fact>> {
    proptest::collection::vec(
        (arb_category(), "[a-c ]{1,8}", 0.0f64..=1.0, 0i64..100),
        0..16,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (category, content, confidence, minutes))| {
                FactBuilder::new(&format!("f{i}"), &format!("x{content}"))
                    .category(category)
                    .confidence(confidence)
                    .updated_at(fixed_now() + chrono::Duration::minutes(minutes))
                    .build()
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn similarity_is_symmetric(a in "\\PC{0,20}", b in "\\PC{0,20}") {
        prop_assert_eq!(similarity(&a, &b), similarity(&b, &a));
    }

    #[test]
    fn similarity_is_in_unit_range(a in "\\PC{0,20}", b in "\\PC{0,20}") {
        let s = similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&s));
    }

    #[test]
    fn self_similarity_is_one(a in "\\PC{0,20}") {
        prop_assert_eq!(similarity(&a, &a), 1.0);
    }

    #[test]
    fn empty_vs_non_empty_is_zero(a in "[a-z]{1,12}") {
        prop_assert_eq!(similarity("", &a), 0.0);
        prop_assert_eq!(similarity(&a, ""), 0.0);
    }

    #[test]
    fn normalize_is_idempotent(a in "[A-Za-z0-9 .,!?'-]{0,30}") {
        let once = normalize(&a);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn dedup_is_idempotent(facts in arb_facts()) {
        let once = deduplicate(facts);
        let twice = deduplicate(once.kept.clone());
        prop_assert_eq!(&twice.kept, &once.kept);
        prop_assert!(twice.dropped.is_empty());
    }

    #[test]
    fn dedup_partitions_its_input(facts in arb_facts()) {
        let n = facts.len();
        let out = deduplicate(facts);
        prop_assert_eq!(out.kept.len() + out.dropped.len(), n);
    }
}
