use arete_cloud::merge;
use arete_core::{Category, Fact, Store, SyncState};
use chrono::Duration;
use proptest::prelude::*;
use test_fixtures::{fixed_now, FactBuilder};

fn arb_fact(id_space: u8) -> impl Strategy<Value = Fact> {
    (
        0..id_space,
        prop_oneof![Just(Category::Expertise), Just(Category::Focus)],
        "[a-d]{1,6}",
        0.0f64..=1.0,
        0i64..50,
    )
        .prop_map(|(id, category, content, confidence, hours)| {
            FactBuilder::new(&format!("f{id}"), &format!("fact {content}"))
                .category(category)
                .confidence(confidence)
                .updated_at(fixed_now() + Duration::hours(hours))
                .build()
        })
}

fn arb_store() -> impl Strategy<Value = Store> {
    proptest::collection::vec(arb_fact(12), 0..10).prop_map(|facts| {
        let mut store = Store::with_facts(facts);
        store.retain_valid();
        store
    })
}

fn arb_state() -> impl Strategy<Value = SyncState> {
    proptest::collection::vec((0u8..12, 0i64..50), 0..4).prop_map(|rows| {
        let mut state = SyncState::default();
        for (id, hours) in rows {
            state.add_tombstone(&format!("f{id}"), fixed_now() + Duration::hours(hours));
        }
        state
    })
}

proptest! {
    #[test]
    fn merge_is_deterministic(local in arb_store(), remote in arb_store(), state in arb_state()) {
        let first = merge(&local, &remote, &state);
        let second = merge(&local, &remote, &state);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn merged_ids_are_unique(local in arb_store(), remote in arb_store(), state in arb_state()) {
        let merged = merge(&local, &remote, &state).store;
        let mut ids = merged.ids();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), merged.len());
    }

    #[test]
    fn merging_the_result_again_drops_nothing(local in arb_store(), remote in arb_store()) {
        let once = merge(&local, &remote, &SyncState::default()).store;
        let twice = merge(&once, &once, &SyncState::default());
        prop_assert_eq!(twice.store, once);
        prop_assert!(twice.deduplicated.is_empty());
    }
}
