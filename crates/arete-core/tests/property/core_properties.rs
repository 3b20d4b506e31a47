use arete_core::{Category, Confidence, FactDraft, Store, SyncState};
use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

proptest! {
    #[test]
    fn confidence_stays_in_unit_range(raw in proptest::num::f64::ANY) {
        let value = Confidence::new(raw).value();
        prop_assert!((0.0..=1.0).contains(&value));
        if (0.0..=1.0).contains(&raw) {
            prop_assert_eq!(value, raw);
        }
    }

    #[test]
    fn tombstones_keep_the_latest_deletion(rows in proptest::collection::vec((0u8..4, 0i64..1_000), 1..20)) {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut state = SyncState::default();
        for (id, minutes) in &rows {
            state.add_tombstone(&format!("f{id}"), base + Duration::minutes(*minutes));
        }

        let mut ids: Vec<_> = state.tombstones.iter().map(|t| t.fact_id.clone()).collect();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), state.tombstones.len());

        for tombstone in &state.tombstones {
            let latest = rows
                .iter()
                .filter(|(id, _)| format!("f{id}") == tombstone.fact_id)
                .map(|(_, minutes)| base + Duration::minutes(*minutes))
                .max();
            prop_assert_eq!(Some(tombstone.deleted_at), latest);
        }
    }

    #[test]
    fn lenient_decode_keeps_exactly_the_readable_facts(bad in proptest::collection::vec(any::<bool>(), 0..12)) {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut facts = Vec::new();
        let mut expected = Vec::new();
        for (i, is_bad) in bad.iter().enumerate() {
            let mut fact = FactDraft::new(Category::Context, format!("fact {i}"))
                .into_fact(now)
                .unwrap();
            fact.id = format!("f{i}");
            let mut value = serde_json::to_value(&fact).unwrap();
            if *is_bad {
                value["category"] = "hobby".into();
            } else {
                expected.push(fact.id);
            }
            facts.push(value);
        }

        let (store, dropped) = Store::from_json_value(serde_json::json!({ "facts": facts })).unwrap();
        prop_assert_eq!(store.ids(), expected.iter().map(String::as_str).collect::<Vec<_>>());
        prop_assert_eq!(dropped.len(), bad.iter().filter(|b| **b).count());
    }
}
