use arete_core::Store;
use arete_decay::{effective_confidence, DecayEngine};
use chrono::Duration;
use proptest::prelude::*;
use test_fixtures::{fixed_now, FactBuilder};

proptest! {
    #[test]
    fn bounded_by_stored_confidence(
        confidence in 0.0f64..=1.0,
        days in 0i64..5_000,
        half_life in 1.0f64..400.0,
    ) {
        let fact = FactBuilder::new("f", "x").confidence(confidence).aged_days(days).build();
        let decayed = effective_confidence(&fact, half_life, fixed_now());
        prop_assert!(decayed >= 0.0);
        prop_assert!(decayed <= confidence + f64::EPSILON);
    }

    #[test]
    fn monotonic_in_elapsed_time(
        confidence in 0.0f64..=1.0,
        a in 0i64..2_000,
        b in 0i64..2_000,
    ) {
        let (early, late) = if a <= b { (a, b) } else { (b, a) };
        let fact = FactBuilder::new("f", "x").confidence(confidence).validated_at(fixed_now()).build();
        let at_early = effective_confidence(&fact, 60.0, fixed_now() + Duration::days(early));
        let at_late = effective_confidence(&fact, 60.0, fixed_now() + Duration::days(late));
        prop_assert!(at_late <= at_early + f64::EPSILON);
    }

    #[test]
    fn expired_facts_are_a_subset_of_the_store(
        ages in proptest::collection::vec(0i64..1_000, 0..20),
    ) {
        let facts = ages
            .iter()
            .enumerate()
            .map(|(i, d)| FactBuilder::new(&format!("f{i}"), "x").aged_days(*d).build())
            .collect();
        let store = Store::with_facts(facts);
        let expired = DecayEngine::new().find_expired(&store, fixed_now());
        prop_assert!(expired.len() <= store.len());
        for f in &expired {
            prop_assert!(store.contains(&f.id));
        }
    }
}
