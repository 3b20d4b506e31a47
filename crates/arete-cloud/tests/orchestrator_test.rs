use std::sync::Arc;

use arete_cloud::{Inference, SyncKind, SyncOrchestrator, SyncOutcome, SyncStatus};
use arete_core::traits::{IRemoteStore, ManualClock};
use arete_core::{AreteConfig, AreteError, Category, FactDraft, FactSource, Maturity, Store, SyncState};
use chrono::Duration;
use test_fixtures::{fact, fixed_now, ts, FactBuilder, MemoryArchive, MemoryLocalStore, MemoryRemoteStore};

struct Harness {
    local: Arc<MemoryLocalStore>,
    remote: Arc<MemoryRemoteStore>,
    archive: Arc<MemoryArchive>,
    clock: Arc<ManualClock>,
    orchestrator: SyncOrchestrator,
}

fn harness(local: Store, remote: Option<Store>) -> Harness {
    harness_with(&AreteConfig::default(), local, remote)
}

fn harness_with(config: &AreteConfig, local: Store, remote: Option<Store>) -> Harness {
    let local = Arc::new(MemoryLocalStore::with_identity(local));
    let remote = Arc::new(match remote {
        Some(store) => MemoryRemoteStore::with_identity(store),
        None => MemoryRemoteStore::new(),
    });
    let archive = Arc::new(MemoryArchive::new());
    let clock = Arc::new(ManualClock::new(fixed_now()));
    let orchestrator = SyncOrchestrator::new(
        config,
        local.clone(),
        archive.clone(),
        Some(remote.clone() as Arc<dyn IRemoteStore>),
        clock.clone(),
    );
    Harness {
        local,
        remote,
        archive,
        clock,
        orchestrator,
    }
}

fn completed(outcome: Option<SyncOutcome>) -> arete_core::MergeResult {
    match outcome {
        Some(SyncOutcome::Completed(result)) => result,
        other => panic!("expected a completed cycle, got {other:?}"),
    }
}

#[test]
fn local_only_ignores_sync_requests() {
    let local = Arc::new(MemoryLocalStore::new());
    let orchestrator = SyncOrchestrator::new(
        &AreteConfig::default(),
        local.clone(),
        Arc::new(MemoryArchive::new()),
        None,
        Arc::new(ManualClock::new(fixed_now())),
    );

    assert!(orchestrator.initialize().is_none());
    assert!(!orchestrator.queue_sync(SyncKind::Identity));
    assert_eq!(orchestrator.pending_count(), 0);
    assert_eq!(orchestrator.status(), SyncStatus::LocalOnly);
    assert_eq!(orchestrator.status().to_string(), "local-only");
    assert!(!orchestrator.is_online());

    // Local edits still work.
    let added = orchestrator
        .add_fact(FactDraft::new(Category::Expertise, "Writes Rust"))
        .unwrap();
    assert_eq!(orchestrator.identity().unwrap().ids(), vec![added.id.as_str()]);
    assert!(orchestrator.tick().is_none());
}

#[test]
fn initialize_runs_one_cycle_then_is_a_no_op() {
    let h = harness(
        Store::with_facts(vec![fact("a", "Writes Rust", 0.7, ts(2024, 1, 1))]),
        Some(Store::with_facts(vec![fact("b", "Lives in Porto", 0.7, ts(2024, 1, 2))])),
    );

    let result = completed(h.orchestrator.initialize());
    assert_eq!(result.added, vec!["b".to_string()]);
    assert!(h.orchestrator.initialize().is_none());

    assert_eq!(h.local.identity().unwrap().len(), 2);
    assert_eq!(h.remote.identity().unwrap().len(), 2);
    assert_eq!(h.remote.fetches(), 1);
    assert_eq!(h.remote.saves(), 1);

    let state = h.local.sync_state();
    assert_eq!(state.last_pull_at, Some(fixed_now()));
    assert_eq!(state.last_push_at, Some(fixed_now()));
    assert!(!state.pending_push);
    assert_eq!(h.orchestrator.last_merge_result(), Some(result));
    assert_eq!(h.orchestrator.status(), SyncStatus::Idle);
}

#[test]
fn queued_changes_wait_for_the_debounce() {
    let h = harness(Store::new(), None);
    assert!(h.orchestrator.queue_sync(SyncKind::Identity));
    assert_eq!(h.orchestrator.pending_count(), 1);
    assert_eq!(h.orchestrator.status(), SyncStatus::Pending);

    h.clock.advance(Duration::milliseconds(1_999));
    assert!(h.orchestrator.tick().is_none());

    h.clock.advance(Duration::milliseconds(1));
    completed(h.orchestrator.tick());
    assert_eq!(h.orchestrator.pending_count(), 0);
    assert_eq!(h.remote.fetches(), 1);
}

#[test]
fn rapid_edits_are_coalesced_into_one_cycle() {
    let h = harness(Store::new(), None);
    let edits = [
        "Writes Rust",
        "Lives in Porto",
        "Prefers dark mode",
        "Enjoys bouldering",
        "Speaks Japanese",
    ];
    for content in edits {
        h.orchestrator
            .add_fact(FactDraft::new(Category::Focus, content))
            .unwrap();
        h.clock.advance(Duration::milliseconds(500));
        assert!(h.orchestrator.tick().is_none());
    }
    assert!(h.local.sync_state().pending_push);

    h.clock.advance(Duration::seconds(2));
    completed(h.orchestrator.tick());
    assert_eq!(h.remote.saves(), 1);
    assert_eq!(h.remote.identity().unwrap().len(), 5);
    assert!(!h.local.sync_state().pending_push);
}

#[test]
fn failures_back_off_exponentially_and_recover() {
    let h = harness(Store::new(), None);
    h.remote.fail_next(2);
    h.orchestrator.queue_sync(SyncKind::Identity);
    h.clock.advance(Duration::seconds(2));

    match h.orchestrator.tick() {
        Some(SyncOutcome::Failed { backoff, .. }) => assert_eq!(backoff.as_secs(), 5),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(h.orchestrator.status(), SyncStatus::Backoff);
    assert!(!h.orchestrator.is_online());
    assert_eq!(h.orchestrator.pending_count(), 1);
    let state = h.local.sync_state();
    assert_eq!(state.error_count, 1);
    assert!(state.last_error.unwrap().contains("injected"));

    h.clock.advance(Duration::seconds(4));
    assert!(h.orchestrator.tick().is_none());
    h.clock.advance(Duration::seconds(1));
    match h.orchestrator.tick() {
        Some(SyncOutcome::Failed { backoff, .. }) => assert_eq!(backoff.as_secs(), 10),
        other => panic!("expected failure, got {other:?}"),
    }

    h.clock.advance(Duration::seconds(10));
    completed(h.orchestrator.tick());
    assert!(h.orchestrator.is_online());
    let state = h.local.sync_state();
    assert_eq!(state.error_count, 0);
    assert!(state.last_error.is_none());
}

#[test]
fn deleted_fact_is_not_pulled_back() {
    let shared = fact("x", "Lives in Berlin", 0.8, ts(2024, 1, 1));
    let h = harness(
        Store::with_facts(vec![shared.clone()]),
        Some(Store::with_facts(vec![shared])),
    );

    let removed = h.orchestrator.delete_fact("x").unwrap();
    assert_eq!(removed.id, "x");
    assert!(h.local.sync_state().tombstone_for("x").is_some());

    h.clock.advance(Duration::seconds(2));
    let result = completed(h.orchestrator.tick());
    assert_eq!(result.deleted_from_cloud, vec!["x".to_string()]);
    assert!(h.local.identity().unwrap().is_empty());
    assert!(h.remote.identity().unwrap().is_empty());
}

#[test]
fn deleting_unknown_fact_is_an_error() {
    let h = harness(Store::new(), None);
    let err = h.orchestrator.delete_fact("nope").unwrap_err();
    assert!(matches!(err, AreteError::FactNotFound { ref id } if id == "nope"));
    assert_eq!(h.orchestrator.pending_count(), 0);
}

#[test]
fn cleanup_archives_and_queues_a_sync() {
    let h = harness(
        Store::with_facts(vec![
            FactBuilder::new("old", "Uses Vim").confidence(0.5).aged_days(400).build(),
            FactBuilder::new("new", "Uses Helix").confidence(0.9).build(),
        ]),
        None,
    );

    let report = h.orchestrator.run_cleanup().unwrap();
    assert_eq!(report.archived_count, 1);
    assert_eq!(h.archive.batches().len(), 1);
    assert_eq!(h.orchestrator.pending_count(), 1);

    h.clock.advance(Duration::seconds(2));
    completed(h.orchestrator.tick());
    assert_eq!(h.remote.identity().unwrap().ids(), vec!["new"]);
}

#[test]
fn shutdown_clears_queue_and_is_idempotent() {
    let h = harness(Store::new(), None);
    h.orchestrator.queue_sync(SyncKind::Identity);
    h.orchestrator.shutdown();
    h.orchestrator.shutdown();

    assert_eq!(h.orchestrator.pending_count(), 0);
    assert_eq!(h.orchestrator.status(), SyncStatus::Stopped);
    assert!(!h.orchestrator.queue_sync(SyncKind::Identity));
    h.clock.advance(Duration::minutes(10));
    assert!(h.orchestrator.tick().is_none());
    assert_eq!(h.remote.fetches(), 0);
}

#[test]
fn old_tombstones_are_pruned_after_a_successful_cycle() {
    let h = harness(Store::new(), None);
    let mut state = SyncState::default();
    state.add_tombstone("ancient", fixed_now() - Duration::days(120));
    state.add_tombstone("recent", fixed_now() - Duration::days(10));
    h.local.set_sync_state(state);

    completed(h.orchestrator.initialize());
    let state = h.local.sync_state();
    assert!(state.tombstone_for("ancient").is_none());
    assert!(state.tombstone_for("recent").is_some());
}

#[test]
fn local_save_failure_is_caught_and_recorded() {
    let h = harness(Store::new(), Some(Store::with_facts(vec![fact("a", "A fact", 0.5, ts(2024, 1, 1))])));
    h.local.fail_saves(true);

    match h.orchestrator.initialize() {
        Some(SyncOutcome::Failed { error, .. }) => assert!(error.contains("injected save failure")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(h.remote.saves(), 0);
    assert_eq!(h.orchestrator.status(), SyncStatus::Backoff);
}

#[test]
fn first_store_takes_the_configured_half_life() {
    let config = AreteConfig::from_toml("[decay]\ndefault_half_life_days = 30.0\n").unwrap();
    let local = Arc::new(MemoryLocalStore::new());
    let orchestrator = SyncOrchestrator::new(
        &config,
        local.clone(),
        Arc::new(MemoryArchive::new()),
        None,
        Arc::new(ManualClock::new(fixed_now())),
    );

    assert_eq!(orchestrator.identity().unwrap().settings.decay_half_life_days, 30.0);
    orchestrator
        .add_fact(FactDraft::new(Category::Context, "Lives in Lisbon"))
        .unwrap();
    assert_eq!(local.identity().unwrap().settings.decay_half_life_days, 30.0);
}

#[test]
fn find_fact_uses_the_configured_match_threshold() {
    let store = Store::with_facts(vec![fact("d", "Prefers dark mode", 0.7, ts(2024, 1, 1))]);

    let h = harness(store.clone(), None);
    let (hit, score) = h.orchestrator.find_fact("prefers dark themes").unwrap().unwrap();
    assert_eq!(hit.id, "d");
    assert!(score < 1.0);
    assert!(h.orchestrator.find_fact("Speaks Japanese").unwrap().is_none());

    let strict = AreteConfig::from_toml("[dedup]\nmatch_threshold = 0.99\n").unwrap();
    let h = harness_with(&strict, store, None);
    assert!(h.orchestrator.find_fact("prefers dark themes").unwrap().is_none());
    assert!(h.orchestrator.find_fact("Prefers dark mode.").unwrap().is_some());
}

#[test]
fn reaffirming_promotes_and_queues_a_sync() {
    let h = harness(Store::with_facts(vec![fact("r", "Writes Rust", 0.7, ts(2024, 1, 1))]), None);

    let once = h.orchestrator.reaffirm_fact("r").unwrap();
    assert_eq!(once.validation_count, 1);
    assert_eq!(once.maturity, Maturity::Candidate);
    assert_eq!(once.last_validated, fixed_now());
    assert_eq!(h.orchestrator.pending_count(), 1);
    assert!(h.local.sync_state().pending_push);

    let twice = h.orchestrator.reaffirm_fact("r").unwrap();
    assert_eq!(twice.maturity, Maturity::Established);
    assert_eq!(h.local.identity().unwrap().get("r"), Some(&twice));

    let err = h.orchestrator.reaffirm_fact("missing").unwrap_err();
    assert!(matches!(err, AreteError::FactNotFound { .. }));
}

#[test]
fn reaffirming_respects_auto_promote_off() {
    let mut store = Store::with_facts(vec![fact("r", "Writes Rust", 0.7, ts(2024, 1, 1))]);
    store.settings.auto_promote = false;
    let h = harness(store, None);

    for _ in 0..6 {
        h.orchestrator.reaffirm_fact("r").unwrap();
    }
    let stored = h.local.identity().unwrap();
    assert_eq!(stored.facts[0].validation_count, 6);
    assert_eq!(stored.facts[0].maturity, Maturity::Candidate);
}

#[test]
fn inferred_facts_honor_store_settings() {
    let mut store = Store::with_facts(vec![FactBuilder::new("d", "Prefers dark mode")
        .category(Category::Preference)
        .build()]);
    store.settings.excluded_domains = vec!["bank.example".into()];
    let h = harness(store, None);

    let excluded = h
        .orchestrator
        .offer_inferred(FactDraft::new(Category::Focus, "Paying off a mortgage"), Some("login.bank.example"))
        .unwrap();
    assert_eq!(excluded, Inference::ExcludedDomain);

    match h
        .orchestrator
        .offer_inferred(FactDraft::new(Category::Preference, "prefers dark mode!"), None)
        .unwrap()
    {
        Inference::Reaffirmed(fact) => {
            assert_eq!(fact.id, "d");
            assert_eq!(fact.validation_count, 1);
        }
        other => panic!("expected a reaffirmation, got {other:?}"),
    }

    // Same words in another category are a different fact.
    match h
        .orchestrator
        .offer_inferred(FactDraft::new(Category::Focus, "Prefers dark mode"), Some("news.example"))
        .unwrap()
    {
        Inference::Added(fact) => assert_eq!(fact.source, FactSource::Inferred),
        other => panic!("expected an added fact, got {other:?}"),
    }
    assert_eq!(h.local.identity().unwrap().len(), 2);
    assert_eq!(h.orchestrator.pending_count(), 1);
}

#[test]
fn inference_switched_off_leaves_the_store_alone() {
    let mut store = Store::new();
    store.settings.auto_infer = false;
    let h = harness(store, None);

    let outcome = h
        .orchestrator
        .offer_inferred(FactDraft::new(Category::Expertise, "Writes Rust"), None)
        .unwrap();
    assert_eq!(outcome, Inference::Disabled);
    assert!(h.local.identity().unwrap().is_empty());
    assert_eq!(h.local.identity_saves(), 0);
    assert_eq!(h.orchestrator.pending_count(), 0);
}
