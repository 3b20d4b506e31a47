//! The sync orchestrator: one explicit instance per process, owning the
//! scheduler and serializing every write to the local store.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use arete_consolidation::{find_best_match, find_by_content};
use arete_core::config::defaults::MAX_TOMBSTONE_RETENTION_DAYS;
use arete_core::errors::{AreteError, AreteResult, CloudError};
use arete_core::traits::{Clock, IArchiveSink, ILocalStore, IRemoteStore};
use arete_core::{AreteConfig, Fact, FactDraft, FactSource, MergeResult, Store, SyncState};
use chrono::{DateTime, Utc};
use arete_decay::{Archiver, CleanupReport};
use arete_observability::events;

use super::scheduler::{SyncCycle, SyncKind, SyncScheduler};
use super::status::SyncStatus;
use crate::merge::Merger;

/// Result of one cycle handed out by [`SyncOrchestrator::tick`].
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    Completed(MergeResult),
    Failed { error: String, backoff: Duration },
}

/// What happened to a fact offered by the extraction pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Inference {
    /// The store has `autoInfer` switched off.
    Disabled,
    /// The fact came from a domain on the exclusion list.
    ExcludedDomain,
    /// A same-category fact already said this and was reaffirmed instead.
    Reaffirmed(Fact),
    Added(Fact),
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// Coordinates local edits, maintenance and sync cycles.
///
/// Two locks with separate jobs: the scheduler lock is held only for state
/// transitions, so [`queue_sync`](Self::queue_sync) never waits on network
/// I/O. The writer gate is held for a whole cycle and for every local edit,
/// so the store has a single writer at any moment.
pub struct SyncOrchestrator {
    local: Arc<dyn ILocalStore>,
    remote: Option<Arc<dyn IRemoteStore>>,
    clock: Arc<dyn Clock>,
    archiver: Archiver,
    merger: Merger,
    match_threshold: f64,
    default_half_life_days: f64,
    tombstone_retention: chrono::Duration,
    scheduler: Mutex<SyncScheduler>,
    gate: Mutex<()>,
    initialized: Mutex<bool>,
    last_merge: Mutex<Option<MergeResult>>,
}

impl SyncOrchestrator {
    /// Build an orchestrator. `remote: None` makes it permanently local-only.
    pub fn new(
        config: &AreteConfig,
        local: Arc<dyn ILocalStore>,
        archive: Arc<dyn IArchiveSink>,
        remote: Option<Arc<dyn IRemoteStore>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let archiver = Archiver::new(Arc::clone(&local), archive, Arc::clone(&clock))
            .with_threshold(config.decay.archival_threshold);
        let scheduler = SyncScheduler::new(&config.sync, remote.is_none());
        Self {
            local,
            remote,
            clock,
            archiver,
            merger: Merger::new(config.dedup.similarity_threshold),
            match_threshold: config.dedup.match_threshold,
            default_half_life_days: config.decay.default_half_life_days,
            tombstone_retention: chrono::Duration::days(
                config
                    .sync
                    .tombstone_retention_days
                    .clamp(0, MAX_TOMBSTONE_RETENTION_DAYS),
            ),
            scheduler: Mutex::new(scheduler),
            gate: Mutex::new(()),
            initialized: Mutex::new(false),
            last_merge: Mutex::new(None),
        }
    }

    /// First start. Local-only stays idle for good; otherwise one cycle runs
    /// right away. Only the first call does anything.
    pub fn initialize(&self) -> Option<SyncOutcome> {
        {
            let mut initialized = lock(&self.initialized);
            if *initialized {
                return None;
            }
            *initialized = true;
        }
        if self.remote.is_none() {
            tracing::info!("no remote store configured, running local-only");
            return None;
        }
        let now = self.clock.now();
        if !lock(&self.scheduler).queue_immediate(SyncKind::Identity, now) {
            return None;
        }
        self.tick()
    }

    /// Ask for a sync of `kind` after the debounce. Ignored when local-only
    /// or after shutdown.
    pub fn queue_sync(&self, kind: SyncKind) -> bool {
        let now = self.clock.now();
        lock(&self.scheduler).queue(kind, now)
    }

    /// Run a cycle if one is due. Returns `None` when nothing was due.
    pub fn tick(&self) -> Option<SyncOutcome> {
        let now = self.clock.now();
        let cycle = lock(&self.scheduler).poll(now)?;
        Some(self.run_cycle(cycle))
    }

    fn run_cycle(&self, cycle: SyncCycle) -> SyncOutcome {
        let kinds: Vec<&str> = cycle.kinds.iter().map(|k| k.as_str()).collect();
        events::sync_started(&kinds);

        let result = {
            let _gate = lock(&self.gate);
            self.sync_kinds(&cycle.kinds)
        };
        let now = self.clock.now();

        match result {
            Ok(merge) => {
                lock(&self.scheduler).complete_success(now);
                if let Some(merge) = &merge {
                    events::sync_completed(
                        merge.added.len(),
                        merge.updated.len(),
                        merge.conflicts.len(),
                        merge.deleted_from_cloud.len(),
                    );
                    *lock(&self.last_merge) = Some(merge.clone());
                }
                SyncOutcome::Completed(merge.unwrap_or_default())
            }
            Err(err) => {
                let message = err.to_string();
                let (backoff, errors) = {
                    let mut scheduler = lock(&self.scheduler);
                    let backoff = scheduler.complete_failure(cycle, now);
                    (backoff, scheduler.consecutive_errors())
                };
                self.record_failure(&message);
                events::sync_failed(&message, errors, backoff, err.is_transient());
                SyncOutcome::Failed {
                    error: message,
                    backoff,
                }
            }
        }
    }

    fn sync_kinds(&self, kinds: &[SyncKind]) -> AreteResult<Option<MergeResult>> {
        let mut merge = None;
        for kind in kinds {
            match kind {
                SyncKind::Identity => merge = Some(self.sync_identity()?),
            }
        }
        Ok(merge)
    }

    /// Pull, merge, save locally, push, then record the cycle.
    /// Caller holds the writer gate.
    fn sync_identity(&self) -> AreteResult<MergeResult> {
        let remote = self.remote.as_ref().ok_or(CloudError::NotConfigured)?;

        let local = self.load_or_new()?;
        let mut sync_state = self.local.load_sync_state()?;

        let mut pulled = remote.fetch_identity()?.unwrap_or_default();
        let pulled_at = self.clock.now();
        let invalid = pulled.retain_valid();
        if !invalid.is_empty() {
            events::invalid_facts_dropped("remote", &invalid);
        }

        let merge = self.merger.merge(&local, &pulled, &sync_state);
        self.local.save_identity(&merge.store)?;
        remote.save_identity(&merge.store)?;

        let pushed_at = self.clock.now();
        sync_state.record_success(pulled_at, pushed_at);
        let cutoff = pushed_at
            .checked_sub_signed(self.tombstone_retention)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let pruned = sync_state.prune_tombstones(cutoff);
        if pruned > 0 {
            tracing::debug!(pruned, "expired tombstones pruned");
        }
        self.local.save_sync_state(&sync_state)?;
        Ok(merge)
    }

    fn record_failure(&self, message: &str) {
        let _gate = lock(&self.gate);
        let saved = self.local.load_sync_state().and_then(|mut state| {
            state.record_failure(message);
            self.local.save_sync_state(&state)
        });
        if let Err(e) = saved {
            tracing::warn!(error = %e, "could not record sync failure");
        }
    }

    /// Create a fact from `draft` and store it.
    pub fn add_fact(&self, draft: FactDraft) -> AreteResult<Fact> {
        let fact = draft.into_fact(self.clock.now())?;
        self.record_fact(fact.clone())?;
        Ok(fact)
    }

    /// Insert or replace a fact, then queue an identity sync.
    pub fn record_fact(&self, fact: Fact) -> AreteResult<()> {
        fact.validate()?;
        {
            let _gate = lock(&self.gate);
            let mut store = self.load_or_new()?;
            store.upsert(fact)?;
            self.local.save_identity(&store)?;
            self.mark_pending_push(|_| {})?;
        }
        self.queue_sync(SyncKind::Identity);
        Ok(())
    }

    /// Reaffirm a fact: count the validation and, when the store allows
    /// it, promote its maturity. Queues an identity sync.
    pub fn reaffirm_fact(&self, id: &str) -> AreteResult<Fact> {
        let fact = {
            let _gate = lock(&self.gate);
            let mut store = self.load_or_new()?;
            let fact = reaffirm_in(&mut store, id, self.clock.now())?;
            self.local.save_identity(&store)?;
            self.mark_pending_push(|_| {})?;
            fact
        };
        self.queue_sync(SyncKind::Identity);
        Ok(fact)
    }

    /// Offer a fact produced by the extraction pipeline.
    ///
    /// Honors the store's `autoInfer` switch and excluded domains. When a
    /// same-category fact already matches the content, that fact is
    /// reaffirmed rather than adding a near-duplicate.
    pub fn offer_inferred(&self, draft: FactDraft, domain: Option<&str>) -> AreteResult<Inference> {
        let outcome = {
            let _gate = lock(&self.gate);
            let mut store = self.load_or_new()?;
            if !store.settings.auto_infer {
                return Ok(Inference::Disabled);
            }
            if domain.is_some_and(|d| store.settings.is_domain_excluded(d)) {
                return Ok(Inference::ExcludedDomain);
            }

            let now = self.clock.now();
            let same_category: Vec<&Fact> = store
                .facts
                .iter()
                .filter(|f| f.category == draft.category)
                .collect();
            let existing = find_best_match(
                &draft.content,
                &same_category,
                |f| f.content.as_str(),
                self.match_threshold,
            )
            .map(|(f, _)| f.id.clone());

            let outcome = match existing {
                Some(id) => Inference::Reaffirmed(reaffirm_in(&mut store, &id, now)?),
                None => {
                    let fact = draft.source(FactSource::Inferred).into_fact(now)?;
                    store.insert(fact.clone())?;
                    Inference::Added(fact)
                }
            };
            self.local.save_identity(&store)?;
            self.mark_pending_push(|_| {})?;
            outcome
        };
        self.queue_sync(SyncKind::Identity);
        Ok(outcome)
    }

    /// Fact whose content best matches `query` at the configured match
    /// threshold, with its score.
    pub fn find_fact(&self, query: &str) -> AreteResult<Option<(Fact, f64)>> {
        let store = self.load_or_new()?;
        Ok(find_by_content(&store, query, self.match_threshold).map(|(f, score)| (f.clone(), score)))
    }

    /// Remove a fact and tombstone its id so the remote copy is not pulled back.
    pub fn delete_fact(&self, id: &str) -> AreteResult<Fact> {
        let removed = {
            let _gate = lock(&self.gate);
            let mut store = self.load_or_new()?;
            let removed = store
                .remove(id)
                .ok_or_else(|| AreteError::FactNotFound { id: id.to_string() })?;
            self.local.save_identity(&store)?;
            let now = self.clock.now();
            self.mark_pending_push(|state| state.add_tombstone(id, now))?;
            removed
        };
        self.queue_sync(SyncKind::Identity);
        Ok(removed)
    }

    /// Archive expired facts. Queues a sync when anything was archived.
    pub fn run_cleanup(&self) -> AreteResult<CleanupReport> {
        let report = {
            let _gate = lock(&self.gate);
            self.archiver.run_cleanup()?
        };
        if report.archived_count > 0 {
            self.queue_sync(SyncKind::Identity);
        }
        Ok(report)
    }

    /// The local store, or a fresh one carrying the configured half-life.
    fn load_or_new(&self) -> AreteResult<Store> {
        Ok(self.local.load_identity()?.unwrap_or_else(|| {
            let mut store = Store::new();
            store.settings.decay_half_life_days = self.default_half_life_days;
            store
        }))
    }

    fn mark_pending_push(&self, edit: impl FnOnce(&mut SyncState)) -> AreteResult<()> {
        let mut state = self.local.load_sync_state()?;
        edit(&mut state);
        state.pending_push = true;
        self.local.save_sync_state(&state)
    }

    /// Stop scheduling. Idempotent; a running cycle finishes.
    pub fn shutdown(&self) {
        lock(&self.scheduler).shutdown();
    }

    pub fn is_stopped(&self) -> bool {
        lock(&self.scheduler).is_shut_down()
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.scheduler).pending_count()
    }

    /// Remote configured, not shut down, and not backing off after failures.
    pub fn is_online(&self) -> bool {
        if self.remote.is_none() {
            return false;
        }
        let scheduler = lock(&self.scheduler);
        !scheduler.is_shut_down() && scheduler.consecutive_errors() == 0
    }

    pub fn status(&self) -> SyncStatus {
        if self.remote.is_none() {
            return SyncStatus::LocalOnly;
        }
        let scheduler = lock(&self.scheduler);
        if scheduler.is_shut_down() && scheduler.phase() != super::SyncPhase::Syncing {
            return SyncStatus::Stopped;
        }
        SyncStatus::from_phase(scheduler.phase())
    }

    pub fn last_merge_result(&self) -> Option<MergeResult> {
        lock(&self.last_merge).clone()
    }

    pub fn sync_state(&self) -> AreteResult<SyncState> {
        self.local.load_sync_state()
    }

    /// Current local store; empty when nothing has been saved yet.
    pub fn identity(&self) -> AreteResult<Store> {
        self.load_or_new()
    }
}

fn reaffirm_in(store: &mut Store, id: &str, now: DateTime<Utc>) -> AreteResult<Fact> {
    let auto_promote = store.settings.auto_promote;
    let fact = store
        .get_mut(id)
        .ok_or_else(|| AreteError::FactNotFound { id: id.to_string() })?;
    fact.reaffirm(now, auto_promote);
    Ok(fact.clone())
}
