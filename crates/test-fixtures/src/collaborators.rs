use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use arete_core::errors::{AreteResult, CloudError, StorageError};
use arete_core::traits::{IArchiveSink, ILocalStore, IRemoteStore};
use arete_core::{Fact, Store, SyncState};
use chrono::{DateTime, Utc};

fn guard<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// Local persistence held in memory.
#[derive(Debug, Default)]
pub struct MemoryLocalStore {
    identity: Mutex<Option<Store>>,
    sync_state: Mutex<SyncState>,
    identity_saves: AtomicUsize,
    fail_saves: Mutex<bool>,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(store: Store) -> Self {
        let local = Self::default();
        *guard(&local.identity) = Some(store);
        local
    }

    pub fn identity(&self) -> Option<Store> {
        guard(&self.identity).clone()
    }

    pub fn sync_state(&self) -> SyncState {
        guard(&self.sync_state).clone()
    }

    pub fn set_sync_state(&self, state: SyncState) {
        *guard(&self.sync_state) = state;
    }

    pub fn identity_saves(&self) -> usize {
        self.identity_saves.load(Ordering::SeqCst)
    }

    /// Make every subsequent save fail with an I/O error.
    pub fn fail_saves(&self, fail: bool) {
        *guard(&self.fail_saves) = fail;
    }

    fn check_save(&self) -> AreteResult<()> {
        if *guard(&self.fail_saves) {
            return Err(StorageError::Io {
                path: "memory".into(),
                reason: "injected save failure".into(),
            }
            .into());
        }
        Ok(())
    }
}

impl ILocalStore for MemoryLocalStore {
    fn load_identity(&self) -> AreteResult<Option<Store>> {
        Ok(self.identity())
    }

    fn save_identity(&self, store: &Store) -> AreteResult<()> {
        self.check_save()?;
        self.identity_saves.fetch_add(1, Ordering::SeqCst);
        *guard(&self.identity) = Some(store.clone());
        Ok(())
    }

    fn load_sync_state(&self) -> AreteResult<SyncState> {
        Ok(self.sync_state())
    }

    fn save_sync_state(&self, state: &SyncState) -> AreteResult<()> {
        self.check_save()?;
        *guard(&self.sync_state) = state.clone();
        Ok(())
    }
}

/// Remote store held in memory, with injectable network failures.
#[derive(Debug, Default)]
pub struct MemoryRemoteStore {
    identity: Mutex<Option<Store>>,
    failures_left: AtomicUsize,
    fetches: AtomicUsize,
    saves: AtomicUsize,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(store: Store) -> Self {
        let remote = Self::default();
        *guard(&remote.identity) = Some(store);
        remote
    }

    pub fn identity(&self) -> Option<Store> {
        guard(&self.identity).clone()
    }

    pub fn set_identity(&self, store: Store) {
        *guard(&self.identity) = Some(store);
    }

    /// Fail the next `n` calls (fetch or save) with a network error.
    pub fn fail_next(&self, n: usize) {
        self.failures_left.store(n, Ordering::SeqCst);
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn maybe_fail(&self) -> AreteResult<()> {
        let left = self.failures_left.load(Ordering::SeqCst);
        if left > 0 {
            self.failures_left.store(left - 1, Ordering::SeqCst);
            return Err(CloudError::NetworkError {
                reason: "injected network failure".into(),
            }
            .into());
        }
        Ok(())
    }
}

impl IRemoteStore for MemoryRemoteStore {
    fn fetch_identity(&self) -> AreteResult<Option<Store>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.maybe_fail()?;
        Ok(self.identity())
    }

    fn save_identity(&self, store: &Store) -> AreteResult<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.maybe_fail()?;
        *guard(&self.identity) = Some(store.clone());
        Ok(())
    }
}

/// Archive sink that keeps batches in memory.
#[derive(Debug, Default)]
pub struct MemoryArchive {
    batches: Mutex<Vec<(DateTime<Utc>, Vec<Fact>)>>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batches(&self) -> Vec<(DateTime<Utc>, Vec<Fact>)> {
        guard(&self.batches).clone()
    }
}

impl IArchiveSink for MemoryArchive {
    fn archive(&self, facts: &[Fact], archived_at: DateTime<Utc>) -> AreteResult<Option<PathBuf>> {
        if facts.is_empty() {
            return Ok(None);
        }
        let mut batches = guard(&self.batches);
        batches.push((archived_at, facts.to_vec()));
        Ok(Some(PathBuf::from(format!("memory://archive/{}", batches.len()))))
    }
}
