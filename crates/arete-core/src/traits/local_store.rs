use crate::errors::AreteResult;
use crate::models::{Store, SyncState};

/// Local persistence for the identity store and the sync state.
///
/// Implementations treat corrupt data as absent (identity) or default
/// (sync state) and log it; they only return errors for I/O that failed.
pub trait ILocalStore: Send + Sync {
    fn load_identity(&self) -> AreteResult<Option<Store>>;
    fn save_identity(&self, store: &Store) -> AreteResult<()>;
    fn load_sync_state(&self) -> AreteResult<SyncState>;
    fn save_sync_state(&self, state: &SyncState) -> AreteResult<()>;
}
