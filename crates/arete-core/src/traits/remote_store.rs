use crate::errors::AreteResult;
use crate::models::Store;

/// The remote copy of the identity store.
///
/// Both operations are fallible (network, auth); callers treat failures as
/// transient and retry through backoff.
pub trait IRemoteStore: Send + Sync {
    /// Fetch the remote store. `None` when nothing has been pushed yet.
    fn fetch_identity(&self) -> AreteResult<Option<Store>>;

    /// Replace the remote store.
    fn save_identity(&self, store: &Store) -> AreteResult<()>;
}
