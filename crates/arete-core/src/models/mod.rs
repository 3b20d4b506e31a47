pub mod merge_result;
pub mod store;
pub mod sync_state;

pub use merge_result::{MergeConflict, MergeResult, Resolution};
pub use store::{CoreProfile, IdentitySettings, Store};
pub use sync_state::{SyncState, Tombstone};
