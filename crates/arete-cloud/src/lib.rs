//! # arete-cloud
//!
//! Keeps the local identity store and the remote copy convergent.
//!
//! - [`merge`]: pure three-way style merge of two stores with tombstones,
//!   last-writer-wins per id, conflict recording and cross-store dedup.
//! - [`sync`]: the debounce/backoff scheduler, the orchestrator that runs
//!   pull, merge, save and push cycles, and a background ticker.
//! - [`transport`]: the HTTP remote store. Real network I/O needs the
//!   `cloud` feature.

pub mod merge;
pub mod sync;
pub mod transport;

pub use merge::{merge, Merger};
pub use sync::{Inference, SyncKind, SyncOrchestrator, SyncOutcome, SyncPhase, SyncScheduler, SyncStatus, SyncTicker};
pub use transport::{HttpClient, HttpClientConfig, HttpRemoteStore};
