//! Sync orchestration: scheduling, the pull/merge/push cycle, and the ticker.

pub mod orchestrator;
pub mod scheduler;
pub mod status;
pub mod ticker;

pub use orchestrator::{Inference, SyncOrchestrator, SyncOutcome};
pub use scheduler::{backoff_delay, SyncCycle, SyncKind, SyncPhase, SyncScheduler};
pub use status::SyncStatus;
pub use ticker::SyncTicker;
