//! # arete-core
//!
//! Foundation crate for the Arete identity store.
//! Defines the fact model, the store and sync-state records, errors, config,
//! constants, and the collaborator traits (remote store, local persistence,
//! archive sink, clock). Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod fact;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::AreteConfig;
pub use errors::{AreteError, AreteResult};
pub use fact::{Category, Confidence, Fact, FactDraft, FactSource, Maturity, Visibility};
pub use models::{CoreProfile, IdentitySettings, MergeConflict, MergeResult, Resolution, Store, SyncState, Tombstone};
