//! # arete-decay
//!
//! Exponential half-life decay of fact confidence, expiry detection, threshold
//! selection for export, and the cleanup pass that archives expired facts.

pub mod archival;
pub mod cleanup;
pub mod engine;
pub mod formula;
pub mod selection;

pub use archival::{find_expired, ArchivalDecision, DEFAULT_ARCHIVAL_THRESHOLD};
pub use cleanup::{Archiver, CleanupReport};
pub use engine::DecayEngine;
pub use formula::{effective_confidence, DecayBreakdown};
pub use selection::{select_facts, FactFilter};
