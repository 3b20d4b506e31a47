//! # arete-observability
//!
//! Structured logging for the identity store: subscriber setup driven by
//! [`ObservabilityConfig`](arete_core::config::ObservabilityConfig) and one
//! event function per notable sync or maintenance outcome.

pub mod tracing_setup;

pub use tracing_setup::events;
pub use tracing_setup::{init_tracing, init_tracing_with_filter};
