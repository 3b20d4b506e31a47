//! # arete-storage
//!
//! File-backed implementations of the local persistence traits.
//!
//! A data directory holds `identity.json`, `sync-state.json` and an
//! `archive/` directory of append-only batches. Every rewrite goes through a
//! temp file in the same directory followed by a rename, so a crash leaves
//! either the old or the new content on disk.

pub mod archive;
mod atomic;
pub mod file_store;

pub use archive::{ArchiveBatch, FileArchive};
pub use file_store::FileStore;
