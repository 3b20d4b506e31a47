//! # arete-consolidation
//!
//! Text similarity and near-duplicate consolidation for facts.
//!
//! - [`algorithms::similarity`]: normalization, Jaro-Winkler, best-match lookup.
//! - [`dedup`]: collapses same-category facts that say the same thing,
//!   keeping the most confident (then most recent) copy.
//! - [`lookup`]: fuzzy search for a fact by its content.

pub mod algorithms;
pub mod dedup;
pub mod lookup;

pub use algorithms::similarity::{find_best_match, normalize, similarity, DEFAULT_MATCH_THRESHOLD};
pub use dedup::{are_similar, deduplicate, DedupOutcome, Deduplicator, DUPLICATE_THRESHOLD};
pub use lookup::find_by_content;
