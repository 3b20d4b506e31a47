use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::errors::AreteResult;
use crate::fact::Fact;

/// Append-only destination for archived facts.
pub trait IArchiveSink: Send + Sync {
    /// Persist `facts` as one batch stamped `archived_at`.
    ///
    /// An empty slice performs no I/O and returns `None`.
    fn archive(&self, facts: &[Fact], archived_at: DateTime<Utc>) -> AreteResult<Option<PathBuf>>;
}
