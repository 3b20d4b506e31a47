/// Remote store errors.
#[derive(Debug, thiserror::Error)]
pub enum CloudError {
    #[error("no remote store configured")]
    NotConfigured,

    #[error("authentication failed: {reason}")]
    AuthFailed { reason: String },

    #[error("network error: {reason}")]
    NetworkError { reason: String },

    #[error("remote rejected request with status {status}: {reason}")]
    Rejected { status: u16, reason: String },

    #[error("malformed remote payload: {reason}")]
    MalformedPayload { reason: String },
}

impl CloudError {
    /// Network failures are retried; everything else needs a fix elsewhere
    /// but still goes through backoff so the local store stays usable.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NetworkError { .. })
    }
}
