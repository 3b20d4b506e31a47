use serde::{Deserialize, Serialize};

use super::defaults;

/// Remote store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    /// Remote endpoint URL. `None` keeps the device local-only.
    pub endpoint_url: Option<String>,
    /// Bearer token sent with every request.
    pub api_token: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Retries per request before the cycle is counted as failed.
    pub max_retries: u32,
}

impl CloudConfig {
    pub fn is_configured(&self) -> bool {
        self.endpoint_url
            .as_deref()
            .is_some_and(|u| !u.trim().is_empty())
    }
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            api_token: None,
            timeout_secs: defaults::DEFAULT_CLOUD_TIMEOUT_SECS,
            max_retries: defaults::DEFAULT_CLOUD_MAX_RETRIES,
        }
    }
}
