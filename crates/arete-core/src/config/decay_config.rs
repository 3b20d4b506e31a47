use serde::{Deserialize, Serialize};

use super::defaults;

/// Decay subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayConfig {
    /// Half-life written into newly created stores (days).
    pub default_half_life_days: f64,
    /// Effective confidence below which facts are archived.
    pub archival_threshold: f64,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            default_half_life_days: defaults::DEFAULT_HALF_LIFE_DAYS,
            archival_threshold: defaults::DEFAULT_ARCHIVAL_THRESHOLD,
        }
    }
}
