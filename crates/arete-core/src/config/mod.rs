pub mod cloud_config;
pub mod decay_config;
pub mod dedup_config;
pub mod defaults;
pub mod observability_config;
pub mod storage_config;
pub mod sync_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use cloud_config::CloudConfig;
pub use decay_config::DecayConfig;
pub use dedup_config::DedupConfig;
pub use observability_config::ObservabilityConfig;
pub use storage_config::StorageConfig;
pub use sync_config::SyncConfig;

use crate::errors::{AreteError, AreteResult};

/// Top-level configuration. Every section falls back to its defaults, so an
/// empty TOML document is a valid config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AreteConfig {
    pub storage: StorageConfig,
    pub decay: DecayConfig,
    pub dedup: DedupConfig,
    pub sync: SyncConfig,
    pub cloud: CloudConfig,
    pub observability: ObservabilityConfig,
}

impl AreteConfig {
    /// Parse a TOML document.
    pub fn from_toml(raw: &str) -> AreteResult<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| AreteError::ConfigError {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> AreteResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::from_toml(&raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(AreteError::ConfigError {
                reason: format!("{}: {e}", path.display()),
            }),
        }
    }

    fn validate(&self) -> AreteResult<()> {
        let invalid = |reason: &str| {
            Err(AreteError::ConfigError {
                reason: reason.to_string(),
            })
        };
        let half_life = self.decay.default_half_life_days;
        if half_life.is_nan() || half_life <= 0.0 {
            return invalid("decay.default_half_life_days must be > 0");
        }
        if !(0.0..=1.0).contains(&self.decay.archival_threshold) {
            return invalid("decay.archival_threshold must be within [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.dedup.similarity_threshold)
            || !(0.0..=1.0).contains(&self.dedup.match_threshold)
        {
            return invalid("dedup thresholds must be within [0, 1]");
        }
        if self.sync.backoff_base_ms == 0 || self.sync.backoff_cap_ms < self.sync.backoff_base_ms {
            return invalid("sync.backoff_cap_ms must be >= sync.backoff_base_ms > 0");
        }
        if self.sync.debounce_ms > defaults::MAX_DEBOUNCE_MS {
            return invalid("sync.debounce_ms must be at most one hour");
        }
        if self.sync.backoff_cap_ms > defaults::MAX_BACKOFF_CAP_MS {
            return invalid("sync.backoff_cap_ms must be at most one day");
        }
        if !(0..=defaults::MAX_TOMBSTONE_RETENTION_DAYS).contains(&self.sync.tombstone_retention_days) {
            return invalid("sync.tombstone_retention_days must be within [0, 36500]");
        }
        Ok(())
    }
}
