// Single source of truth for all default values.

// --- Storage ---
pub const DEFAULT_DATA_DIR: &str = ".arete";
pub const DEFAULT_IDENTITY_FILE: &str = "identity.json";
pub const DEFAULT_SYNC_STATE_FILE: &str = "sync-state.json";
pub const DEFAULT_ARCHIVE_DIR: &str = "archive";

// --- Identity settings ---
pub const DEFAULT_HALF_LIFE_DAYS: f64 = 60.0;
pub const DEFAULT_AUTO_INFER: bool = true;
pub const DEFAULT_AUTO_PROMOTE: bool = true;

// --- Decay / archival ---
pub const DEFAULT_ARCHIVAL_THRESHOLD: f64 = 0.1;

// --- Deduplication / matching ---
pub const DEFAULT_DEDUP_SIMILARITY: f64 = 0.85;
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.8;

// --- Sync ---
pub const DEFAULT_DEBOUNCE_MS: u64 = 2_000;
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 5_000;
pub const DEFAULT_BACKOFF_CAP_MS: u64 = 300_000; // 5 minutes
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 250;
pub const DEFAULT_TOMBSTONE_RETENTION_DAYS: i64 = 90;
pub const MAX_DEBOUNCE_MS: u64 = 3_600_000; // 1 hour
pub const MAX_BACKOFF_CAP_MS: u64 = 86_400_000; // 1 day
pub const MAX_TOMBSTONE_RETENTION_DAYS: i64 = 36_500;

// --- Cloud ---
pub const DEFAULT_CLOUD_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CLOUD_MAX_RETRIES: u32 = 3;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_JSON: bool = false;
