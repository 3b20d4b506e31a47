/// Arete system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Seconds in one day, used by all age computations.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Half-life used when a store carries a non-positive or non-finite value.
pub const FALLBACK_HALF_LIFE_DAYS: f64 = 60.0;

/// Validation count at which a candidate fact is promoted to established.
pub const PROMOTE_TO_ESTABLISHED_AT: u32 = 2;

/// Validation count at which an established fact is promoted to proven.
pub const PROMOTE_TO_PROVEN_AT: u32 = 5;

/// Maximum length of the prefix considered by the Winkler boost.
pub const WINKLER_MAX_PREFIX: usize = 4;

/// Winkler prefix scaling factor.
pub const WINKLER_PREFIX_SCALE: f64 = 0.1;
