use arete_core::constants::{FALLBACK_HALF_LIFE_DAYS, SECONDS_PER_DAY};
use arete_core::Fact;
use chrono::{DateTime, Utc};

/// Half-life decay of a fact's stored confidence.
///
/// ```text
/// effective = confidence × 0.5 ^ (ageDays / halfLifeDays)
/// ageDays   = max(0, now − lastValidated) / 86400s
/// ```
///
/// A non-positive or non-finite half-life falls back to 60 days.
pub fn effective_confidence(fact: &Fact, half_life_days: f64, now: DateTime<Utc>) -> f64 {
    compute_breakdown(fact, half_life_days, now).effective
}

/// Each term of the decay computation, for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct DecayBreakdown {
    pub stored: f64,
    pub age_days: f64,
    pub half_life_days: f64,
    pub factor: f64,
    pub effective: f64,
}

/// Compute decay with every intermediate term.
pub fn compute_breakdown(fact: &Fact, half_life_days: f64, now: DateTime<Utc>) -> DecayBreakdown {
    let half_life = sanitize_half_life(half_life_days);
    let age_days = age_days(fact.last_validated, now);
    let stored = fact.confidence.value();

    let factor = if age_days == 0.0 {
        1.0
    } else {
        0.5_f64.powf(age_days / half_life)
    };

    DecayBreakdown {
        stored,
        age_days,
        half_life_days: half_life,
        factor,
        effective: stored * factor,
    }
}

/// Elapsed days between `since` and `now`, clamped to zero for future stamps.
pub fn age_days(since: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = (now - since).num_milliseconds().max(0) as f64;
    millis / 1000.0 / SECONDS_PER_DAY
}

fn sanitize_half_life(half_life_days: f64) -> f64 {
    if half_life_days.is_finite() && half_life_days > 0.0 {
        half_life_days
    } else {
        tracing::debug!(
            half_life_days,
            fallback = FALLBACK_HALF_LIFE_DAYS,
            "decay: invalid half-life, using fallback"
        );
        FALLBACK_HALF_LIFE_DAYS
    }
}
