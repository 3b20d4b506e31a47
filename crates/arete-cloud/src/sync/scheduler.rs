//! Debounce and backoff as a pure state machine.
//!
//! The scheduler never reads a clock or sleeps. Callers pass `now` in and ask
//! [`SyncScheduler::poll`] whether a cycle is due, which keeps every timing
//! rule testable with a manual clock.

use std::collections::BTreeSet;
use std::fmt;

use arete_core::config::SyncConfig;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// What a queued sync covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum SyncKind {
    /// The fact store, profile and settings.
    Identity,
}

impl SyncKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SyncKind::Identity => "identity",
        }
    }
}

impl fmt::Display for SyncKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheduler phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncPhase {
    Idle,
    /// Changes queued, debounce running.
    Pending,
    /// A cycle is in flight.
    Syncing,
    /// Waiting out a failure before retrying.
    Backoff,
}

/// A cycle handed out by [`SyncScheduler::poll`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncCycle {
    pub kinds: Vec<SyncKind>,
}

/// Backoff after `errors` consecutive failures: `min(cap, base * 2^(errors-1))`.
pub fn backoff_delay(errors: u32, base_ms: u64, cap_ms: u64) -> std::time::Duration {
    let exponent = errors.saturating_sub(1).min(63);
    let factor = 1u64 << exponent;
    std::time::Duration::from_millis(base_ms.saturating_mul(factor).min(cap_ms))
}

/// `now + ms`, saturating at the latest representable instant.
fn deadline_after(now: DateTime<Utc>, ms: u64) -> DateTime<Utc> {
    let delta = Duration::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX));
    now.checked_add_signed(delta).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[derive(Debug)]
pub struct SyncScheduler {
    phase: SyncPhase,
    queued: BTreeSet<SyncKind>,
    /// When the debounce (pending) or the backoff wait (backoff) elapses.
    deadline: Option<DateTime<Utc>>,
    consecutive_errors: u32,
    debounce_ms: u64,
    backoff_base_ms: u64,
    backoff_cap_ms: u64,
    local_only: bool,
    shut_down: bool,
}

impl SyncScheduler {
    pub fn new(config: &SyncConfig, local_only: bool) -> Self {
        debug_assert!(config.backoff_base_ms > 0, "backoff base must be positive");
        debug_assert!(
            config.backoff_cap_ms >= config.backoff_base_ms,
            "backoff cap below base"
        );
        Self {
            phase: SyncPhase::Idle,
            queued: BTreeSet::new(),
            deadline: None,
            consecutive_errors: 0,
            debounce_ms: config.debounce_ms,
            backoff_base_ms: config.backoff_base_ms,
            backoff_cap_ms: config.backoff_cap_ms,
            local_only,
            shut_down: false,
        }
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn pending_count(&self) -> usize {
        self.queued.len()
    }

    pub fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors
    }

    pub fn is_local_only(&self) -> bool {
        self.local_only
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// When the next cycle may start, if one is scheduled.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        match self.phase {
            SyncPhase::Pending | SyncPhase::Backoff => self.deadline,
            SyncPhase::Idle | SyncPhase::Syncing => None,
        }
    }

    /// Queue `kind`. Returns whether it was accepted.
    ///
    /// In idle or pending the debounce restarts. While syncing or backing
    /// off the kind is retained for the next cycle and no timer moves.
    pub fn queue(&mut self, kind: SyncKind, now: DateTime<Utc>) -> bool {
        if self.local_only || self.shut_down {
            return false;
        }
        self.queued.insert(kind);
        match self.phase {
            SyncPhase::Idle | SyncPhase::Pending => {
                self.phase = SyncPhase::Pending;
                self.deadline = Some(deadline_after(now, self.debounce_ms));
            }
            SyncPhase::Syncing | SyncPhase::Backoff => {}
        }
        true
    }

    /// Queue `kind` with the debounce already elapsed.
    pub fn queue_immediate(&mut self, kind: SyncKind, now: DateTime<Utc>) -> bool {
        if !self.queue(kind, now) {
            return false;
        }
        if self.phase == SyncPhase::Pending {
            self.deadline = Some(now);
        }
        true
    }

    /// Hand out a cycle if one is due at `now`. At most one cycle is ever
    /// outstanding; while syncing this returns `None`.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<SyncCycle> {
        if self.shut_down || self.local_only {
            return None;
        }
        match self.phase {
            SyncPhase::Idle | SyncPhase::Syncing => return None,
            SyncPhase::Pending | SyncPhase::Backoff => {}
        }
        if self.deadline.is_some_and(|d| d > now) {
            return None;
        }
        if self.queued.is_empty() {
            self.phase = SyncPhase::Idle;
            self.deadline = None;
            return None;
        }
        self.phase = SyncPhase::Syncing;
        self.deadline = None;
        Some(SyncCycle {
            kinds: std::mem::take(&mut self.queued).into_iter().collect(),
        })
    }

    /// Record a successful cycle. Kinds queued meanwhile restart the debounce.
    pub fn complete_success(&mut self, now: DateTime<Utc>) {
        self.consecutive_errors = 0;
        if !self.shut_down && !self.queued.is_empty() {
            self.phase = SyncPhase::Pending;
            self.deadline = Some(deadline_after(now, self.debounce_ms));
        } else {
            self.phase = SyncPhase::Idle;
            self.deadline = None;
        }
    }

    /// Record a failed cycle: re-queue its kinds and back off.
    /// Returns the backoff applied.
    pub fn complete_failure(&mut self, cycle: SyncCycle, now: DateTime<Utc>) -> std::time::Duration {
        self.consecutive_errors = self.consecutive_errors.saturating_add(1);
        let delay = backoff_delay(
            self.consecutive_errors,
            self.backoff_base_ms,
            self.backoff_cap_ms,
        );
        if self.shut_down {
            self.phase = SyncPhase::Idle;
            self.deadline = None;
            return delay;
        }
        self.queued.extend(cycle.kinds);
        self.phase = SyncPhase::Backoff;
        self.deadline = Some(deadline_after(now, delay.as_millis().try_into().unwrap_or(u64::MAX)));
        delay
    }

    /// Cancel timers and drop queued kinds. Later queue calls are ignored.
    /// An in-flight cycle runs to completion.
    pub fn shutdown(&mut self) {
        self.shut_down = true;
        self.queued.clear();
        self.deadline = None;
        if self.phase != SyncPhase::Syncing {
            self.phase = SyncPhase::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler() -> SyncScheduler {
        SyncScheduler::new(&SyncConfig::default(), false)
    }

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn backoff_doubles_and_caps() {
        assert_eq!(backoff_delay(1, 5_000, 300_000).as_millis(), 5_000);
        assert_eq!(backoff_delay(2, 5_000, 300_000).as_millis(), 10_000);
        assert_eq!(backoff_delay(4, 5_000, 300_000).as_millis(), 40_000);
        assert_eq!(backoff_delay(7, 5_000, 300_000).as_millis(), 300_000);
        assert_eq!(backoff_delay(200, 5_000, 300_000).as_millis(), 300_000);
    }

    #[test]
    fn debounce_restarts_on_each_queue() {
        let mut s = scheduler();
        assert!(s.queue(SyncKind::Identity, t0()));
        assert_eq!(s.phase(), SyncPhase::Pending);
        s.queue(SyncKind::Identity, t0() + Duration::milliseconds(1_500));
        assert!(s.poll(t0() + Duration::milliseconds(2_500)).is_none());
        let cycle = s.poll(t0() + Duration::milliseconds(3_500)).unwrap();
        assert_eq!(cycle.kinds, vec![SyncKind::Identity]);
        assert_eq!(s.phase(), SyncPhase::Syncing);
        assert_eq!(s.pending_count(), 0);
    }

    #[test]
    fn only_one_cycle_in_flight() {
        let mut s = scheduler();
        s.queue_immediate(SyncKind::Identity, t0());
        assert!(s.poll(t0()).is_some());
        s.queue(SyncKind::Identity, t0());
        assert!(s.poll(t0() + Duration::hours(1)).is_none());
        assert_eq!(s.pending_count(), 1);

        s.complete_success(t0() + Duration::hours(1));
        assert_eq!(s.phase(), SyncPhase::Pending);
        assert_eq!(
            s.next_deadline(),
            Some(t0() + Duration::hours(1) + Duration::milliseconds(2_000))
        );
    }

    #[test]
    fn failure_requeues_and_backs_off() {
        let mut s = scheduler();
        s.queue_immediate(SyncKind::Identity, t0());
        let cycle = s.poll(t0()).unwrap();
        let delay = s.complete_failure(cycle, t0());
        assert_eq!(delay.as_millis(), 5_000);
        assert_eq!(s.phase(), SyncPhase::Backoff);
        assert_eq!(s.pending_count(), 1);

        // Queueing during backoff does not shorten the wait.
        s.queue(SyncKind::Identity, t0() + Duration::milliseconds(100));
        assert!(s.poll(t0() + Duration::milliseconds(4_999)).is_none());
        let retry = s.poll(t0() + Duration::milliseconds(5_000)).unwrap();

        let delay = s.complete_failure(retry, t0() + Duration::seconds(5));
        assert_eq!(delay.as_millis(), 10_000);
        assert_eq!(s.consecutive_errors(), 2);

        let retry = s.poll(t0() + Duration::seconds(15)).unwrap();
        assert_eq!(retry.kinds.len(), 1);
        s.complete_success(t0() + Duration::seconds(15));
        assert_eq!(s.consecutive_errors(), 0);
        assert_eq!(s.phase(), SyncPhase::Idle);
    }

    #[test]
    fn shutdown_is_idempotent_and_blocks_queueing() {
        let mut s = scheduler();
        s.queue(SyncKind::Identity, t0());
        s.shutdown();
        s.shutdown();
        assert_eq!(s.phase(), SyncPhase::Idle);
        assert_eq!(s.pending_count(), 0);
        assert!(!s.queue(SyncKind::Identity, t0()));
        assert!(s.poll(t0() + Duration::hours(1)).is_none());
    }

    #[test]
    fn huge_timings_saturate_instead_of_overflowing() {
        let config = SyncConfig {
            debounce_ms: u64::MAX,
            backoff_base_ms: u64::MAX,
            backoff_cap_ms: u64::MAX,
            ..SyncConfig::default()
        };
        let mut s = SyncScheduler::new(&config, false);
        let late = DateTime::<Utc>::MAX_UTC - Duration::days(1);

        assert!(s.queue(SyncKind::Identity, late));
        assert_eq!(s.next_deadline(), Some(DateTime::<Utc>::MAX_UTC));
        assert!(s.poll(late).is_none());

        s.queue_immediate(SyncKind::Identity, late);
        let cycle = s.poll(late).unwrap();
        s.complete_failure(cycle, late);
        assert_eq!(s.next_deadline(), Some(DateTime::<Utc>::MAX_UTC));
    }

    #[test]
    fn local_only_never_schedules() {
        let mut s = SyncScheduler::new(&SyncConfig::default(), true);
        assert!(!s.queue(SyncKind::Identity, t0()));
        assert_eq!(s.phase(), SyncPhase::Idle);
        assert!(s.poll(t0() + Duration::hours(1)).is_none());
    }
}
