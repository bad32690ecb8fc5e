//! Cooldown gate limiting how often a suggestion may surface.
//!
//! The last-allowed timestamp is process-wide mutable state read and
//! conditionally written by every concurrent decision cycle, so the whole
//! check-and-set runs under one lock acquisition — two concurrent callers
//! can never both observe "allowed" within one cooldown window.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, info};

/// Time source for the throttle, injectable so tests can drive time.
pub trait Clock: Send + Sync {
    /// Current monotonic time.
    fn now(&self) -> Instant;
}

/// The real monotonic clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock for tests.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    /// Start at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

/// Cooldown-based rate limiter over a single shared last-allowed timestamp.
pub struct ProactivityThrottle {
    cooldown: Duration,
    clock: Arc<dyn Clock>,
    last_allowed: Mutex<Option<Instant>>,
}

impl std::fmt::Debug for ProactivityThrottle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProactivityThrottle")
            .field("cooldown", &self.cooldown)
            .field("last_allowed", &*self.last_allowed.lock())
            .finish_non_exhaustive()
    }
}

impl ProactivityThrottle {
    /// Create a throttle on the system clock.
    ///
    /// A zero cooldown disables throttling: elapsed time is always ≥ 0, so
    /// every call is allowed.
    #[must_use]
    pub fn new(cooldown: Duration) -> Self {
        Self::with_clock(cooldown, Arc::new(SystemClock))
    }

    /// Create a throttle on an injected clock.
    #[must_use]
    pub fn with_clock(cooldown: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            cooldown,
            clock,
            last_allowed: Mutex::new(None),
        }
    }

    /// Whether a suggestion may surface now.
    ///
    /// Allows and records the first-ever call; afterwards allows only when
    /// the cooldown has fully elapsed since the last allowed call. A denial
    /// leaves the recorded timestamp unchanged.
    pub fn allow(&self) -> bool {
        let now = self.clock.now();
        let mut last_allowed = self.last_allowed.lock();

        match *last_allowed {
            None => {
                *last_allowed = Some(now);
                info!("proactivity throttle allowed (first suggestion)");
                true
            }
            Some(last) => {
                let elapsed = now.duration_since(last);
                if elapsed >= self.cooldown {
                    *last_allowed = Some(now);
                    info!(?elapsed, cooldown = ?self.cooldown, "proactivity throttle allowed");
                    true
                } else {
                    debug!(
                        ?elapsed,
                        remaining = ?(self.cooldown - elapsed),
                        "proactivity throttle denied"
                    );
                    false
                }
            }
        }
    }

    /// The configured cooldown.
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const COOLDOWN: Duration = Duration::from_secs(600);

    fn throttle() -> (ProactivityThrottle, ManualClock) {
        let clock = ManualClock::new();
        let throttle = ProactivityThrottle::with_clock(COOLDOWN, Arc::new(clock.clone()));
        (throttle, clock)
    }

    #[test]
    fn first_call_is_allowed() {
        let (throttle, _clock) = throttle();
        assert!(throttle.allow());
    }

    #[test]
    fn call_within_cooldown_is_denied() {
        let (throttle, clock) = throttle();
        assert!(throttle.allow());
        clock.advance(Duration::from_secs(60));
        assert!(!throttle.allow());
    }

    #[test]
    fn denial_leaves_timestamp_unchanged() {
        let (throttle, clock) = throttle();
        assert!(throttle.allow());

        // Denied at t+9m; if the denial had reset the window, t+11m would
        // still be inside it.
        clock.advance(Duration::from_secs(540));
        assert!(!throttle.allow());
        clock.advance(Duration::from_secs(120));
        assert!(throttle.allow());
    }

    #[test]
    fn call_at_exact_cooldown_boundary_is_allowed() {
        let (throttle, clock) = throttle();
        assert!(throttle.allow());
        clock.advance(COOLDOWN);
        assert!(throttle.allow());
    }

    #[test]
    fn zero_cooldown_always_allows() {
        let clock = ManualClock::new();
        let throttle =
            ProactivityThrottle::with_clock(Duration::ZERO, Arc::new(clock.clone()));
        assert!(throttle.allow());
        assert!(throttle.allow());
        clock.advance(Duration::from_millis(1));
        assert!(throttle.allow());
    }

    #[test]
    fn concurrent_callers_cannot_double_spend_a_window() {
        let clock = ManualClock::new();
        let throttle = Arc::new(ProactivityThrottle::with_clock(
            COOLDOWN,
            Arc::new(clock.clone()),
        ));
        clock.advance(COOLDOWN); // warm past any startup edge

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let throttle = Arc::clone(&throttle);
                std::thread::spawn(move || throttle.allow())
            })
            .collect();
        let allowed = handles
            .into_iter()
            .map(|h| h.join())
            .filter(|r| matches!(r, Ok(true)))
            .count();
        assert_eq!(allowed, 1);
    }

    proptest! {
        /// Whatever the advance pattern, two allowed calls are never closer
        /// than the cooldown.
        #[test]
        fn allowed_calls_respect_minimum_gap(advances in prop::collection::vec(0u64..1200, 1..40)) {
            let clock = ManualClock::new();
            let throttle =
                ProactivityThrottle::with_clock(COOLDOWN, Arc::new(clock.clone()));

            let mut since_last_allowed: Option<Duration> = None;
            for secs in advances {
                clock.advance(Duration::from_secs(secs));
                since_last_allowed = since_last_allowed.map(|d| d + Duration::from_secs(secs));
                if throttle.allow() {
                    if let Some(gap) = since_last_allowed {
                        prop_assert!(gap >= COOLDOWN, "gap {gap:?} below cooldown");
                    }
                    since_last_allowed = Some(Duration::ZERO);
                }
            }
        }
    }
}
