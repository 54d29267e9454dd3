// Time types and the clock abstraction used by the node.
//
// Block timestamps come from a Clock so tests can freeze and advance time
// instead of sleeping.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, SystemTime, UNIX_EPOCH},
};

// Millis timestamps used to determine it using its type
pub type TimestampMillis = u64;

// Seconds timestamps used to determine it using its type
pub type TimestampSeconds = u64;

#[inline]
pub fn get_current_time() -> Duration {
    // A clock set before 1970 is reported as the epoch itself
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
}

pub fn get_current_time_in_seconds() -> TimestampSeconds {
    get_current_time().as_secs()
}

pub fn get_current_time_in_millis() -> TimestampMillis {
    get_current_time().as_millis() as TimestampMillis
}

/// Source of the current time for block production
pub trait Clock: Send + Sync {
    /// Current time in milliseconds since the unix epoch
    fn now_millis(&self) -> TimestampMillis;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> TimestampMillis {
        get_current_time_in_millis()
    }
}

/// Clock that only moves when told to.
///
/// ```rust
/// use std::time::Duration;
/// use showgame_common::time::{Clock, PausedClock};
///
/// let clock = PausedClock::new(1_000);
/// clock.advance(Duration::from_secs(15));
/// assert_eq!(clock.now_millis(), 16_000);
/// ```
#[derive(Debug, Default)]
pub struct PausedClock {
    now: AtomicU64,
}

impl PausedClock {
    pub fn new(start: TimestampMillis) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    /// Start at the current wall clock time
    pub fn from_system() -> Self {
        Self::new(get_current_time_in_millis())
    }

    pub fn advance(&self, duration: Duration) {
        self.now
            .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn advance_millis(&self, millis: u64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }

    pub fn set(&self, now: TimestampMillis) {
        self.now.store(now, Ordering::SeqCst);
    }
}

impl Clock for PausedClock {
    fn now_millis(&self) -> TimestampMillis {
        self.now.load(Ordering::SeqCst)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_millis(&self) -> TimestampMillis {
        (**self).now_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paused_clock_only_moves_on_advance() {
        let clock = PausedClock::new(500);
        assert_eq!(clock.now_millis(), 500);
        assert_eq!(clock.now_millis(), 500);
        clock.advance_millis(250);
        assert_eq!(clock.now_millis(), 750);
        clock.set(10);
        assert_eq!(clock.now_millis(), 10);
    }

    #[test]
    fn test_shared_clock() {
        let clock = Arc::new(PausedClock::new(0));
        let shared: Arc<dyn Clock> = clock.clone();
        clock.advance(Duration::from_millis(42));
        assert_eq!(shared.now_millis(), 42);
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }
}
