//! Manually-advanced clock for deterministic timing tests.

use crate::traits::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Mock clock whose time only moves when told to.
///
/// Cloning shares the underlying time, so a test can hold one clone
/// and advance it while the pipeline holds another. `sleep` advances
/// the clock by the requested duration and returns immediately.
///
/// # Examples
///
/// ```
/// use taglock_hardware::mock::MockClock;
/// use taglock_hardware::traits::Clock;
/// use std::time::Duration;
///
/// let clock = MockClock::new();
/// assert_eq!(clock.now(), Duration::ZERO);
///
/// clock.advance(Duration::from_millis(500));
/// assert_eq!(clock.now(), Duration::from_millis(500));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    now_ms: Arc<AtomicU64>,
}

impl MockClock {
    /// Create a clock starting at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance time by `duration` (millisecond granularity).
    pub fn advance(&self, duration: Duration) {
        self.now_ms
            .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Clock for MockClock {
    fn now(&self) -> Duration {
        Duration::from_millis(self.now_ms.load(Ordering::SeqCst))
    }

    async fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}
