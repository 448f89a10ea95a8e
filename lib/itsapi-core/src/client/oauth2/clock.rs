use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Source of wall-clock time for token expiry checks.
pub trait Clock: Debug + Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_epoch_ms(&self) -> u64;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or_default()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a test can keep a handle while the
/// [`TokenManager`](super::TokenManager) owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock frozen at `epoch_ms`.
    pub fn new(epoch_ms: u64) -> Self {
        Self {
            now_ms: Arc::new(AtomicU64::new(epoch_ms)),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, duration: Duration) {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self.now_ms.fetch_add(millis, Ordering::SeqCst);
    }

    /// Sets the clock to an absolute instant.
    pub fn set(&self, epoch_ms: u64) {
        self.now_ms.store(epoch_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_epoch_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_advance_shared_manual_clock() {
        let clock = ManualClock::new(1_000);
        let handle = clock.clone();

        handle.advance(Duration::from_secs(2));

        assert_eq!(clock.now_epoch_ms(), 3_000);
    }

    #[test]
    fn should_read_system_clock() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now_epoch_ms() > 1_577_836_800_000);
    }
}
