//! Nullable clock: deterministic time for testing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use atto_types::Timestamp;
use atto_utils::Clock;

/// A deterministic clock for testing.
///
/// Time only advances when told to, or by the amount of a sleep. Sleeps
/// return after a single scheduler yield and are recorded.
pub struct NullClock {
    millis: AtomicU64,
    sleeps: Mutex<Vec<Duration>>,
}

impl NullClock {
    pub fn new(initial: Timestamp) -> Self {
        Self {
            millis: AtomicU64::new(initial.as_millis()),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    /// Advance time.
    pub fn advance(&self, duration: Duration) {
        self.millis
            .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
    }

    /// Set the time to a specific value.
    pub fn set(&self, now: Timestamp) {
        self.millis.store(now.as_millis(), Ordering::SeqCst);
    }

    /// Every sleep requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }

    /// Yield until at least `count` sleeps were requested.
    pub async fn wait_for_sleeps(&self, count: usize) {
        loop {
            if self.sleeps.lock().unwrap().len() >= count {
                return;
            }
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl Clock for NullClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.millis.load(Ordering::SeqCst))
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        self.advance(duration);
        tokio::task::yield_now().await;
    }
}
