//! Time source abstraction.
//!
//! Anything that reads the wall clock or waits goes through [`Clock`], so
//! tests can substitute a deterministic clock whose sleeps return at once.

use std::time::Duration;

use async_trait::async_trait;
use atto_types::Timestamp;

#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;

    /// Suspend the calling task for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// The system wall clock and tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn system_clock_sleeps_on_tokio_timer() {
        let start = tokio::time::Instant::now();
        SystemClock.sleep(Duration::from_secs(10)).await;
        assert!(start.elapsed() >= Duration::from_secs(10));
    }
}
