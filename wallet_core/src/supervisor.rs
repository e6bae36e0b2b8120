//! Keeps a push subscription alive for the lifetime of the manager.
//!
//! Recovery is a flat loop: when a connection fails, wait one cooldown and
//! open a fresh one. A connection the server closes cleanly is reopened at
//! once. There is no escalation and no give-up; only shutdown stops the loop.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use atto_utils::{format_duration, Clock};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::{WalletError, WalletMetrics};

/// One long-lived read loop against a ledger feed.
#[async_trait]
pub trait Subscription: Send + Sync {
    fn name(&self) -> &'static str;

    /// Open the feed and consume it until it ends or fails.
    async fn run(&self) -> Result<(), WalletError>;
}

pub struct StreamSupervisor {
    clock: Arc<dyn Clock>,
    cooldown: Duration,
    metrics: Arc<WalletMetrics>,
}

impl StreamSupervisor {
    pub fn new(clock: Arc<dyn Clock>, cooldown: Duration, metrics: Arc<WalletMetrics>) -> Self {
        Self {
            clock,
            cooldown,
            metrics,
        }
    }

    /// Run `subscription` repeatedly until `shutdown` fires.
    pub async fn supervise(
        &self,
        subscription: Arc<dyn Subscription>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        let name = subscription.name();
        info!(stream = name, "stream started");

        loop {
            let failed = tokio::select! {
                _ = shutdown.recv() => break,
                result = subscription.run() => match result {
                    Ok(()) => {
                        info!(stream = name, "stream closed by server, reopening");
                        false
                    }
                    Err(e) => {
                        warn!(stream = name, error = %e, "stream failed");
                        true
                    }
                },
            };

            self.metrics.stream_restarts.with_label_values(&[name]).inc();
            if !failed {
                continue;
            }
            info!(
                stream = name,
                cooldown = %format_duration(self.cooldown),
                "reconnecting after cooldown"
            );

            tokio::select! {
                _ = shutdown.recv() => break,
                _ = self.clock.sleep(self.cooldown) => {}
            }
        }

        info!(stream = name, "stream stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use atto_client::ClientError;
    use atto_nullables::NullClock;
    use atto_types::Timestamp;

    /// Fails the first `failures` runs, then blocks until cancelled.
    struct Flaky {
        runs: AtomicUsize,
        failures: usize,
    }

    #[async_trait]
    impl Subscription for Flaky {
        fn name(&self) -> &'static str {
            "flaky"
        }

        async fn run(&self) -> Result<(), WalletError> {
            let run = self.runs.fetch_add(1, Ordering::SeqCst);
            if run < self.failures {
                return Err(WalletError::Stream(ClientError::Stream("reset".into())));
            }
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn restarts_after_each_failure_with_flat_cooldown() {
        let clock = Arc::new(NullClock::new(Timestamp::from_millis(0)));
        let metrics = Arc::new(WalletMetrics::new());
        let supervisor =
            StreamSupervisor::new(clock.clone(), Duration::from_secs(10), metrics.clone());
        let flaky = Arc::new(Flaky {
            runs: AtomicUsize::new(0),
            failures: 3,
        });
        let (tx, rx) = broadcast::channel(1);

        let task = {
            let flaky = flaky.clone();
            tokio::spawn(async move { supervisor.supervise(flaky, rx).await })
        };

        clock.wait_for_sleeps(3).await;
        while flaky.runs.load(Ordering::SeqCst) < 4 {
            tokio::task::yield_now().await;
        }
        tx.send(()).unwrap();
        task.await.unwrap();

        assert_eq!(clock.sleeps(), vec![Duration::from_secs(10); 3]);
        assert_eq!(
            metrics.stream_restarts.with_label_values(&["flaky"]).get(),
            3
        );
    }

    /// Ends cleanly for the first `closes` runs, then blocks until cancelled.
    struct Rotating {
        runs: AtomicUsize,
        closes: usize,
    }

    #[async_trait]
    impl Subscription for Rotating {
        fn name(&self) -> &'static str {
            "rotating"
        }

        async fn run(&self) -> Result<(), WalletError> {
            if self.runs.fetch_add(1, Ordering::SeqCst) < self.closes {
                return Ok(());
            }
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn clean_close_reopens_without_cooldown() {
        let clock = Arc::new(NullClock::new(Timestamp::from_millis(0)));
        let metrics = Arc::new(WalletMetrics::new());
        let supervisor =
            StreamSupervisor::new(clock.clone(), Duration::from_secs(10), metrics.clone());
        let rotating = Arc::new(Rotating {
            runs: AtomicUsize::new(0),
            closes: 2,
        });
        let (tx, rx) = broadcast::channel(1);

        let task = {
            let rotating = rotating.clone();
            tokio::spawn(async move { supervisor.supervise(rotating, rx).await })
        };

        while rotating.runs.load(Ordering::SeqCst) < 3 {
            tokio::task::yield_now().await;
        }
        tx.send(()).unwrap();
        task.await.unwrap();

        assert!(clock.sleeps().is_empty());
        assert_eq!(
            metrics.stream_restarts.with_label_values(&["rotating"]).get(),
            2
        );
    }

    #[tokio::test]
    async fn shutdown_interrupts_cooldown() {
        struct NeverWakes;

        #[async_trait]
        impl Clock for NeverWakes {
            fn now(&self) -> Timestamp {
                Timestamp::from_millis(0)
            }

            async fn sleep(&self, _duration: Duration) {
                std::future::pending().await
            }
        }

        let supervisor = StreamSupervisor::new(
            Arc::new(NeverWakes),
            Duration::from_secs(10),
            Arc::new(WalletMetrics::new()),
        );
        let flaky = Arc::new(Flaky {
            runs: AtomicUsize::new(0),
            failures: usize::MAX,
        });
        let (tx, rx) = broadcast::channel(1);
        let task = tokio::spawn(async move { supervisor.supervise(flaky, rx).await });

        tokio::task::yield_now().await;
        tx.send(()).unwrap();
        task.await.unwrap();
    }
}
