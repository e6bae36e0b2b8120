//! Prometheus metrics for the account synchronization engine.
//!
//! [`WalletMetrics`] owns a dedicated [`Registry`]; embedders can gather it
//! or call [`WalletMetrics::encode`] for the text exposition format.

use prometheus::{
    register_int_counter_vec_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Encoder, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};

use crate::WalletError;

pub struct WalletMetrics {
    pub registry: Registry,

    // ── Streams ─────────────────────────────────────────────────────────
    /// Records decoded per stream (`stream` label).
    pub stream_records: IntCounterVec,
    /// Reconnects per stream after a failure or server close.
    pub stream_restarts: IntCounterVec,

    // ── Mutations ───────────────────────────────────────────────────────
    pub transactions_published: IntCounter,
    /// Failed send/receive operations by error category.
    pub mutation_failures: IntCounterVec,
    pub auto_receive_attempts: IntCounter,
    /// Receivables whose automatic acceptance failed. They are not retried
    /// until the ledger pushes them again.
    pub auto_receive_failures: IntCounter,

    // ── State ───────────────────────────────────────────────────────────
    /// Height of the held account snapshot, 0 before the account exists.
    pub account_height: IntGauge,
}

impl WalletMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let stream_records = register_int_counter_vec_with_registry!(
            Opts::new("atto_wallet_stream_records_total", "Records read per stream"),
            &["stream"],
            registry
        )
        .expect("failed to register stream_records counter");

        let stream_restarts = register_int_counter_vec_with_registry!(
            Opts::new(
                "atto_wallet_stream_restarts_total",
                "Stream reconnects after failure or close"
            ),
            &["stream"],
            registry
        )
        .expect("failed to register stream_restarts counter");

        let transactions_published = register_int_counter_with_registry!(
            Opts::new(
                "atto_wallet_transactions_published_total",
                "Transactions acknowledged by the ledger service"
            ),
            registry
        )
        .expect("failed to register transactions_published counter");

        let mutation_failures = register_int_counter_vec_with_registry!(
            Opts::new(
                "atto_wallet_mutation_failures_total",
                "Failed send/receive operations"
            ),
            &["category"],
            registry
        )
        .expect("failed to register mutation_failures counter");

        let auto_receive_attempts = register_int_counter_with_registry!(
            Opts::new(
                "atto_wallet_auto_receive_attempts_total",
                "Receivables accepted automatically"
            ),
            registry
        )
        .expect("failed to register auto_receive_attempts counter");

        let auto_receive_failures = register_int_counter_with_registry!(
            Opts::new(
                "atto_wallet_auto_receive_failures_total",
                "Automatic acceptances that failed and will not be retried"
            ),
            registry
        )
        .expect("failed to register auto_receive_failures counter");

        let account_height = register_int_gauge_with_registry!(
            Opts::new("atto_wallet_account_height", "Height of the held account snapshot"),
            registry
        )
        .expect("failed to register account_height gauge");

        Self {
            registry,
            stream_records,
            stream_restarts,
            transactions_published,
            mutation_failures,
            auto_receive_attempts,
            auto_receive_failures,
            account_height,
        }
    }

    pub fn record_failure(&self, error: &WalletError) {
        self.mutation_failures
            .with_label_values(&[error.category().as_str()])
            .inc();
    }

    /// Encode all metrics in the Prometheus text format.
    pub fn encode(&self) -> Result<String, WalletError> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| WalletError::Config(format!("metrics encoding: {e}")))?;
        String::from_utf8(buffer).map_err(|e| WalletError::Config(e.to_string()))
    }
}

impl Default for WalletMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_are_labelled_by_category() {
        let metrics = WalletMetrics::new();
        metrics.record_failure(&WalletError::AccountNotFound);
        metrics.record_failure(&WalletError::AccountNotFound);
        assert_eq!(
            metrics
                .mutation_failures
                .with_label_values(&["precondition"])
                .get(),
            2
        );
    }

    #[test]
    fn encode_contains_registered_names() {
        let metrics = WalletMetrics::new();
        metrics.stream_records.with_label_values(&["accounts"]).inc();
        metrics.account_height.set(6);
        let text = metrics.encode().unwrap();
        assert!(text.contains("atto_wallet_stream_records_total"));
        assert!(text.contains("atto_wallet_account_height 6"));
    }
}
