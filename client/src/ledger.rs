//! HTTP client for the ledger service.
//!
//! Streams are long-lived GETs with an `application/x-ndjson` body and no
//! overall timeout. Publishing is a POST bounded by the request timeout whose
//! response carries a single acknowledgement line.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use atto_ledger::Transaction;
use atto_types::{Height, PublicKey, Timestamp};
use futures_util::stream::{BoxStream, StreamExt};
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ndjson;
use crate::{Authenticator, ClientError};

/// Lines of an open ndjson subscription.
pub type LineStream = BoxStream<'static, Result<String, ClientError>>;

const NDJSON: &str = "application/x-ndjson";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Server answer to a clock probe.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstantResponse {
    #[serde(with = "atto_types::iso_format")]
    pub client_instant: Timestamp,
    #[serde(with = "atto_types::iso_format")]
    pub server_instant: Timestamp,
    /// Server time minus client time, in milliseconds.
    pub difference_millis: i64,
}

/// Everything the wallet needs from the ledger service.
#[async_trait]
pub trait LedgerApi: Send + Sync {
    /// Account snapshots, one per confirmed change.
    async fn account_stream(&self, public_key: &PublicKey) -> Result<LineStream, ClientError>;

    /// Receivables addressed to the account.
    async fn receivable_stream(&self, public_key: &PublicKey) -> Result<LineStream, ClientError>;

    /// Confirmed transactions of the account in `[from, to]`.
    async fn transaction_stream(
        &self,
        public_key: &PublicKey,
        from: Height,
        to: Height,
    ) -> Result<LineStream, ClientError>;

    /// Probe the server clock with the local time.
    async fn instant(&self, client_time: Timestamp) -> Result<InstantResponse, ClientError>;

    /// Publish a signed transaction and return the acknowledgement line.
    async fn publish(&self, transaction: &Transaction) -> Result<String, ClientError>;
}

pub(crate) fn account_path(public_key: &PublicKey) -> String {
    format!("/accounts/{public_key}/stream")
}

pub(crate) fn receivable_path(public_key: &PublicKey) -> String {
    format!("/accounts/{public_key}/receivables/stream")
}

pub(crate) fn transaction_path(public_key: &PublicKey, from: Height, to: Height) -> String {
    format!(
        "/accounts/{public_key}/transactions/stream?fromHeight={}&toHeight={}",
        from.value(),
        to.value()
    )
}

pub(crate) fn instant_url(endpoint: &str, client_time: Timestamp) -> String {
    format!("{endpoint}/instants/{}", client_time.to_iso8601())
}

fn check_status(response: &reqwest::Response, url: &str) -> Result<(), ClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(())
}

/// [`LedgerApi`] over HTTP.
#[derive(Clone)]
pub struct HttpLedgerClient {
    http: reqwest::Client,
    endpoint: String,
    authenticator: Arc<dyn Authenticator>,
    request_timeout: Duration,
}

impl HttpLedgerClient {
    pub fn new(
        endpoint: impl Into<String>,
        authenticator: Arc<dyn Authenticator>,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            authenticator,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Bound for publish and clock requests. Streams are unbounded.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn open_stream(&self, path: String) -> Result<LineStream, ClientError> {
        let url = format!("{}{}", self.endpoint, path);
        let token = self.authenticator.authorization().await?;

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .header(ACCEPT, NDJSON)
            .send()
            .await
            .map_err(ClientError::from_send)?;
        check_status(&response, &url)?;

        debug!(%url, "stream opened");
        Ok(ndjson::lines(response.bytes_stream()))
    }
}

#[async_trait]
impl LedgerApi for HttpLedgerClient {
    async fn account_stream(&self, public_key: &PublicKey) -> Result<LineStream, ClientError> {
        self.open_stream(account_path(public_key)).await
    }

    async fn receivable_stream(&self, public_key: &PublicKey) -> Result<LineStream, ClientError> {
        self.open_stream(receivable_path(public_key)).await
    }

    async fn transaction_stream(
        &self,
        public_key: &PublicKey,
        from: Height,
        to: Height,
    ) -> Result<LineStream, ClientError> {
        self.open_stream(transaction_path(public_key, from, to))
            .await
    }

    async fn instant(&self, client_time: Timestamp) -> Result<InstantResponse, ClientError> {
        let url = instant_url(&self.endpoint, client_time);

        let response = self
            .http
            .get(&url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(ClientError::from_send)?;
        check_status(&response, &url)?;

        response
            .json::<InstantResponse>()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    async fn publish(&self, transaction: &Transaction) -> Result<String, ClientError> {
        let url = format!("{}/transactions/stream", self.endpoint);
        let token = self.authenticator.authorization().await?;

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .header(ACCEPT, NDJSON)
            .json(transaction)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(ClientError::from_send)?;
        check_status(&response, &url)?;

        let ack = ndjson::lines(response.bytes_stream())
            .next()
            .await
            .ok_or(ClientError::EmptyAcknowledgement)??;

        info!(hash = %transaction.hash(), "transaction published");
        Ok(ack)
    }
}
