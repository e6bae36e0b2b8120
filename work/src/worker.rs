//! Client for the remote work service.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use atto_client::{Authenticator, ClientError};
use atto_ledger::Block;
use atto_types::{Timestamp, Work};
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{WorkError, WorkTarget, DEFAULT_LEAD_TIME};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Anything that can produce work for a block.
#[async_trait]
pub trait WorkProvider: Send + Sync {
    async fn work(&self, block: &Block) -> Result<Work, WorkError>;
}

/// Body of `POST {worker}/works`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkRequest {
    #[serde(with = "atto_types::iso_format")]
    pub timestamp: Timestamp,
    pub target: String,
}

impl From<WorkTarget> for WorkRequest {
    fn from(target: WorkTarget) -> Self {
        Self {
            timestamp: target.timestamp,
            target: target.target,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkResponse {
    pub work: Work,
}

/// [`WorkProvider`] backed by the worker HTTP service.
#[derive(Clone)]
pub struct WorkerClient {
    http: reqwest::Client,
    endpoint: String,
    authenticator: Arc<dyn Authenticator>,
    lead_time: Duration,
}

impl WorkerClient {
    pub fn new(
        endpoint: impl Into<String>,
        authenticator: Arc<dyn Authenticator>,
    ) -> Result<Self, WorkError> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            authenticator,
            lead_time: DEFAULT_LEAD_TIME,
        })
    }

    pub fn with_lead_time(mut self, lead_time: Duration) -> Self {
        self.lead_time = lead_time;
        self
    }

    async fn request(&self, target: WorkTarget) -> Result<Work, WorkError> {
        let url = format!("{}/works", self.endpoint);
        let token = self.authenticator.authorization().await?;
        debug!(target = %target.target, deadline = %target.timestamp, "requesting work");

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .json(&WorkRequest::from(target))
            .send()
            .await
            .map_err(ClientError::from_send)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url,
            }
            .into());
        }

        let body: WorkResponse = response
            .json()
            .await
            .map_err(|e| WorkError::InvalidResponse(e.to_string()))?;
        Ok(body.work)
    }
}

#[async_trait]
impl WorkProvider for WorkerClient {
    async fn work(&self, block: &Block) -> Result<Work, WorkError> {
        self.request(WorkTarget::for_block(block, self.lead_time))
            .await
    }
}
