//! Wallet configuration.
//!
//! Loaded from a TOML file; every field has a default so an empty file is a
//! valid configuration for a local ledger. Secrets (bearer token, mnemonic)
//! are never read from here.

use std::path::Path;
use std::time::Duration;

use atto_types::{NetworkId, PublicKey};
use serde::{Deserialize, Serialize};

use crate::WalletError;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Base URL of the ledger service.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Base URL of the work service.
    #[serde(default = "default_worker_endpoint")]
    pub worker_endpoint: String,

    #[serde(default = "default_network")]
    pub network: NetworkId,

    /// Representative named in open blocks. Defaults to the account itself.
    #[serde(default)]
    pub representative: Option<PublicKey>,

    /// Accept every observed receivable automatically.
    #[serde(default = "default_true")]
    pub auto_receive: bool,

    /// Fixed wait before a failed stream is reopened.
    #[serde(default = "default_stream_cooldown_secs")]
    pub stream_cooldown_secs: u64,

    /// Bound for publish, clock and work requests.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// How far before the block timestamp work must be valid.
    #[serde(default = "default_work_lead_time_secs")]
    pub work_lead_time_secs: u64,

    /// "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_endpoint() -> String {
    "http://localhost:8080".to_string()
}

fn default_worker_endpoint() -> String {
    "http://localhost:8085".to_string()
}

fn default_network() -> NetworkId {
    NetworkId::Local
}

fn default_true() -> bool {
    true
}

fn default_stream_cooldown_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    300
}

fn default_work_lead_time_secs() -> u64 {
    60
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl WalletConfig {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, WalletError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            WalletError::Config(format!("{}: {e}", path.as_ref().display()))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, WalletError> {
        toml::from_str(s).map_err(|e| WalletError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, WalletError> {
        toml::to_string_pretty(self).map_err(|e| WalletError::Config(e.to_string()))
    }

    pub fn stream_cooldown(&self) -> Duration {
        Duration::from_secs(self.stream_cooldown_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn work_lead_time(&self) -> Duration {
        Duration::from_secs(self.work_lead_time_secs)
    }

    /// Representative for an account that has none configured.
    pub fn representative_or(&self, own: PublicKey) -> PublicKey {
        self.representative.unwrap_or(own)
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            worker_endpoint: default_worker_endpoint(),
            network: default_network(),
            representative: None,
            auto_receive: default_true(),
            stream_cooldown_secs: default_stream_cooldown_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            work_lead_time_secs: default_work_lead_time_secs(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
