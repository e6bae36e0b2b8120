use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("authorization failed: {0}")]
    Auth(String),

    #[error("endpoint unreachable: {0}")]
    Unreachable(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("stream read failed: {0}")]
    Stream(String),

    #[error("response ended before an acknowledgement line")]
    EmptyAcknowledgement,
}

impl ClientError {
    /// Classify a `reqwest` send error.
    pub fn from_send(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else if e.is_connect() {
            Self::Unreachable(e.to_string())
        } else {
            Self::RequestFailed(e.to_string())
        }
    }
}
