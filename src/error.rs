use reqwest::StatusCode;
use thiserror::Error;

/// Failures below the domain layer. Nothing here carries a backend error code.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Rejected by the request stage before anything was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {status}")]
    Status { status: StatusCode, body: String },
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Structured `{code, message}` pulled out of an error response body.
    #[error("{message}")]
    Domain { code: String, message: String },
    /// Envelope came back with `success: false`.
    #[error("{message}")]
    Business { message: String },
}

impl ApiError {
    pub fn domain(code: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Domain {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Domain { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(TransportError::Request(err))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Transport(TransportError::Decode(err))
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
