//! Client error types

use thiserror::Error;

/// Errors talking to the backend
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network failure, timeout, TLS
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response; `message` is the backend's own explanation if it sent one
    #[error("backend returned {status}{}", suffix(.message))]
    Status { status: u16, message: Option<String> },

    /// Body did not match the expected shape
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// Base URL could not be parsed
    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The owning view was disposed before the request finished
    #[error("request cancelled")]
    Cancelled,
}

fn suffix(message: &Option<String>) -> String {
    message.as_ref().map(|m| format!(": {m}")).unwrap_or_default()
}

impl ClientError {
    /// The backend's message, when the response carried one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ClientError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Status { status: 404, .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }
}

/// Result type for backend calls
pub type ClientResult<T> = Result<T, ClientError>;
