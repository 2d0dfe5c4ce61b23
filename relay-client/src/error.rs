//! Error types for the Relay client

use relay_core::CoreError;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while sending the resource request
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Server answered with a status not listed in `ok_responses`
    #[error("Unexpected response {status}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Request could not be built from the parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// `ssl_verify` bundle could not be parsed
    #[error("Invalid CA certificate: {0}")]
    InvalidCertificate(String),

    /// Parameter rendering or encoding failed
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ClientError {
    /// Create an unexpected status error from status code and body
    pub fn unexpected_status(status: u16, body: impl Into<String>) -> Self {
        Self::UnexpectedStatus {
            status,
            body: body.into(),
        }
    }

    /// Status code of an unexpected response, if that is what this is
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
