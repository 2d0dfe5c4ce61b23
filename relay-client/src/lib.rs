//! Relay HTTP Client
//!
//! Sends the single HTTP request a Relay `out` step is configured with and
//! checks the response status against the accepted list.
//!
//! # Example
//!
//! ```no_run
//! use relay_client::HttpClient;
//! use relay_core::params::HttpParams;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let params = HttpParams::get("https://example.com/status/200");
//!     let client = HttpClient::for_params(&params)?;
//!
//!     let response = client.execute(&params).await?;
//!     println!("status: {}", response.status);
//!     Ok(())
//! }
//! ```

pub mod error;
mod transport;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use transport::{ReqwestTransport, Transport};

use relay_core::params::HttpParams;
use serde_json::{Map, Value};
use tracing::info;

/// Status and body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Body parsed as a JSON object, if it is one
    pub fn json_object(&self) -> Option<Map<String, Value>> {
        match serde_json::from_str(&self.body) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        }
    }
}

/// Executes resource requests over a [`Transport`]
#[derive(Debug, Clone)]
pub struct HttpClient<T = ReqwestTransport> {
    transport: T,
}

impl HttpClient<ReqwestTransport> {
    /// Create a client configured for `params` (TLS verification settings)
    pub fn for_params(params: &HttpParams) -> Result<Self> {
        Ok(Self::with_transport(ReqwestTransport::for_params(params)?))
    }
}

impl<T: Transport> HttpClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send the request and validate the status code
    ///
    /// Fails with [`ClientError::UnexpectedStatus`] when the status is not
    /// listed in `ok_responses`.
    pub async fn execute(&self, params: &HttpParams) -> Result<HttpResponse> {
        let response = self.transport.send(params).await?;

        info!("http response code: {}", response.status);
        info!("http response text: {}", response.body);

        if !params.is_ok_status(response.status) {
            return Err(ClientError::unexpected_status(
                response.status,
                response.body,
            ));
        }

        Ok(response)
    }
}
