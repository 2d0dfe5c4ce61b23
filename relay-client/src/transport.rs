//! Request transport
//!
//! [`Transport`] is the seam between the request description and the wire.
//! [`ReqwestTransport`] is the production implementation.

use async_trait::async_trait;
use relay_core::params::{HttpParams, SslVerify};
use reqwest::{Certificate, Client, Method, RequestBuilder, Url};
use tracing::{debug, warn};

use crate::HttpResponse;
use crate::error::{ClientError, Result};

/// Sends a rendered request and returns the raw response
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, params: &HttpParams) -> Result<HttpResponse>;
}

/// reqwest-backed transport
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a client honouring the `ssl_verify` setting of `params`
    pub fn for_params(params: &HttpParams) -> Result<Self> {
        let mut builder = Client::builder();

        match &params.ssl_verify {
            SslVerify::Enabled(true) => {}
            SslVerify::Enabled(false) => {
                warn!("TLS certificate verification is disabled");
                builder = builder.danger_accept_invalid_certs(true);
            }
            SslVerify::CaBundle(pem) => {
                let certs = Certificate::from_pem_bundle(pem.as_bytes())
                    .map_err(|e| ClientError::InvalidCertificate(e.to_string()))?;
                if certs.is_empty() {
                    return Err(ClientError::InvalidCertificate(
                        "no certificates found in bundle".to_string(),
                    ));
                }
                debug!("Trusting {} additional root certificate(s)", certs.len());
                for cert in certs {
                    builder = builder.add_root_certificate(cert);
                }
            }
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    fn build_request(&self, params: &HttpParams) -> Result<RequestBuilder> {
        let method = Method::from_bytes(params.method.to_uppercase().as_bytes()).map_err(|_| {
            ClientError::InvalidRequest(format!("invalid HTTP method `{}`", params.method))
        })?;

        let mut url = Url::parse(&params.uri).map_err(|e| {
            ClientError::InvalidRequest(format!("invalid uri `{}`: {}", params.uri, e))
        })?;
        let credentials = split_credentials(&mut url);

        let mut request = self.client.request(method, url);

        if let Some((username, password)) = credentials {
            request = request.basic_auth(username, password);
        }

        for (name, value) in &params.headers {
            request = request.header(name, value);
        }

        // Form data replaces a JSON body when both are configured
        request = match (params.form_fields()?, &params.json) {
            (Some(fields), _) => request.form(&fields),
            (None, Some(json)) => request.json(json),
            (None, None) => request,
        };

        Ok(request)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, params: &HttpParams) -> Result<HttpResponse> {
        let request = self.build_request(params)?;
        debug!("Sending {} request", params.method.to_uppercase());

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }
}

/// Remove `user:password@` from `url`, returning the decoded credentials
fn split_credentials(url: &mut Url) -> Option<(String, Option<String>)> {
    if url.username().is_empty() && url.password().is_none() {
        return None;
    }

    let username = decode(url.username());
    let password = url.password().map(decode);

    // Only fails for cannot-be-a-base URLs, which carry no credentials
    let _ = url.set_username("");
    let _ = url.set_password(None);

    Some((username, password))
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}
