//! `out`: render the parameters and send the request

use anyhow::{Context, Result};
use relay_client::{HttpClient, Transport};
use relay_core::params::HttpParams;
use relay_core::protocol::{OutResponse, ResourceRequest, Version};
use relay_core::render::render_http_params;
use std::path::Path;
use tracing::{debug, warn};

use crate::config::Config;

pub async fn run(
    config: &Config,
    request: &ResourceRequest,
    resource_dir: &Path,
) -> Result<OutResponse> {
    let params = render_http_params(request, &config.build_values, resource_dir)
        .context("Failed to render resource parameters")?;
    debug!("rendered params: {:?}", params);

    let client = HttpClient::for_params(&params).context("Failed to build HTTP client")?;
    send(config, &client, &params).await
}

/// Send `params` over `client` and build the `out` response
pub async fn send<T: Transport>(
    config: &Config,
    client: &HttpClient<T>,
    params: &HttpParams,
) -> Result<OutResponse> {
    let response = client.execute(params).await?;

    let mut output = OutResponse::new(Version::new());
    if config.test_mode {
        match response.json_object() {
            Some(body) => output.merge(body),
            None => warn!("Response body is not a JSON object; not merged into output"),
        }
    }

    Ok(output)
}
