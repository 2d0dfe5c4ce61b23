//! Request rendering
//!
//! Turns a raw [`ResourceRequest`] into the parameter map that is sent:
//! merge `source` with `params`, interpolate placeholders, then inject file
//! references relative to the resource directory.

use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::file_ref::inject_map;
use crate::params::HttpParams;
use crate::protocol::ResourceRequest;
use crate::template::{InterpolationValues, interpolate_map};

/// Render the merged parameters of `request`
///
/// `environment` holds the build metadata; the merged (unrendered)
/// parameters are layered on top of it before interpolation.
pub fn render_params(
    request: &ResourceRequest,
    environment: &InterpolationValues,
    resource_dir: &Path,
) -> Result<Map<String, Value>> {
    let params = request.merged_params();

    let mut values = environment.clone();
    values.extend_params(&params);
    debug!("Interpolating with {} values", values.len());

    let rendered = interpolate_map(&params, &values)?;
    Ok(inject_map(&rendered, resource_dir))
}

/// [`render_params`] followed by [`HttpParams::from_params`]
pub fn render_http_params(
    request: &ResourceRequest,
    environment: &InterpolationValues,
    resource_dir: &Path,
) -> Result<HttpParams> {
    let rendered = render_params(request, environment, resource_dir)?;
    HttpParams::from_params(&rendered)
}
