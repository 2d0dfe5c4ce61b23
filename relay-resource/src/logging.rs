//! Tracing setup
//!
//! stdout is reserved for the protocol response, so logs never go there.
//! In debug mode everything goes to stderr. Otherwise stderr gets info and
//! above, and the full debug stream is written to a `log*` file in the
//! temporary directory.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_DEBUG_FILTER: &str = "relay=debug,relay_client=debug,relay_core=debug,info";

fn debug_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_DEBUG_FILTER.into())
}

/// Install the global subscriber
///
/// Returns the path of the debug log file, if one was created. A subscriber
/// that is already installed is left in place.
pub fn init(debug: bool, tmp_dir: &Path) -> Result<Option<PathBuf>> {
    if debug {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_filter(debug_filter()),
            )
            .try_init()
            .ok();
        return Ok(None);
    }

    let (file, path) = tempfile::Builder::new()
        .prefix("log")
        .tempfile_in(tmp_dir)
        .context("Failed to create log file")?
        .keep()
        .context("Failed to persist log file")?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(debug_filter()),
        )
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(LevelFilter::INFO),
        )
        .try_init()
        .ok();

    Ok(Some(path))
}
