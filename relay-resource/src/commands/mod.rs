//! Commands module
//!
//! The three resource entry points the CI engine invokes. Each reads the
//! request document from stdin and returns the response document that
//! `main` prints to stdout.

mod check;
mod get;
mod put;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use relay_core::protocol::ResourceRequest;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::Config;
use crate::logging;

/// Resource commands
#[derive(Subcommand)]
pub enum Commands {
    /// Report new versions (there never are any)
    Check(CheckArgs),
    /// Fetch a version (echoes the requested version)
    In(ResourceArgs),
    /// Send the configured HTTP request
    Out(ResourceArgs),
}

/// Arguments for `check`
#[derive(Args)]
pub struct CheckArgs {
    /// Resource directory (unused)
    pub resource_dir: Option<PathBuf>,
}

/// Arguments for `in` and `out`
#[derive(Args)]
pub struct ResourceArgs {
    /// Resource directory; file references are resolved inside it
    pub resource_dir: PathBuf,
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Check(_) => "check",
            Commands::In(_) => "in",
            Commands::Out(_) => "out",
        }
    }

    fn resource_dir(&self) -> Option<&Path> {
        match self {
            Commands::Check(args) => args.resource_dir.as_deref(),
            Commands::In(args) | Commands::Out(args) => Some(args.resource_dir.as_path()),
        }
    }
}

/// Handle a resource command
///
/// Reads the request from stdin and hands it to [`handle_payload`].
///
/// # Returns
/// The JSON response document for stdout
pub async fn handle_command(command: Commands, config: Config) -> Result<String> {
    let mut payload = String::new();
    std::io::stdin()
        .read_to_string(&mut payload)
        .context("Failed to read request from stdin")?;

    handle_payload(&command, config, &payload).await
}

/// Save and parse a raw request, set up logging and dispatch it
///
/// The payload copy is written before parsing so a malformed request can
/// still be inspected.
pub async fn handle_payload(command: &Commands, config: Config, payload: &str) -> Result<String> {
    config.validate()?;

    persist_payload(&config.tmp_dir, command.name(), payload)?;

    let request = ResourceRequest::parse(payload).context("Failed to parse request from stdin")?;
    let config = config.with_debug(request.debug_enabled());

    let log_file = logging::init(config.debug, &config.tmp_dir)?;
    if let Some(path) = &log_file {
        debug!("log file: {}", path.display());
    }

    run_command(command, &config, &request, payload).await
}

/// Dispatch an already parsed request
pub async fn run_command(
    command: &Commands,
    config: &Config,
    request: &ResourceRequest,
    payload: &str,
) -> Result<String> {
    debug!("command: {}", command.name());
    debug!("input: {}", payload);
    debug!("resource directory: {:?}", command.resource_dir());
    debug!("environment: {:?}", config.environment);

    let output = match command {
        Commands::Check(_) => serde_json::to_string(&check::run(request))?,
        Commands::In(_) => serde_json::to_string(&get::run(request))?,
        Commands::Out(args) => {
            serde_json::to_string(&put::run(config, request, &args.resource_dir).await?)?
        }
    };

    Ok(output)
}

/// Keep a copy of the raw request in `<tmp>/<command>-*` for debugging
fn persist_payload(tmp_dir: &Path, command: &str, payload: &str) -> Result<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix(&format!("{}-", command))
        .tempfile_in(tmp_dir)
        .context("Failed to create payload file")?;
    file.write_all(payload.as_bytes())
        .context("Failed to write payload file")?;

    let (_, path) = file.keep().context("Failed to persist payload file")?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn config(tmp_dir: &Path) -> Config {
        Config::from_vars(Vec::new(), tmp_dir.to_path_buf())
    }

    #[test]
    fn test_persist_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = persist_payload(dir.path(), "out", r#"{"source": {}}"#).unwrap();

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("out-"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"{"source": {}}"#);
    }

    fn saved_payloads(dir: &Path, prefix: &str) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| {
                path.file_name()
                    .is_some_and(|name| name.to_string_lossy().starts_with(prefix))
            })
            .map(|path| std::fs::read_to_string(path).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_handle_payload_keeps_invalid_request() {
        let dir = tempfile::tempdir().unwrap();
        let command = Commands::Out(ResourceArgs {
            resource_dir: dir.path().to_path_buf(),
        });

        let result = handle_payload(&command, config(dir.path()), "{not json").await;

        assert!(result.is_err());
        assert_eq!(saved_payloads(dir.path(), "out-"), ["{not json"]);
    }

    #[tokio::test]
    async fn test_handle_payload_check_with_debug_source() {
        let dir = tempfile::tempdir().unwrap();
        let payload = r#"{"source": {"uri": "http://unused", "debug": true}}"#;

        let output = handle_payload(
            &Commands::Check(CheckArgs { resource_dir: None }),
            config(dir.path()),
            payload,
        )
        .await
        .unwrap();

        assert_eq!(output, "[]");
        assert_eq!(saved_payloads(dir.path(), "check-"), [payload]);
    }

    #[tokio::test]
    async fn test_handle_payload_rejects_missing_tmp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");

        let result = handle_payload(
            &Commands::Check(CheckArgs { resource_dir: None }),
            config(&missing),
            "{}",
        )
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_check_outputs_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let payload = r#"{"source": {"uri": "http://unused/post", "method": "POST"}}"#;
        let request = ResourceRequest::parse(payload).unwrap();

        let output = run_command(
            &Commands::Check(CheckArgs { resource_dir: None }),
            &config(dir.path()),
            &request,
            payload,
        )
        .await
        .unwrap();

        assert_eq!(output, "[]");
    }

    #[tokio::test]
    async fn test_in_echoes_version() {
        let dir = tempfile::tempdir().unwrap();
        let payload = r#"{"source": {"uri": "http://unused"}, "version": {"ref": "abc"}}"#;
        let request = ResourceRequest::parse(payload).unwrap();

        let output = run_command(
            &Commands::In(ResourceArgs {
                resource_dir: dir.path().to_path_buf(),
            }),
            &config(dir.path()),
            &request,
            payload,
        )
        .await
        .unwrap();

        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value, serde_json::json!({"version": {"ref": "abc"}, "metadata": []}));
    }

    #[test]
    fn test_command_names() {
        let dir = PathBuf::from("/tmp");
        assert_eq!(Commands::Check(CheckArgs { resource_dir: None }).name(), "check");
        assert_eq!(
            Commands::In(ResourceArgs {
                resource_dir: dir.clone()
            })
            .name(),
            "in"
        );
        assert_eq!(Commands::Out(ResourceArgs { resource_dir: dir }).name(), "out");
    }
}
