//! Relay Resource
//!
//! A CI resource that sends one HTTP request per `put` step.
//!
//! The binary is installed as `/opt/resource/{check,in,out}` and dispatches
//! on the name it was invoked as. It can also be run as `relay <command>`.
//!
//! Architecture:
//! - Configuration: build metadata and switches from the environment
//! - Logging: stderr plus a debug log file; stdout carries only the response
//! - Commands: `check`, `in` and `out`, each reading the request from stdin

mod commands;
mod config;
mod logging;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;

/// Entry points, selected by the executable name
#[derive(Parser)]
#[command(multicall = true)]
enum Applet {
    #[command(flatten)]
    Resource(Commands),
    /// Run a resource command by name
    Relay {
        #[command(subcommand)]
        command: Commands,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let command = match Applet::parse() {
        Applet::Resource(command) => command,
        Applet::Relay { command } => command,
    };

    let output = handle_command(command, Config::from_env()).await?;
    println!("{}", output);

    Ok(())
}
