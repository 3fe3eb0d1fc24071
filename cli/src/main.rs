// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # SMB CSI node plugin
//!
//! The `smb-csi-driver` binary runs on every node and serves the CSI
//! Identity and Node services for SMB/CIFS shares.
//!
//! ## Commands
//!
//! - `smb-csi-driver` - Serve on the configured endpoint until SIGINT/SIGTERM
//! - `smb-csi-driver config show|validate` - Configuration management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod commands;
mod daemon;

use commands::ConfigCommand;

/// SMB CSI node plugin - mount SMB shares for container workloads
#[derive(Parser, Debug)]
#[command(name = "smb-csi-driver")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery; must exist).
    /// SMB_CSI_CONFIG_PATH is honored by discovery and skipped when missing.
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// gRPC endpoint, unix:///path/to/csi.sock or tcp://host:port
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Node id reported by NodeGetInfo (default: hostname)
    #[arg(long, global = true)]
    node_id: Option<String>,

    /// CSI driver name reported by GetPluginInfo
    #[arg(long, global = true)]
    driver_name: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "SMB_CSI_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Compact,
    Json,
}

impl Cli {
    fn overrides(&self) -> daemon::ConfigOverrides {
        daemon::ConfigOverrides {
            endpoint: self.endpoint.clone(),
            node_id: self.node_id.clone(),
            driver_name: self.driver_name.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level, cli.log_format)?;

    let overrides = cli.overrides();
    match cli.command {
        Some(Commands::Config { command }) => {
            commands::config::handle_command(command, cli.config, overrides).await
        }
        None => daemon::start_daemon(cli.config, overrides).await,
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }

    Ok(())
}
