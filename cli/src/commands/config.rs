// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use smb_csi_core::domain::driver_config::CONFIG_PATH_ENV;

use crate::daemon::{load_config, ConfigOverrides};

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
    overrides: ConfigOverrides,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, overrides, paths).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override), overrides).await,
    }
}

async fn show(
    config_override: Option<PathBuf>,
    overrides: ConfigOverrides,
    show_paths: bool,
) -> Result<()> {
    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        match &config_override {
            Some(path) => println!("  1. --config flag: {}", path.display()),
            None => println!("  1. --config flag: {}", "(not set)".dimmed()),
        }
        println!(
            "  2. {}: {}",
            CONFIG_PATH_ENV,
            std::env::var(CONFIG_PATH_ENV)
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. /etc/smb-csi/config.yaml");
        println!();
    }

    let config = load_config(config_override, &overrides)?;
    let yaml = serde_yaml::to_string(&config).context("Failed to render configuration")?;

    println!("{}", "Current configuration:".bold());
    println!();
    print!("{}", yaml);

    Ok(())
}

async fn validate(config_path: Option<PathBuf>, overrides: ConfigOverrides) -> Result<()> {
    println!("Validating configuration...");

    let config = load_config(config_path, &overrides)?;

    println!("{}", "✓ Configuration is valid".green());
    println!("  Driver: {}", config.driver_name);
    println!("  Endpoint: {}", config.endpoint);

    Ok(())
}
