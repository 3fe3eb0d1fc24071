// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Node plugin server: config loading, adapter wiring and signal handling

use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use smb_csi_core::{
    domain::driver_config::DriverConfig,
    infrastructure::{InMemoryMountStore, LocalHost, TokioCommandRunner},
    presentation::grpc::{build_node_service, start_grpc_server, CsiIdentityService},
};

/// Values from command-line flags; these win over file and environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub endpoint: Option<String>,
    pub node_id: Option<String>,
    pub driver_name: Option<String>,
}

impl ConfigOverrides {
    fn apply(&self, config: &mut DriverConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(node_id) = &self.node_id {
            config.node_id = Some(node_id.clone());
        }
        if let Some(driver_name) = &self.driver_name {
            config.driver_name = driver_name.clone();
        }
    }
}

/// Load, override and validate the driver configuration
pub fn load_config(
    config_path: Option<PathBuf>,
    overrides: &ConfigOverrides,
) -> Result<DriverConfig> {
    let mut config =
        DriverConfig::load_or_default(config_path).context("Failed to load configuration")?;
    overrides.apply(&mut config);
    config
        .validate()
        .context("Configuration validation failed")?;
    Ok(config)
}

pub async fn start_daemon(config_path: Option<PathBuf>, overrides: ConfigOverrides) -> Result<()> {
    let config = load_config(config_path, &overrides)?;
    let endpoint = config.endpoint()?;

    info!(
        driver_name = %config.driver_name,
        endpoint = %endpoint,
        "Starting SMB CSI node plugin"
    );

    let node = build_node_service(
        &config,
        Arc::new(TokioCommandRunner::new()),
        Arc::new(LocalHost::new()),
        Arc::new(InMemoryMountStore::new()),
    );
    let identity = CsiIdentityService::new(config.driver_name.clone());

    start_grpc_server(endpoint, node, identity, shutdown_signal())
        .await
        .map_err(|e| anyhow!("gRPC server failed: {}", e))?;

    info!("Node plugin shutting down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
