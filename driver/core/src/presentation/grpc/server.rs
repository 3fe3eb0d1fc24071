// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! gRPC server bootstrap
//!
//! # Architecture
//!
//! - **Layer:** Presentation Layer
//! - **Purpose:** Wire the use cases to their adapters and serve the CSI
//!   Identity and Node services on a Unix socket or TCP address

use std::future::Future;
use std::sync::Arc;

use crate::application::node_info::NodeInfoService;
use crate::application::path_locks::PathLocks;
use crate::application::publish_volume::StandardPublishVolumeUseCase;
use crate::application::unpublish_volume::StandardUnpublishVolumeUseCase;
use crate::domain::command::CommandRunner;
use crate::domain::driver_config::{DriverConfig, Endpoint};
use crate::domain::host::HostFilesystem;
use crate::domain::mount_store::MountStore;

use super::identity::CsiIdentityService;
use super::node::CsiNodeService;

/// Build the Node service from a loaded config and its adapters.
///
/// Publish and unpublish share one [`PathLocks`] so a mount and an unmount
/// of the same target path never interleave.
pub fn build_node_service(
    config: &DriverConfig,
    runner: Arc<dyn CommandRunner>,
    host: Arc<dyn HostFilesystem>,
    store: Arc<dyn MountStore>,
) -> CsiNodeService {
    let locks = Arc::new(PathLocks::new());

    let publish = StandardPublishVolumeUseCase::new(
        runner.clone(),
        host.clone(),
        store.clone(),
        locks.clone(),
    )
    .with_mount_binary(config.mount_binary.clone());

    let unpublish = StandardUnpublishVolumeUseCase::new(runner, host.clone(), store, locks)
        .with_umount_binary(config.umount_binary.clone());

    let node_info = NodeInfoService::new(host, config.node_id.clone());

    CsiNodeService::new(Arc::new(publish), Arc::new(unpublish), Arc::new(node_info))
}

/// Start the gRPC server and run until `shutdown` resolves
pub async fn start_grpc_server<F>(
    endpoint: Endpoint,
    node: CsiNodeService,
    identity: CsiIdentityService,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    F: Future<Output = ()> + Send,
{
    let router = tonic::transport::Server::builder()
        .add_service(identity.into_server())
        .add_service(node.into_server());

    match endpoint {
        Endpoint::Tcp(addr) => {
            tracing::info!("Starting SMB CSI gRPC server on tcp://{}", addr);
            router.serve_with_shutdown(addr, shutdown).await?;
        }
        #[cfg(unix)]
        Endpoint::Unix(path) => {
            use tokio::net::UnixListener;
            use tokio_stream::wrappers::UnixListenerStream;

            remove_stale_socket(&path)?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let listener = UnixListener::bind(&path)?;
            tracing::info!("Starting SMB CSI gRPC server on unix://{}", path.display());

            router
                .serve_with_incoming_shutdown(UnixListenerStream::new(listener), shutdown)
                .await?;

            // Best effort; the next start clears it anyway
            let _ = std::fs::remove_file(&path);
        }
        #[cfg(not(unix))]
        Endpoint::Unix(path) => {
            return Err(format!(
                "unix socket endpoints are not supported on this platform: {}",
                path.display()
            )
            .into());
        }
    }

    tracing::info!("SMB CSI gRPC server stopped");
    Ok(())
}

/// A socket left behind by a previous run makes `bind` fail with AddrInUse
#[cfg(unix)]
fn remove_stale_socket(path: &std::path::Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!("Removed stale socket {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
