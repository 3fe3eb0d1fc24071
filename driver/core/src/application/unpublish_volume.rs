// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Unpublish Volume Use Case
//!
//! Lazily unmounts a target path, removes the mountpoint directory and
//! forgets the recorded mount.
//!
//! - **Layer:** Application
//! - **Collaborators:** MountStore, CommandRunner, HostFilesystem

use crate::application::error::NodeServiceError;
use crate::application::path_locks::PathLocks;
use crate::domain::command::CommandRunner;
use crate::domain::host::HostFilesystem;
use crate::domain::mount_store::MountStore;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

#[async_trait]
pub trait UnpublishVolumeUseCase: Send + Sync {
    /// Unmount `target_path`
    ///
    /// The mount store entry is removed even when the unmount or the
    /// directory removal fails; the orchestrator does not retry an unpublish
    /// with the same request.
    async fn unpublish(&self, target_path: &str) -> Result<(), NodeServiceError>;
}

pub struct StandardUnpublishVolumeUseCase {
    runner: Arc<dyn CommandRunner>,
    host: Arc<dyn HostFilesystem>,
    store: Arc<dyn MountStore>,
    locks: Arc<PathLocks>,
    umount_binary: String,
}

impl StandardUnpublishVolumeUseCase {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        host: Arc<dyn HostFilesystem>,
        store: Arc<dyn MountStore>,
        locks: Arc<PathLocks>,
    ) -> Self {
        Self {
            runner,
            host,
            store,
            locks,
            umount_binary: "umount".to_string(),
        }
    }

    pub fn with_umount_binary(mut self, umount_binary: impl Into<String>) -> Self {
        self.umount_binary = umount_binary.into();
        self
    }

    async fn unmount_and_remove(&self, target_path: &str) -> Result<(), NodeServiceError> {
        let args = vec!["-l".to_string(), target_path.to_string()];
        let mut command = self.runner.command(&self.umount_binary, &args);

        command.start().map_err(|e| {
            error!(target_path = %target_path, error = %e, "umount failed to start");
            NodeServiceError::Internal(e.to_string())
        })?;
        info!(target_path = %target_path, "started umount");

        command.wait().await.map_err(|e| {
            error!(target_path = %target_path, error = %e, "umount failed");
            NodeServiceError::Internal(e.to_string())
        })?;
        info!(target_path = %target_path, "finished umount");

        self.host.remove(Path::new(target_path)).await.map_err(|e| {
            error!(target_path = %target_path, error = %e, "failed to remove target directory");
            NodeServiceError::Internal(e.to_string())
        })?;
        info!(target_path = %target_path, "removed dir");

        Ok(())
    }
}

#[async_trait]
impl UnpublishVolumeUseCase for StandardUnpublishVolumeUseCase {
    async fn unpublish(&self, target_path: &str) -> Result<(), NodeServiceError> {
        if target_path.is_empty() {
            return Err(NodeServiceError::missing_property("TargetPath"));
        }

        let _guard = self.locks.lock(target_path).await;

        // Forget the mount before unmounting so a dropped request cannot
        // leave an entry behind for a path that is no longer mounted
        self.store.remove(target_path).await;

        self.unmount_and_remove(target_path).await
    }
}
