// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Publish Volume Use Case
//!
//! Mounts an SMB share at a target path on this node.
//!
//! # DDD Pattern: Application Service
//!
//! - **Layer:** Application
//! - **Responsibility:** Validate, deduplicate and run one mount
//! - **Collaborators:**
//!   - Domain: MountRequest, MountOptionValidator, MountStore
//!   - Infrastructure: CommandRunner, HostFilesystem

use crate::application::error::NodeServiceError;
use crate::application::path_locks::PathLocks;
use crate::domain::command::CommandRunner;
use crate::domain::host::HostFilesystem;
use crate::domain::mount::{Credentials, MountRequest};
use crate::domain::mount_options::MountOptionValidator;
use crate::domain::mount_store::{Lookup, MountStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const SHARE_KEY: &str = "share";
pub const USERNAME_KEY: &str = "username";
pub const PASSWORD_KEY: &str = "password";

/// Access type requested by the orchestrator.
///
/// Only its presence and mount flags matter to an SMB mount.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeCapability {
    pub mount_flags: Vec<String>,
}

/// Publish request, already decoded from the wire
#[derive(Debug, Clone, Default)]
pub struct PublishVolumeRequest {
    pub target_path: String,
    pub volume_capability: Option<VolumeCapability>,
    pub volume_context: HashMap<String, String>,
    pub secrets: HashMap<String, String>,
}

impl PublishVolumeRequest {
    /// Check required fields and build the mount request.
    ///
    /// Credentials come from `secrets`; volume context keys of the same name
    /// are the fallback for pre-provisioned volumes that carry them as
    /// attributes.
    pub fn into_mount_request(self) -> Result<MountRequest, NodeServiceError> {
        let capability = self
            .volume_capability
            .ok_or_else(|| NodeServiceError::missing_property("VolumeCapability"))?;

        if self.target_path.is_empty() {
            return Err(NodeServiceError::missing_property("TargetPath"));
        }

        let share = self
            .volume_context
            .get(SHARE_KEY)
            .filter(|share| !share.is_empty())
            .ok_or_else(|| NodeServiceError::missing_property(SHARE_KEY))?;

        let credential = |key: &str| {
            self.secrets
                .get(key)
                .or_else(|| self.volume_context.get(key))
                .cloned()
                .unwrap_or_default()
        };
        let credentials = Credentials::new(credential(USERNAME_KEY), credential(PASSWORD_KEY));

        Ok(MountRequest::new(
            self.target_path.clone(),
            share.clone(),
            credentials,
            capability.mount_flags,
        ))
    }
}

#[async_trait]
pub trait PublishVolumeUseCase: Send + Sync {
    /// Mount the requested share at the target path
    ///
    /// # Errors
    ///
    /// - InvalidArgument: missing field or rejected mount flag
    /// - AlreadyExists: the path is mounted with a different request
    /// - Internal: the mount command failed to start or exited non-zero
    /// - Store: the mount store failed; message is passed through as is
    async fn publish(&self, request: PublishVolumeRequest) -> Result<(), NodeServiceError>;
}

pub struct StandardPublishVolumeUseCase {
    runner: Arc<dyn CommandRunner>,
    host: Arc<dyn HostFilesystem>,
    store: Arc<dyn MountStore>,
    locks: Arc<PathLocks>,
    validator: MountOptionValidator,
    mount_binary: String,
}

impl StandardPublishVolumeUseCase {
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
            validator: MountOptionValidator::new(),
            mount_binary: "mount".to_string(),
        }
    }

    pub fn with_mount_binary(mut self, mount_binary: impl Into<String>) -> Self {
        self.mount_binary = mount_binary.into();
        self
    }

    async fn mount(&self, request: &MountRequest) -> Result<(), NodeServiceError> {
        let options = self
            .validator
            .build(&request.credentials, &request.mount_flags)?;

        let args = vec![
            "-t".to_string(),
            "cifs".to_string(),
            "-o".to_string(),
            options,
            request.share.clone(),
            request.target_path.clone(),
        ];

        let mut command = self.runner.command(&self.mount_binary, &args);
        info!(share = %request.share, target_path = %request.target_path, "started mount");

        match command.combined_output().await {
            Ok(output) => {
                debug!(output = %String::from_utf8_lossy(&output), "mount output");
                info!(share = %request.share, target_path = %request.target_path, "finished mount");
                Ok(())
            }
            Err(e) => {
                error!(
                    share = %request.share,
                    target_path = %request.target_path,
                    output = e.output().unwrap_or_default(),
                    error = %e,
                    "mount failed"
                );
                Err(NodeServiceError::Internal(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl PublishVolumeUseCase for StandardPublishVolumeUseCase {
    async fn publish(&self, request: PublishVolumeRequest) -> Result<(), NodeServiceError> {
        let request = request.into_mount_request()?;
        let target_path = request.target_path.clone();

        // An existing mountpoint directory is the normal case
        if let Err(e) = self.host.create_dir_all(Path::new(&target_path)).await {
            warn!(target_path = %target_path, error = %e, "could not create target directory");
        }

        info!(target_path = %target_path, "local target path");

        let _guard = self.locks.lock(&target_path).await;

        match self.store.lookup(&target_path, &request).await? {
            Lookup::Matches => {
                debug!(target_path = %target_path, "already mounted with identical request");
                return Ok(());
            }
            Lookup::Mismatch => {
                warn!(target_path = %target_path, "already mounted with different options");
                return Err(NodeServiceError::AlreadyExists("options mismatch".to_string()));
            }
            Lookup::Absent => {}
        }

        self.mount(&request).await?;
        self.store.record(&target_path, &request).await?;

        Ok(())
    }
}
