// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Host Filesystem Capability
//!
//! Mountpoint directory handling and node identity.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("hostname is not valid UTF-8")]
    InvalidHostname,
}

#[async_trait]
pub trait HostFilesystem: Send + Sync {
    /// Create `path` and any missing parents
    async fn create_dir_all(&self, path: &Path) -> Result<(), HostError>;

    /// Remove a file or an empty directory
    async fn remove(&self, path: &Path) -> Result<(), HostError>;

    fn hostname(&self) -> Result<String, HostError>;
}
