// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Local host filesystem and identity.

use crate::domain::host::{HostError, HostFilesystem};
use async_trait::async_trait;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalHost;

impl LocalHost {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HostFilesystem for LocalHost {
    async fn create_dir_all(&self, path: &Path) -> Result<(), HostError> {
        tokio::fs::create_dir_all(path).await?;
        Ok(())
    }

    async fn remove(&self, path: &Path) -> Result<(), HostError> {
        let metadata = tokio::fs::symlink_metadata(path).await?;
        if metadata.is_dir() {
            tokio::fs::remove_dir(path).await?;
        } else {
            tokio::fs::remove_file(path).await?;
        }
        Ok(())
    }

    fn hostname(&self) -> Result<String, HostError> {
        hostname::get()?
            .into_string()
            .map_err(|_| HostError::InvalidHostname)
    }
}
