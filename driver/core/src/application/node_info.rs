// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Node identity reported to the orchestrator.

use crate::application::error::NodeServiceError;
use crate::domain::host::HostFilesystem;
use std::sync::Arc;

pub struct NodeInfoService {
    host: Arc<dyn HostFilesystem>,
    node_id: Option<String>,
}

impl NodeInfoService {
    /// `node_id` overrides the hostname when set
    pub fn new(host: Arc<dyn HostFilesystem>, node_id: Option<String>) -> Self {
        Self { host, node_id }
    }

    /// Configured node id, else the hostname. Hostname failures are passed
    /// through unchanged.
    pub fn node_id(&self) -> Result<String, NodeServiceError> {
        if let Some(node_id) = &self.node_id {
            return Ok(node_id.clone());
        }
        Ok(self.host.hostname()?)
    }
}
