// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Error classification for node operations.
//!
//! Invalid input and conflicting state are reported without side effects.
//! Command failures leave the mount store untouched so an identical retry
//! starts over. Store and host failures keep their original message and are
//! not folded into a protocol error kind.

use crate::domain::host::HostError;
use crate::domain::mount_options::MountOptionError;
use crate::domain::mount_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeServiceError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error("{0} is not implemented")]
    Unimplemented(&'static str),
}

impl NodeServiceError {
    pub fn missing_property(name: &str) -> Self {
        NodeServiceError::InvalidArgument(format!(
            "Error: a required property [{}] was not provided",
            name
        ))
    }
}

impl From<MountOptionError> for NodeServiceError {
    fn from(err: MountOptionError) -> Self {
        NodeServiceError::InvalidArgument(err.to_string())
    }
}
