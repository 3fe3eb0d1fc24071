// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Mount Store Trait
//!
//! Registry of completed mounts, keyed by target path. An entry exists for a
//! path iff a mount of exactly that request finished successfully and has not
//! been unpublished since. Entries are written only after the mount command
//! succeeded, so a failed mount leaves nothing behind and the next identical
//! request simply mounts again.
//!
//! The trait makes each call atomic on its own. Serializing the
//! lookup → mount → record sequence for one path is the caller's job
//! (see `application::path_locks`).

use crate::domain::mount::MountRequest;
use async_trait::async_trait;
use thiserror::Error;

/// Outcome of comparing a candidate request with the recorded one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Nothing is recorded for the path
    Absent,
    /// The recorded request is equivalent to the candidate
    Matches,
    /// A different request is recorded for the path
    Mismatch,
}

impl Lookup {
    pub fn is_found(&self) -> bool {
        !matches!(self, Lookup::Absent)
    }
}

/// Mount store errors.
///
/// Messages are deliberately bare: callers surface them verbatim instead of
/// wrapping them in a protocol error kind.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Fingerprint(#[from] serde_json::Error),

    #[error("{0}")]
    Backend(String),
}

#[async_trait]
pub trait MountStore: Send + Sync {
    /// Compare `candidate` with whatever is recorded for `target_path`
    async fn lookup(
        &self,
        target_path: &str,
        candidate: &MountRequest,
    ) -> Result<Lookup, StoreError>;

    /// Insert or overwrite the entry for `target_path`.
    ///
    /// Only call this once the mount has verifiably succeeded.
    async fn record(&self, target_path: &str, request: &MountRequest) -> Result<(), StoreError>;

    /// Drop the entry for `target_path`; a no-op when there is none
    async fn remove(&self, target_path: &str);
}
