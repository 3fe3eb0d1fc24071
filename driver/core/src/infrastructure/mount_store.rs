// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! In-memory mount store.
//!
//! Process-lifetime registry of completed mounts. The mounts themselves live
//! in the kernel, so losing this state on restart only means the next publish
//! for a path runs `mount` again.

use crate::domain::mount::{Fingerprint, MountRequest};
use crate::domain::mount_store::{Lookup, MountStore, StoreError};
use async_trait::async_trait;
use dashmap::DashMap;

/// Sharded map from target path to request fingerprint
#[derive(Default)]
pub struct InMemoryMountStore {
    entries: DashMap<String, Fingerprint>,
}

impl InMemoryMountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, target_path: &str) -> bool {
        self.entries.contains_key(target_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl MountStore for InMemoryMountStore {
    async fn lookup(
        &self,
        target_path: &str,
        candidate: &MountRequest,
    ) -> Result<Lookup, StoreError> {
        let candidate = candidate.fingerprint()?;

        Ok(match self.entries.get(target_path) {
            None => Lookup::Absent,
            Some(recorded) if *recorded == candidate => Lookup::Matches,
            Some(_) => Lookup::Mismatch,
        })
    }

    async fn record(&self, target_path: &str, request: &MountRequest) -> Result<(), StoreError> {
        let fingerprint = request.fingerprint()?;
        tracing::debug!(target_path = %target_path, fingerprint = %fingerprint, "recording mount");
        self.entries.insert(target_path.to_string(), fingerprint);
        Ok(())
    }

    async fn remove(&self, target_path: &str) {
        if self.entries.remove(target_path).is_some() {
            tracing::debug!(target_path = %target_path, "forgot mount");
        }
    }
}
