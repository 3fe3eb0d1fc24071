// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Per-path serialization of mount and unmount work.
//!
//! The guard for a path is held across lookup, `mount` and record, so two
//! callers for the same path can never both see no entry. Different paths
//! never wait on each other.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Default)]
pub struct PathLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl PathLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other caller holds `path`, then hold it until the
    /// returned guard is dropped.
    pub async fn lock(&self, path: &str) -> PathGuard<'_> {
        let mutex = self
            .locks
            .entry(path.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let guard = mutex.lock_owned().await;

        PathGuard {
            registry: self,
            path: path.to_string(),
            guard: Some(guard),
        }
    }

    /// Number of paths that currently have a holder or waiters
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Exclusive hold on one target path
pub struct PathGuard<'a> {
    registry: &'a PathLocks,
    path: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for PathGuard<'_> {
    fn drop(&mut self) {
        // Release first so our own Arc no longer counts.
        drop(self.guard.take());

        // Only the map's reference left: nobody holds or awaits this mutex.
        // `entry()` clones under the same shard lock, so this cannot race a
        // new waiter.
        self.registry
            .locks
            .remove_if(&self.path, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
