// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod csi_proto;
pub mod host;
pub mod mount_store;
pub mod process;

pub use host::LocalHost;
pub use mount_store::InMemoryMountStore;
pub use process::TokioCommandRunner;
