// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Long-running node plugin process

mod server;

pub use server::{load_config, start_daemon, ConfigOverrides};
