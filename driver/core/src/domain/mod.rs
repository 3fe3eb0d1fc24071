// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain
//!
//! Mount requests, the mount option whitelist, and the capability traits the
//! application layer drives (command execution, host filesystem, mount store).
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Mount request value types and capability ports

pub mod mount;
pub mod mount_options;
pub mod mount_store;
pub mod command;
pub mod host;
pub mod driver_config;
