// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! SMB CSI node plugin core
//!
//! Mounts and unmounts SMB/CIFS shares on behalf of a container orchestrator
//! through the CSI `Node` service.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Mount coordination, publish/unpublish orchestration and the
//!   gRPC surface that exposes them

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
