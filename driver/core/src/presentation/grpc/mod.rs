// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod identity;
pub mod node;
pub mod server;
pub mod status;

pub use identity::CsiIdentityService;
pub use node::CsiNodeService;
pub use server::{build_node_service, start_grpc_server};
