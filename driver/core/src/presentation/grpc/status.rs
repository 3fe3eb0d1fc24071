// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Mapping of application errors onto gRPC status codes.

use crate::application::error::NodeServiceError;
use tonic::Status;

impl From<NodeServiceError> for Status {
    fn from(err: NodeServiceError) -> Self {
        match err {
            NodeServiceError::InvalidArgument(message) => Status::invalid_argument(message),
            NodeServiceError::AlreadyExists(message) => Status::already_exists(message),
            NodeServiceError::Internal(message) => Status::internal(message),
            // Not reclassified: callers see the store's own message
            NodeServiceError::Store(e) => Status::unknown(e.to_string()),
            NodeServiceError::Host(e) => Status::unknown(e.to_string()),
            e @ NodeServiceError::Unimplemented(_) => Status::unimplemented(e.to_string()),
        }
    }
}
