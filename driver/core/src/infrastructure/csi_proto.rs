// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// This file includes the generated protobuf code from tonic/prost

pub mod csi {
    pub mod v1 {
        tonic::include_proto!("csi.v1");
    }
}
