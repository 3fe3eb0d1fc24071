// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Build Script for smb-csi-core
//!
//! Compiles the CSI v1 Identity and Node service definitions from
//! `../../proto/csi.proto` into tonic server and client stubs. Generated code
//! lands in `OUT_DIR` and is included via `tonic::include_proto!` in
//! `src/infrastructure/csi_proto.rs`.
//!
//! `protoc` and the well-known type includes (`google/protobuf/wrappers.proto`)
//! come from `protoc-bin-vendored`, so no system protobuf install is needed.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path().map_err(|e| e.to_string())?);

    let well_known_types = protoc_bin_vendored::include_path().map_err(|e| e.to_string())?;
    let includes = [
        std::path::PathBuf::from("../../proto"),
        well_known_types,
    ];

    tonic_prost_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&[std::path::PathBuf::from("../../proto/csi.proto")], &includes)?;

    println!("cargo:rerun-if-changed=../../proto/csi.proto");

    Ok(())
}
