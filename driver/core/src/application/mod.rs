// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod error;
pub mod path_locks;
pub mod publish_volume;
pub mod unpublish_volume;
pub mod node_info;

// Re-export use cases for convenience
pub use error::NodeServiceError;
pub use path_locks::PathLocks;
pub use publish_volume::{PublishVolumeUseCase, StandardPublishVolumeUseCase, PublishVolumeRequest, VolumeCapability};
pub use unpublish_volume::{UnpublishVolumeUseCase, StandardUnpublishVolumeUseCase};
pub use node_info::NodeInfoService;
