// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! CSI Node service
//!
//! Decodes CSI requests and hands them to the publish/unpublish use cases.
//! Staging, volume stats and expansion are not supported by this driver.

use std::sync::Arc;
use tonic::{Request, Response, Status};

use crate::application::error::NodeServiceError;
use crate::application::node_info::NodeInfoService;
use crate::application::publish_volume::{
    PublishVolumeRequest, PublishVolumeUseCase, VolumeCapability,
};
use crate::application::unpublish_volume::UnpublishVolumeUseCase;
use crate::infrastructure::csi_proto::csi::v1 as csi;

use csi::node_server::{Node, NodeServer};

pub struct CsiNodeService {
    publish: Arc<dyn PublishVolumeUseCase>,
    unpublish: Arc<dyn UnpublishVolumeUseCase>,
    node_info: Arc<NodeInfoService>,
}

impl CsiNodeService {
    pub fn new(
        publish: Arc<dyn PublishVolumeUseCase>,
        unpublish: Arc<dyn UnpublishVolumeUseCase>,
        node_info: Arc<NodeInfoService>,
    ) -> Self {
        Self {
            publish,
            unpublish,
            node_info,
        }
    }

    /// Create a gRPC server instance
    pub fn into_server(self) -> NodeServer<Self> {
        NodeServer::new(self)
    }
}

impl From<csi::VolumeCapability> for VolumeCapability {
    fn from(capability: csi::VolumeCapability) -> Self {
        let mount_flags = match capability.access_type {
            Some(csi::volume_capability::AccessType::Mount(mount)) => mount.mount_flags,
            _ => Vec::new(),
        };
        VolumeCapability { mount_flags }
    }
}

impl From<csi::NodePublishVolumeRequest> for PublishVolumeRequest {
    fn from(req: csi::NodePublishVolumeRequest) -> Self {
        PublishVolumeRequest {
            target_path: req.target_path,
            volume_capability: req.volume_capability.map(VolumeCapability::from),
            volume_context: req.volume_context,
            secrets: req.secrets,
        }
    }
}

#[tonic::async_trait]
impl Node for CsiNodeService {
    async fn node_stage_volume(
        &self,
        _request: Request<csi::NodeStageVolumeRequest>,
    ) -> Result<Response<csi::NodeStageVolumeResponse>, Status> {
        Err(NodeServiceError::Unimplemented("NodeStageVolume").into())
    }

    async fn node_unstage_volume(
        &self,
        _request: Request<csi::NodeUnstageVolumeRequest>,
    ) -> Result<Response<csi::NodeUnstageVolumeResponse>, Status> {
        Err(NodeServiceError::Unimplemented("NodeUnstageVolume").into())
    }

    /// Mount the share named in the volume context at the target path
    async fn node_publish_volume(
        &self,
        request: Request<csi::NodePublishVolumeRequest>,
    ) -> Result<Response<csi::NodePublishVolumeResponse>, Status> {
        let req = request.into_inner();
        tracing::info!(
            volume_id = %req.volume_id,
            target_path = %req.target_path,
            "NodePublishVolume"
        );

        self.publish.publish(PublishVolumeRequest::from(req)).await?;

        Ok(Response::new(csi::NodePublishVolumeResponse {}))
    }

    async fn node_unpublish_volume(
        &self,
        request: Request<csi::NodeUnpublishVolumeRequest>,
    ) -> Result<Response<csi::NodeUnpublishVolumeResponse>, Status> {
        let req = request.into_inner();
        tracing::info!(
            volume_id = %req.volume_id,
            target_path = %req.target_path,
            "NodeUnpublishVolume"
        );

        self.unpublish.unpublish(&req.target_path).await?;

        Ok(Response::new(csi::NodeUnpublishVolumeResponse {}))
    }

    async fn node_get_volume_stats(
        &self,
        _request: Request<csi::NodeGetVolumeStatsRequest>,
    ) -> Result<Response<csi::NodeGetVolumeStatsResponse>, Status> {
        Err(NodeServiceError::Unimplemented("NodeGetVolumeStats").into())
    }

    async fn node_expand_volume(
        &self,
        _request: Request<csi::NodeExpandVolumeRequest>,
    ) -> Result<Response<csi::NodeExpandVolumeResponse>, Status> {
        Err(NodeServiceError::Unimplemented("NodeExpandVolume").into())
    }

    /// No optional node capabilities are advertised
    async fn node_get_capabilities(
        &self,
        _request: Request<csi::NodeGetCapabilitiesRequest>,
    ) -> Result<Response<csi::NodeGetCapabilitiesResponse>, Status> {
        Ok(Response::new(csi::NodeGetCapabilitiesResponse::default()))
    }

    async fn node_get_info(
        &self,
        _request: Request<csi::NodeGetInfoRequest>,
    ) -> Result<Response<csi::NodeGetInfoResponse>, Status> {
        let node_id = self.node_info.node_id()?;

        Ok(Response::new(csi::NodeGetInfoResponse {
            node_id,
            ..Default::default()
        }))
    }
}
