// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::rc::Rc;

use vitrail_core::renderer::api::*;
use vitrail_core::renderer::traits::{GpuResource, RenderPass, ResourceLifecycle};
use vitrail_core::renderer::ResourceError;

use super::driver::GlesShared;

/// The attachment layout of a pass. GLES 2 has no render pass objects.
#[derive(Debug)]
pub struct GlesRenderPass {
    shared: Rc<GlesShared>,
    color_attachments: Vec<ColorAttachment>,
    depth_stencil_attachment: Option<DepthStencilAttachment>,
}

impl GlesRenderPass {
    /// Creates an empty pass bound to the device.
    pub fn new(shared: Rc<GlesShared>) -> Self {
        Self {
            shared,
            color_attachments: Vec::new(),
            depth_stencil_attachment: None,
        }
    }

    /// The attachments cleared when the pass begins.
    pub fn clear_flags(&self) -> ClearFlags {
        let mut flags = ClearFlags::EMPTY;
        if self
            .color_attachments
            .iter()
            .any(|a| a.load_op == LoadOp::Clear)
        {
            flags |= ClearFlags::COLOR;
        }
        if let Some(depth) = &self.depth_stencil_attachment {
            if depth.depth_load_op == LoadOp::Clear {
                flags |= ClearFlags::DEPTH;
            }
            if depth.format.has_stencil() && depth.stencil_load_op == LoadOp::Clear {
                flags |= ClearFlags::STENCIL;
            }
        }
        flags
    }

    fn invalid(reason: String) -> ResourceError {
        ResourceError::InvalidDescriptor {
            kind: ResourceKind::RenderPass,
            reason,
        }
    }
}

impl ResourceLifecycle for GlesRenderPass {
    type Descriptor<'a> = RenderPassDescriptor;
    const KIND: ResourceKind = ResourceKind::RenderPass;

    fn initialize(&mut self, descriptor: &RenderPassDescriptor) -> Result<(), ResourceError> {
        if descriptor.color_attachments.len() > 1 {
            return Err(Self::invalid(format!(
                "GLES 2 supports one color attachment, got {}",
                descriptor.color_attachments.len()
            )));
        }
        for attachment in &descriptor.color_attachments {
            let format = attachment.format;
            if format.is_depth() || format.is_compressed() {
                return Err(Self::invalid(format!("{format:?} is not a color format")));
            }
            let renderable = match format {
                TextureFormat::R32Float | TextureFormat::Rgba32Float => Some(Feature::ColorFloat),
                TextureFormat::R16Float | TextureFormat::Rgba16Float => {
                    Some(Feature::ColorHalfFloat)
                }
                _ => None,
            };
            if let Some(feature) = renderable {
                if !self.shared.features[feature] {
                    return Err(ResourceError::UnsupportedFormat { format, feature });
                }
            }
        }
        if let Some(depth) = &descriptor.depth_stencil_attachment {
            if !depth.format.is_depth() {
                return Err(Self::invalid(format!(
                    "{:?} is not a depth format",
                    depth.format
                )));
            }
        }

        self.color_attachments = descriptor.color_attachments.clone();
        self.depth_stencil_attachment = descriptor.depth_stencil_attachment;
        Ok(())
    }

    fn destroy(&mut self) {
        self.color_attachments.clear();
        self.depth_stencil_attachment = None;
    }
}

impl GpuResource for GlesRenderPass {
    fn kind(&self) -> ResourceKind {
        ResourceKind::RenderPass
    }

    fn native_handle(&self) -> NativeHandle {
        NativeHandle::NONE
    }
}

impl RenderPass for GlesRenderPass {
    fn color_attachments(&self) -> &[ColorAttachment] {
        &self.color_attachments
    }

    fn depth_stencil_attachment(&self) -> Option<&DepthStencilAttachment> {
        self.depth_stencil_attachment.as_ref()
    }
}
