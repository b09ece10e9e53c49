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

use vitrail_core::math::Extent2D;
use vitrail_core::renderer::api::*;
use vitrail_core::renderer::traits::{
    Framebuffer, GpuResource, RenderPass, ResourceLifecycle, TextureView,
};
use vitrail_core::renderer::ResourceError;

use super::driver::{backend_error, FramebufferAttachments, GlObjectKind, GlesShared};

/// A set of attachments for a pass.
///
/// A descriptor with no views targets the device window: no framebuffer object
/// is created and the window's framebuffer is bound when the pass begins.
#[derive(Debug)]
pub struct GlesFramebuffer {
    shared: Rc<GlesShared>,
    handle: NativeHandle,
    window_target: bool,
    size: Extent2D,
    color_attachment_count: usize,
    has_depth_stencil: bool,
}

impl GlesFramebuffer {
    /// Creates an empty framebuffer. `window_size` is used for window targets.
    pub fn new(shared: Rc<GlesShared>, window_size: Extent2D) -> Self {
        Self {
            shared,
            handle: NativeHandle::NONE,
            window_target: false,
            size: window_size,
            color_attachment_count: 0,
            has_depth_stencil: false,
        }
    }

    /// Returns `true` if the framebuffer draws into the window.
    pub fn is_window_target(&self) -> bool {
        self.window_target
    }

    fn invalid(reason: String) -> ResourceError {
        ResourceError::InvalidDescriptor {
            kind: ResourceKind::Framebuffer,
            reason,
        }
    }

    fn check_view(
        view: &dyn TextureView,
        expected: TextureFormat,
        size: &mut Option<Extent2D>,
    ) -> Result<(), ResourceError> {
        if view.texture_handle().is_none() {
            return Err(Self::invalid("attachment view has no texture".into()));
        }
        if view.format() != expected {
            return Err(Self::invalid(format!(
                "attachment is {:?}, the pass expects {expected:?}",
                view.format()
            )));
        }
        match *size {
            Some(s) if s != view.size() => Err(Self::invalid(format!(
                "attachment sizes differ: {}x{} and {}x{}",
                s.width,
                s.height,
                view.size().width,
                view.size().height
            ))),
            _ => {
                *size = Some(view.size());
                Ok(())
            }
        }
    }
}

impl ResourceLifecycle for GlesFramebuffer {
    type Descriptor<'a> = FramebufferDescriptor<'a>;
    const KIND: ResourceKind = ResourceKind::Framebuffer;

    fn initialize(&mut self, descriptor: &FramebufferDescriptor<'_>) -> Result<(), ResourceError> {
        let pass = descriptor.render_pass;
        if descriptor.color_views.is_empty() && descriptor.depth_stencil_view.is_none() {
            self.color_attachment_count = pass.color_attachments().len();
            self.has_depth_stencil = pass.depth_stencil_attachment().is_some();
            self.window_target = true;
            return Ok(());
        }

        if descriptor.color_views.len() != pass.color_attachments().len() {
            return Err(Self::invalid(format!(
                "{} color views for {} color attachments",
                descriptor.color_views.len(),
                pass.color_attachments().len()
            )));
        }
        let mut size = None;
        let mut attachments = FramebufferAttachments::default();
        for (view, slot) in descriptor.color_views.iter().zip(pass.color_attachments()) {
            Self::check_view(*view, slot.format, &mut size)?;
            attachments
                .color
                .push((view.texture_handle(), view.base_mip_level()));
        }
        match (pass.depth_stencil_attachment(), descriptor.depth_stencil_view) {
            (Some(slot), Some(view)) => {
                Self::check_view(view, slot.format, &mut size)?;
                attachments.depth_stencil =
                    Some((view.texture_handle(), slot.format, view.base_mip_level()));
            }
            (None, None) => {}
            _ => {
                return Err(Self::invalid(
                    "depth/stencil view does not match the pass".into(),
                ))
            }
        }

        let driver = &self.shared.driver;
        self.handle = driver
            .create_object(GlObjectKind::Framebuffer)
            .map_err(backend_error)?;
        driver
            .attach_framebuffer(self.handle, &attachments)
            .map_err(backend_error)?;

        self.size = size.unwrap_or_default();
        self.color_attachment_count = attachments.color.len();
        self.has_depth_stencil = attachments.depth_stencil.is_some();
        Ok(())
    }

    fn destroy(&mut self) {
        if !self.handle.is_none() {
            self.shared
                .driver
                .delete_object(GlObjectKind::Framebuffer, self.handle);
            self.handle = NativeHandle::NONE;
        }
    }
}

impl Drop for GlesFramebuffer {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl GpuResource for GlesFramebuffer {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Framebuffer
    }

    fn native_handle(&self) -> NativeHandle {
        self.handle
    }
}

impl Framebuffer for GlesFramebuffer {
    fn size(&self) -> Extent2D {
        self.size
    }

    fn color_attachment_count(&self) -> usize {
        self.color_attachment_count
    }

    fn has_depth_stencil(&self) -> bool {
        self.has_depth_stencil
    }
}
