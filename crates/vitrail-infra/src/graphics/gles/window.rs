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
use vitrail_core::renderer::traits::{GpuResource, ResourceLifecycle, Window};
use vitrail_core::renderer::ResourceError;

use super::driver::{
    backend_error, FramebufferAttachments, GlObjectKind, GlesShared, TextureAllocation,
};

/// The presentation target.
///
/// An onscreen window draws into the default framebuffer. An offscreen window
/// owns a framebuffer object with a color and a depth/stencil texture that are
/// reallocated on resize.
#[derive(Debug)]
pub struct GlesWindow {
    shared: Rc<GlesShared>,
    title: String,
    size: Extent2D,
    offscreen: bool,
    formats: SurfaceFormats,
    framebuffer: NativeHandle,
    color: NativeHandle,
    depth_stencil: NativeHandle,
    live: bool,
}

impl GlesWindow {
    /// Creates an empty window bound to the device.
    pub fn new(shared: Rc<GlesShared>) -> Self {
        Self {
            shared,
            title: String::new(),
            size: Extent2D::default(),
            offscreen: false,
            formats: SurfaceFormats::default(),
            framebuffer: NativeHandle::NONE,
            color: NativeHandle::NONE,
            depth_stencil: NativeHandle::NONE,
            live: false,
        }
    }

    /// The surface title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The framebuffer render passes targeting the window bind.
    pub fn framebuffer_handle(&self) -> NativeHandle {
        self.framebuffer
    }

    /// The offscreen color texture, [`NativeHandle::NONE`] when onscreen.
    pub fn color_texture(&self) -> NativeHandle {
        self.color
    }

    fn allocate_attachments(&self) -> Result<(), ResourceError> {
        let driver = &self.shared.driver;
        for (handle, format) in [
            (self.color, self.formats.color),
            (self.depth_stencil, self.formats.depth_stencil),
        ] {
            driver
                .allocate_texture(
                    handle,
                    &TextureAllocation {
                        dimension: TextureDimension::D2,
                        format,
                        width: self.size.width,
                        height: self.size.height,
                        mip_level_count: 1,
                    },
                )
                .map_err(backend_error)?;
        }
        Ok(())
    }

    fn create_offscreen_target(&mut self) -> Result<(), ResourceError> {
        let driver = self.shared.driver.clone();
        self.color = driver
            .create_object(GlObjectKind::Texture)
            .map_err(backend_error)?;
        self.depth_stencil = driver
            .create_object(GlObjectKind::Texture)
            .map_err(backend_error)?;
        self.framebuffer = driver
            .create_object(GlObjectKind::Framebuffer)
            .map_err(backend_error)?;

        self.allocate_attachments()?;
        driver
            .attach_framebuffer(
                self.framebuffer,
                &FramebufferAttachments {
                    color: vec![(self.color, 0)],
                    depth_stencil: Some((self.depth_stencil, self.formats.depth_stencil, 0)),
                },
            )
            .map_err(backend_error)
    }
}

impl ResourceLifecycle for GlesWindow {
    type Descriptor<'a> = WindowDescriptor;
    const KIND: ResourceKind = ResourceKind::Window;

    fn initialize(&mut self, descriptor: &WindowDescriptor) -> Result<(), ResourceError> {
        self.title = descriptor.title.clone();
        self.size = Extent2D::new(descriptor.width, descriptor.height);
        self.offscreen = descriptor.offscreen;
        self.formats = descriptor.formats;
        self.live = true;

        if self.offscreen {
            self.create_offscreen_target()?;
        }
        log::info!(
            "Window '{}' created ({}x{}, {}).",
            self.title,
            self.size.width,
            self.size.height,
            if self.offscreen { "offscreen" } else { "onscreen" }
        );
        Ok(())
    }

    fn destroy(&mut self) {
        if !self.live {
            return;
        }
        let driver = &self.shared.driver;
        for (kind, handle) in [
            (GlObjectKind::Framebuffer, &mut self.framebuffer),
            (GlObjectKind::Texture, &mut self.color),
            (GlObjectKind::Texture, &mut self.depth_stencil),
        ] {
            if !handle.is_none() {
                driver.delete_object(kind, *handle);
                *handle = NativeHandle::NONE;
            }
        }
        self.live = false;
    }
}

impl Drop for GlesWindow {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl GpuResource for GlesWindow {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Window
    }

    fn native_handle(&self) -> NativeHandle {
        self.framebuffer
    }
}

impl Window for GlesWindow {
    fn size(&self) -> Extent2D {
        self.size
    }

    fn is_offscreen(&self) -> bool {
        self.offscreen
    }

    fn formats(&self) -> SurfaceFormats {
        self.formats
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), ResourceError> {
        let previous = std::mem::replace(&mut self.size, Extent2D::new(width, height));
        if self.offscreen && self.live {
            if let Err(error) = self.allocate_attachments() {
                self.size = previous;
                return Err(error);
            }
        }
        log::debug!("Window '{}' resized to {width}x{height}.", self.title);
        Ok(())
    }
}
