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
use vitrail_core::renderer::traits::{Context, GpuResource, ResourceLifecycle};
use vitrail_core::renderer::ResourceError;

use super::driver::{backend_error, GlesDriver};

/// The native GLES context. Created first and destroyed last by the device.
#[derive(Debug)]
pub struct GlesContext {
    driver: Rc<dyn GlesDriver>,
    handle: NativeHandle,
    formats: SurfaceFormats,
}

impl GlesContext {
    /// Creates an empty context bound to `driver`.
    pub fn new(driver: Rc<dyn GlesDriver>) -> Self {
        Self {
            driver,
            handle: NativeHandle::NONE,
            formats: SurfaceFormats::default(),
        }
    }
}

impl ResourceLifecycle for GlesContext {
    type Descriptor<'a> = ContextDescriptor;
    const KIND: ResourceKind = ResourceKind::Context;

    fn initialize(&mut self, descriptor: &ContextDescriptor) -> Result<(), ResourceError> {
        let info = self
            .driver
            .initialize_context(descriptor)
            .map_err(backend_error)?;
        self.handle = info.handle;
        self.formats = info.formats;
        log::info!(
            "GLES context ready (color {:?}, depth/stencil {:?}).",
            info.formats.color,
            info.formats.depth_stencil
        );
        Ok(())
    }

    fn destroy(&mut self) {
        if !self.handle.is_none() {
            self.driver.destroy_context();
            self.handle = NativeHandle::NONE;
            log::debug!("GLES context destroyed.");
        }
    }
}

impl Drop for GlesContext {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl GpuResource for GlesContext {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Context
    }

    fn native_handle(&self) -> NativeHandle {
        self.handle
    }
}

impl Context for GlesContext {
    fn formats(&self) -> SurfaceFormats {
        self.formats
    }

    fn present(&mut self) -> Result<(), ResourceError> {
        if self.handle.is_none() {
            return Err(ResourceError::InvalidState {
                kind: ResourceKind::Context,
                reason: "present on a destroyed context".to_string(),
            });
        }
        self.driver.swap_buffers().map_err(backend_error)
    }
}
