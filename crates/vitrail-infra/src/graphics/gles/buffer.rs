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
use vitrail_core::renderer::traits::{Buffer, GpuResource, ResourceLifecycle};
use vitrail_core::renderer::ResourceError;

use super::driver::{backend_error, BufferTarget, GlObjectKind, GlesShared};

/// A GLES buffer.
///
/// Vertex and index buffers live in a driver buffer object. Uniform, indirect
/// and transfer buffers have no GLES 2 counterpart and are kept on the host;
/// transfer-source buffers keep a host copy even when they also have a
/// buffer object.
#[derive(Debug)]
pub struct GlesBuffer {
    shared: Rc<GlesShared>,
    handle: NativeHandle,
    target: Option<BufferTarget>,
    usage: BufferUsage,
    memory_usage: MemoryUsage,
    size: u64,
    stride: u32,
    host: Option<Vec<u8>>,
}

impl GlesBuffer {
    /// Creates an empty buffer bound to the device.
    pub fn new(shared: Rc<GlesShared>) -> Self {
        Self {
            shared,
            handle: NativeHandle::NONE,
            target: None,
            usage: BufferUsage::EMPTY,
            memory_usage: MemoryUsage::Device,
            size: 0,
            stride: 0,
            host: None,
        }
    }

    fn target_for(usage: BufferUsage) -> Option<BufferTarget> {
        if usage.contains(BufferUsage::VERTEX) {
            Some(BufferTarget::Array)
        } else if usage.contains(BufferUsage::INDEX) {
            Some(BufferTarget::ElementArray)
        } else {
            None
        }
    }

    /// Grows or shrinks the buffer. Previous contents are discarded.
    pub fn resize(&mut self, size: u64) -> Result<(), ResourceError> {
        if let Some(target) = self.target {
            self.shared
                .driver
                .allocate_buffer(self.handle, target, size, self.memory_usage)
                .map_err(backend_error)?;
        }
        if let Some(host) = self.host.as_mut() {
            host.clear();
            host.resize(size as usize, 0);
        }
        self.size = size;
        Ok(())
    }
}

impl ResourceLifecycle for GlesBuffer {
    type Descriptor<'a> = BufferDescriptor;
    const KIND: ResourceKind = ResourceKind::Buffer;

    fn initialize(&mut self, descriptor: &BufferDescriptor) -> Result<(), ResourceError> {
        if descriptor.usage.is_empty() {
            return Err(ResourceError::InvalidDescriptor {
                kind: ResourceKind::Buffer,
                reason: "buffer usage is empty".to_string(),
            });
        }
        if descriptor.usage.contains(BufferUsage::INDEX)
            && IndexFormat::from_stride(descriptor.stride).is_none()
        {
            return Err(ResourceError::InvalidDescriptor {
                kind: ResourceKind::Buffer,
                reason: format!("index stride must be 2 or 4, got {}", descriptor.stride),
            });
        }

        self.usage = descriptor.usage;
        self.memory_usage = descriptor.memory_usage;
        self.size = descriptor.size;
        self.stride = descriptor.stride;
        self.target = Self::target_for(descriptor.usage);

        if let Some(target) = self.target {
            let driver = &self.shared.driver;
            self.handle = driver
                .create_object(GlObjectKind::Buffer)
                .map_err(backend_error)?;
            driver
                .allocate_buffer(self.handle, target, self.size, self.memory_usage)
                .map_err(backend_error)?;
        }
        if self.target.is_none() || self.usage.contains(BufferUsage::TRANSFER_SRC) {
            self.host = Some(vec![0; self.size as usize]);
        }
        Ok(())
    }

    fn destroy(&mut self) {
        if !self.handle.is_none() {
            self.shared
                .driver
                .delete_object(GlObjectKind::Buffer, self.handle);
            self.handle = NativeHandle::NONE;
        }
        self.host = None;
        self.target = None;
    }
}

impl Drop for GlesBuffer {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl GpuResource for GlesBuffer {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Buffer
    }

    fn native_handle(&self) -> NativeHandle {
        self.handle
    }
}

impl Buffer for GlesBuffer {
    fn usage(&self) -> BufferUsage {
        self.usage
    }

    fn memory_usage(&self) -> MemoryUsage {
        self.memory_usage
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn stride(&self) -> u32 {
        self.stride
    }

    fn count(&self) -> u32 {
        if self.stride == 0 {
            0
        } else {
            (self.size / u64::from(self.stride)) as u32
        }
    }

    fn host_data(&self) -> Option<&[u8]> {
        self.host.as_deref()
    }

    fn update(&mut self, data: &[u8], offset: u64) -> Result<(), ResourceError> {
        let end = offset
            .checked_add(data.len() as u64)
            .ok_or(ResourceError::OutOfBounds)?;
        if end > self.size {
            return Err(ResourceError::OutOfBounds);
        }
        if let Some(target) = self.target {
            self.shared
                .driver
                .update_buffer(self.handle, target, offset, data)
                .map_err(backend_error)?;
        }
        if let Some(host) = self.host.as_mut() {
            host[offset as usize..end as usize].copy_from_slice(data);
        }
        Ok(())
    }
}
