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

//! Defines data structures related to GPU buffer resources.

use crate::math::{Extent3D, Origin3D};
use crate::renderer::api::util::MemoryUsage;
use crate::vitrail_bitflags;

vitrail_bitflags! {
    /// A set of flags describing the allowed usages of a buffer.
    ///
    /// `TRANSFER_SRC` buffers keep a host copy of their contents so they can
    /// feed [`GraphicsDevice::copy_buffers_to_texture`](crate::renderer::GraphicsDevice::copy_buffers_to_texture).
    pub struct BufferUsage: u32 {
        /// The buffer can be used as the source of a copy operation.
        const TRANSFER_SRC = 1 << 0;
        /// The buffer can be used as the destination of a copy operation.
        const TRANSFER_DST = 1 << 1;
        /// The buffer can be bound as an index buffer.
        const INDEX = 1 << 2;
        /// The buffer can be bound as a vertex buffer.
        const VERTEX = 1 << 3;
        /// The buffer can be bound as a uniform buffer.
        const UNIFORM = 1 << 4;
        /// The buffer holds indirect draw arguments.
        const INDIRECT = 1 << 5;
    }
}

/// A descriptor used to create a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferDescriptor {
    /// How the buffer will be used.
    pub usage: BufferUsage,
    /// Where the storage lives.
    pub memory_usage: MemoryUsage,
    /// The total size of the buffer in bytes.
    pub size: u64,
    /// The size of one element in bytes (a vertex, an index, ...).
    pub stride: u32,
}

impl BufferDescriptor {
    /// Creates a device-local buffer descriptor.
    pub fn new(usage: BufferUsage, size: u64, stride: u32) -> Self {
        Self {
            usage,
            memory_usage: MemoryUsage::Device,
            size,
            stride,
        }
    }

    /// Number of `stride`-sized elements that fit in the buffer.
    pub fn count(&self) -> u32 {
        if self.stride == 0 {
            0
        } else {
            (self.size / u64::from(self.stride)) as u32
        }
    }
}

/// One region of a buffer-to-texture copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BufferTextureCopy {
    /// Byte offset into the source buffer.
    pub buffer_offset: u64,
    /// Row length in texels, `0` meaning tightly packed.
    pub buffer_row_length: u32,
    /// Image height in rows, `0` meaning tightly packed.
    pub buffer_image_height: u32,
    /// Destination offset in the texture.
    pub texture_offset: Origin3D,
    /// Size of the copied region.
    pub texture_extent: Extent3D,
    /// Destination mip level.
    pub mip_level: u32,
    /// First destination array layer (or cube face).
    pub base_array_layer: u32,
    /// Number of array layers to copy.
    pub layer_count: u32,
}
