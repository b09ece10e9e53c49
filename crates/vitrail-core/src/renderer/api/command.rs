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

//! Descriptors for command buffers, queues and command allocators, plus the
//! values recorded into command buffers.

use crate::math::LinearRgba;
use crate::renderer::api::util::{CommandBufferKind, QueueType};
use crate::vitrail_bitflags;

/// A descriptor used to create a command buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandBufferDescriptor {
    /// Primary or secondary.
    pub kind: CommandBufferKind,
    /// The queue type the buffer will be submitted to.
    pub queue_type: QueueType,
}

/// A descriptor used to create a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueueDescriptor {
    /// The work the queue accepts.
    pub queue_type: QueueType,
}

/// A descriptor used to create a command allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandAllocatorDescriptor {
    /// Retired command packages kept for reuse; extra ones are freed.
    pub max_recycled_packages: usize,
}

impl Default for CommandAllocatorDescriptor {
    fn default() -> Self {
        Self {
            max_recycled_packages: 64,
        }
    }
}

vitrail_bitflags! {
    /// Which attachments a clear touches.
    pub struct ClearFlags: u32 {
        /// The color attachment.
        const COLOR = 1 << 0;
        /// The depth attachment.
        const DEPTH = 1 << 1;
        /// The stencil attachment.
        const STENCIL = 1 << 2;
    }
}

impl ClearFlags {
    /// Every attachment.
    pub const ALL: ClearFlags = ClearFlags::from_bits_truncate(0b111);
}

/// Values used when a render pass clears its attachments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearValues {
    /// Attachments to clear.
    pub flags: ClearFlags,
    /// Color clear value.
    pub color: LinearRgba,
    /// Depth clear value.
    pub depth: f32,
    /// Stencil clear value.
    pub stencil: u32,
}

impl Default for ClearValues {
    fn default() -> Self {
        Self {
            flags: ClearFlags::ALL,
            color: LinearRgba::BLACK,
            depth: 1.0,
            stencil: 0,
        }
    }
}

/// The range of vertices or indices an input assembler draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawInfo {
    /// Vertices drawn when non-indexed.
    pub vertex_count: u32,
    /// First vertex.
    pub first_vertex: u32,
    /// Indices drawn, `0` for non-indexed draws.
    pub index_count: u32,
    /// First index.
    pub first_index: u32,
    /// Instances drawn, `0` meaning not instanced.
    pub instance_count: u32,
}

impl DrawInfo {
    /// Returns `true` when the draw reads an index buffer.
    pub const fn is_indexed(&self) -> bool {
        self.index_count > 0
    }

    /// The number of vertices or indices the draw consumes.
    pub const fn element_count(&self) -> u32 {
        if self.is_indexed() {
            self.index_count
        } else {
            self.vertex_count
        }
    }

    /// Instances actually drawn, at least one.
    pub const fn effective_instances(&self) -> u32 {
        if self.instance_count == 0 {
            1
        } else {
            self.instance_count
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_info_counts() {
        let draw = DrawInfo {
            vertex_count: 4,
            index_count: 6,
            ..Default::default()
        };
        assert!(draw.is_indexed());
        assert_eq!(draw.element_count(), 6);
        assert_eq!(draw.effective_instances(), 1);
    }

    #[test]
    fn test_clear_all() {
        assert!(ClearFlags::ALL.contains(ClearFlags::COLOR | ClearFlags::STENCIL));
        assert_eq!(ClearValues::default().depth, 1.0);
    }
}
