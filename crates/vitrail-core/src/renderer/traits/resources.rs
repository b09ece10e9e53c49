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

//! Object-safe views of the resources a device creates.
//!
//! Descriptors refer to other resources through these traits, so a backend
//! only needs the information exposed here to wire objects together.

use crate::math::{Extent2D, Extent3D};
use crate::renderer::api::*;
use crate::renderer::error::ResourceError;
use std::fmt::Debug;

/// Behavior shared by every device-created object.
pub trait GpuResource: Debug {
    /// The kind of object.
    fn kind(&self) -> ResourceKind;

    /// The native name of the object, [`NativeHandle::NONE`] once destroyed.
    fn native_handle(&self) -> NativeHandle;
}

/// A linear block of GPU memory.
pub trait Buffer: GpuResource {
    /// Allowed usages.
    fn usage(&self) -> BufferUsage;
    /// Storage location.
    fn memory_usage(&self) -> MemoryUsage;
    /// Size in bytes.
    fn size(&self) -> u64;
    /// Element size in bytes.
    fn stride(&self) -> u32;
    /// Number of elements.
    fn count(&self) -> u32;
    /// The host copy kept for transfer-source buffers.
    fn host_data(&self) -> Option<&[u8]>;

    /// Writes `data` at byte `offset`.
    fn update(&mut self, data: &[u8], offset: u64) -> Result<(), ResourceError>;

    /// Writes a slice of plain-old-data values at byte `offset`.
    fn write<T: bytemuck::Pod>(&mut self, data: &[T], offset: u64) -> Result<(), ResourceError>
    where
        Self: Sized,
    {
        self.update(bytemuck::cast_slice(data), offset)
    }
}

/// An image with optional mip levels.
pub trait Texture: GpuResource {
    /// Texel format.
    fn format(&self) -> TextureFormat;
    /// Dimensionality.
    fn dimension(&self) -> TextureDimension;
    /// Base level size.
    fn size(&self) -> Extent3D;
    /// Number of mip levels.
    fn mip_level_count(&self) -> u32;
    /// Samples per texel.
    fn sample_count(&self) -> SampleCount;
    /// Allowed usages.
    fn usage(&self) -> TextureUsage;
}

/// A view onto a range of a texture's mip levels.
pub trait TextureView: GpuResource {
    /// Native name of the viewed texture.
    fn texture_handle(&self) -> NativeHandle;
    /// Format seen through the view.
    fn format(&self) -> TextureFormat;
    /// Size of the first visible level.
    fn size(&self) -> Extent2D;
    /// First visible mip level.
    fn base_mip_level(&self) -> u32;
    /// Number of visible mip levels.
    fn mip_level_count(&self) -> u32;
}

/// Texture sampling state.
pub trait Sampler: GpuResource {
    /// The state the sampler was created with.
    fn descriptor(&self) -> &SamplerDescriptor;
}

/// A linked shader program.
pub trait Shader: GpuResource {
    /// Program name.
    fn name(&self) -> &str;
    /// Attribute names in location order.
    fn attributes(&self) -> &[String];
}

/// Vertex input state: buffers, attributes and the draw range.
pub trait InputAssembler: GpuResource {
    /// Attributes, with resolved offsets.
    fn attributes(&self) -> &[VertexAttribute];
    /// The current draw range.
    fn draw_info(&self) -> DrawInfo;
    /// Replaces the draw range.
    fn set_draw_info(&mut self, info: DrawInfo);
}

/// Attachment formats and load/store behavior of a pass.
pub trait RenderPass: GpuResource {
    /// Color attachment slots.
    fn color_attachments(&self) -> &[ColorAttachment];
    /// Depth/stencil attachment slot.
    fn depth_stencil_attachment(&self) -> Option<&DepthStencilAttachment>;
}

/// A set of attachments for a pass.
pub trait Framebuffer: GpuResource {
    /// Size shared by every attachment.
    fn size(&self) -> Extent2D;
    /// Number of color attachments.
    fn color_attachment_count(&self) -> usize;
    /// Whether a depth/stencil view is attached.
    fn has_depth_stencil(&self) -> bool;
}

/// Resource binding slots.
pub trait BindingLayout: GpuResource {
    /// Slots, sorted by binding index.
    fn entries(&self) -> &[BindingLayoutEntry];
}

/// A set of binding layouts.
pub trait PipelineLayout: GpuResource {
    /// Slots of each set.
    fn sets(&self) -> &[Vec<BindingLayoutEntry>];
}

/// A complete, immutable draw state.
pub trait PipelineState: GpuResource {
    /// Primitive assembly mode.
    fn primitive(&self) -> PrimitiveMode;
    /// Native name of the program.
    fn shader_handle(&self) -> NativeHandle;
}

/// The recording state of a command buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CommandBufferState {
    /// Nothing recorded yet, or reset.
    #[default]
    Initial,
    /// Between `begin` and `end`.
    Recording,
    /// Recorded and ready for submission.
    Executable,
}

/// A recorded list of commands.
pub trait CommandBuffer: GpuResource {
    /// Primary or secondary.
    fn buffer_kind(&self) -> CommandBufferKind;
    /// Recording state.
    fn state(&self) -> CommandBufferState;
    /// Draw calls recorded since `begin`.
    fn draw_calls(&self) -> u32;
    /// Triangles recorded since `begin`.
    fn triangles(&self) -> u32;
    /// Starts recording, discarding previous contents.
    fn begin(&mut self) -> Result<(), ResourceError>;
    /// Finishes recording.
    fn end(&mut self) -> Result<(), ResourceError>;
}

/// The presentation target.
pub trait Window: GpuResource {
    /// Current size in pixels.
    fn size(&self) -> Extent2D;
    /// Whether the window renders into a device-owned framebuffer.
    fn is_offscreen(&self) -> bool;
    /// Attachment formats.
    fn formats(&self) -> SurfaceFormats;
    /// Resizes the presentation target.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), ResourceError>;
}

/// The submission queue and its per-frame counters.
pub trait Queue: GpuResource {
    /// The work the queue accepts.
    fn queue_type(&self) -> QueueType;
    /// Draw calls submitted since the last reset.
    fn draw_calls(&self) -> u32;
    /// Triangles submitted since the last reset.
    fn triangles(&self) -> u32;
    /// Zeroes both counters.
    fn reset_counters(&mut self);
}

/// Pooled storage for recorded commands.
pub trait CommandAllocator: GpuResource {
    /// Recycles storage retired since the last call.
    fn release_commands(&mut self);
}

/// The native rendering context.
pub trait Context: GpuResource {
    /// Negotiated default framebuffer formats.
    fn formats(&self) -> SurfaceFormats;
    /// Presents the back buffer.
    fn present(&mut self) -> Result<(), ResourceError>;
}
