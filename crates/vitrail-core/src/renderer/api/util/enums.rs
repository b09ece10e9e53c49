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

//! Common enums shared by descriptors, resources and the device.

use crate::renderer::api::core::Feature;
use std::fmt;

/// The native graphics API a device drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GraphicsApi {
    /// OpenGL ES 2.0 (optionally with extensions).
    Gles2,
    /// OpenGL ES 3.x.
    Gles3,
    /// Vulkan.
    Vulkan,
    /// Apple's Metal.
    Metal,
    /// An unknown or unsupported API.
    #[default]
    Unknown,
}

/// Identifies each kind of object the device creates, including its own subsystems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// The native rendering context.
    Context,
    /// The presentation surface.
    Window,
    /// The submission queue.
    Queue,
    /// The command storage allocator.
    CommandAllocator,
    /// A command buffer.
    CommandBuffer,
    /// A vertex, index, uniform or transfer buffer.
    Buffer,
    /// A texture.
    Texture,
    /// A view onto a texture.
    TextureView,
    /// A sampler state object.
    Sampler,
    /// A linked shader program.
    Shader,
    /// A vertex input binding (vertex buffers, attributes and index buffer).
    InputAssembler,
    /// A render pass description.
    RenderPass,
    /// A set of attachments bound together for a render pass.
    Framebuffer,
    /// A resource binding layout.
    BindingLayout,
    /// A set of binding layouts used by a pipeline.
    PipelineLayout,
    /// A complete pipeline state object.
    PipelineState,
}

impl ResourceKind {
    /// Returns a human-readable name, used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            ResourceKind::Context => "context",
            ResourceKind::Window => "window",
            ResourceKind::Queue => "queue",
            ResourceKind::CommandAllocator => "command allocator",
            ResourceKind::CommandBuffer => "command buffer",
            ResourceKind::Buffer => "buffer",
            ResourceKind::Texture => "texture",
            ResourceKind::TextureView => "texture view",
            ResourceKind::Sampler => "sampler",
            ResourceKind::Shader => "shader",
            ResourceKind::InputAssembler => "input assembler",
            ResourceKind::RenderPass => "render pass",
            ResourceKind::Framebuffer => "framebuffer",
            ResourceKind::BindingLayout => "binding layout",
            ResourceKind::PipelineLayout => "pipeline layout",
            ResourceKind::PipelineState => "pipeline state",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The kind of work a queue accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QueueType {
    /// Draw and transfer work.
    #[default]
    Graphics,
    /// Compute work.
    Compute,
    /// Transfer-only work.
    Transfer,
}

/// Whether a command buffer is submitted directly or executed from another buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CommandBufferKind {
    /// Submitted to a queue.
    #[default]
    Primary,
    /// Executed from within a primary command buffer.
    Secondary,
}

/// The number of samples per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SampleCount {
    /// 1 sample per pixel (MSAA disabled).
    #[default]
    X1,
    /// 2 samples per pixel.
    X2,
    /// 4 samples per pixel.
    X4,
    /// 8 samples per pixel.
    X8,
}

impl SampleCount {
    /// Returns the sample count as an integer.
    pub const fn count(self) -> u32 {
        match self {
            SampleCount::X1 => 1,
            SampleCount::X2 => 2,
            SampleCount::X4 => 4,
            SampleCount::X8 => 8,
        }
    }
}

/// A programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// The vertex shader stage.
    Vertex,
    /// The fragment (or pixel) shader stage.
    Fragment,
}

/// The integer width of indices in an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexFormat {
    /// Indices are 16-bit unsigned integers.
    Uint16,
    /// Indices are 32-bit unsigned integers.
    Uint32,
}

impl IndexFormat {
    /// Picks the index format matching a buffer stride, if any.
    pub const fn from_stride(stride: u32) -> Option<Self> {
        match stride {
            2 => Some(IndexFormat::Uint16),
            4 => Some(IndexFormat::Uint32),
            _ => None,
        }
    }

    /// Returns the size of one index in bytes.
    pub const fn size(self) -> u32 {
        match self {
            IndexFormat::Uint16 => 2,
            IndexFormat::Uint32 => 4,
        }
    }
}

/// How vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveMode {
    /// Each vertex is a point.
    PointList,
    /// Every two vertices form a line.
    LineList,
    /// Consecutive vertices form a connected line.
    LineStrip,
    /// Every three vertices form a triangle.
    #[default]
    TriangleList,
    /// Each vertex after the first two forms a triangle with the previous two.
    TriangleStrip,
    /// Each vertex after the first two forms a triangle with the first and previous vertex.
    TriangleFan,
}

impl PrimitiveMode {
    /// Returns the number of triangles produced by `count` vertices or indices.
    pub const fn triangle_count(self, count: u32) -> u32 {
        match self {
            PrimitiveMode::TriangleList => count / 3,
            PrimitiveMode::TriangleStrip | PrimitiveMode::TriangleFan => count.saturating_sub(2),
            PrimitiveMode::PointList | PrimitiveMode::LineList | PrimitiveMode::LineStrip => 0,
        }
    }
}

/// A comparison function used for depth testing and comparison samplers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompareFunction {
    /// The comparison never passes.
    Never,
    /// Passes if the new value is less than the existing value.
    #[default]
    Less,
    /// Passes if the new value is equal to the existing value.
    Equal,
    /// Passes if the new value is less than or equal to the existing value.
    LessEqual,
    /// Passes if the new value is greater than the existing value.
    Greater,
    /// Passes if the new value is not equal to the existing value.
    NotEqual,
    /// Passes if the new value is greater than or equal to the existing value.
    GreaterEqual,
    /// The comparison always passes.
    Always,
}

/// Where a buffer's storage lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MemoryUsage {
    /// GPU-local storage, updated rarely.
    #[default]
    Device,
    /// CPU-visible storage, updated frequently.
    Host,
}

/// The format of a single vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    /// One 32-bit float.
    Float32,
    /// Two 32-bit floats.
    Float32x2,
    /// Three 32-bit floats.
    Float32x3,
    /// Four 32-bit floats.
    Float32x4,
    /// Four 8-bit unsigned normalized components.
    Unorm8x4,
    /// Two 16-bit unsigned integers.
    Uint16x2,
}

impl VertexFormat {
    /// Number of components per attribute.
    pub const fn components(self) -> u32 {
        match self {
            VertexFormat::Float32 => 1,
            VertexFormat::Float32x2 | VertexFormat::Uint16x2 => 2,
            VertexFormat::Float32x3 => 3,
            VertexFormat::Float32x4 | VertexFormat::Unorm8x4 => 4,
        }
    }

    /// Size of the attribute in bytes.
    pub const fn size(self) -> u32 {
        match self {
            VertexFormat::Float32 | VertexFormat::Unorm8x4 | VertexFormat::Uint16x2 => 4,
            VertexFormat::Float32x2 => 8,
            VertexFormat::Float32x3 => 12,
            VertexFormat::Float32x4 => 16,
        }
    }

    /// Returns `true` if integer components are normalized to `[0, 1]`.
    pub const fn is_normalized(self) -> bool {
        matches!(self, VertexFormat::Unorm8x4)
    }
}

/// The memory layout of texels in a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    // 8-bit formats
    /// One 8-bit unsigned normalized component.
    R8Unorm,
    /// Two 8-bit unsigned normalized components.
    Rg8Unorm,
    /// Three 8-bit unsigned normalized components.
    Rgb8Unorm,
    /// Four 8-bit unsigned normalized components (RGBA).
    Rgba8Unorm,
    // Packed 16-bit formats
    /// 5-6-5 packed RGB.
    Rgb565Unorm,
    /// 5-5-5-1 packed RGBA.
    Rgb5A1Unorm,
    /// 4-4-4-4 packed RGBA.
    Rgba4Unorm,
    // Float formats
    /// One 16-bit float component.
    R16Float,
    /// Four 16-bit float components.
    Rgba16Float,
    /// One 32-bit float component.
    R32Float,
    /// Four 32-bit float components.
    Rgba32Float,
    /// Packed 11-11-10 unsigned float RGB.
    R11G11B10Float,
    // Depth/stencil formats
    /// A 16-bit unsigned normalized depth format.
    Depth16Unorm,
    /// A 24-bit depth format.
    Depth24,
    /// A 24-bit depth format with an 8-bit stencil component.
    Depth24Stencil8,
    // Compressed formats
    /// ETC1 RGB, 4x4 blocks of 8 bytes.
    Etc1Rgb8,
    /// ETC2 RGB, 4x4 blocks of 8 bytes.
    Etc2Rgb8,
    /// ETC2 RGBA (EAC alpha), 4x4 blocks of 16 bytes.
    Etc2Rgba8,
    /// PVRTC RGB at 4 bits per pixel.
    PvrtcRgb4,
    /// PVRTC RGBA at 4 bits per pixel.
    PvrtcRgba4,
    /// ASTC RGBA, 4x4 blocks of 16 bytes.
    Astc4x4,
}

impl TextureFormat {
    /// Returns `true` for block-compressed formats.
    pub const fn is_compressed(self) -> bool {
        matches!(
            self,
            TextureFormat::Etc1Rgb8
                | TextureFormat::Etc2Rgb8
                | TextureFormat::Etc2Rgba8
                | TextureFormat::PvrtcRgb4
                | TextureFormat::PvrtcRgba4
                | TextureFormat::Astc4x4
        )
    }

    /// Returns `true` for formats with a depth component.
    pub const fn is_depth(self) -> bool {
        matches!(
            self,
            TextureFormat::Depth16Unorm | TextureFormat::Depth24 | TextureFormat::Depth24Stencil8
        )
    }

    /// Returns `true` for formats with a stencil component.
    pub const fn has_stencil(self) -> bool {
        matches!(self, TextureFormat::Depth24Stencil8)
    }

    /// Returns the size in bytes of a single pixel for uncompressed formats, and
    /// `0` for compressed formats (see [`TextureFormat::image_size`]).
    pub const fn bytes_per_pixel(self) -> u32 {
        match self {
            TextureFormat::R8Unorm => 1,
            TextureFormat::Rg8Unorm
            | TextureFormat::Rgb565Unorm
            | TextureFormat::Rgb5A1Unorm
            | TextureFormat::Rgba4Unorm
            | TextureFormat::R16Float
            | TextureFormat::Depth16Unorm => 2,
            TextureFormat::Rgb8Unorm => 3,
            TextureFormat::Rgba8Unorm
            | TextureFormat::R32Float
            | TextureFormat::R11G11B10Float
            | TextureFormat::Depth24
            | TextureFormat::Depth24Stencil8 => 4,
            TextureFormat::Rgba16Float => 8,
            TextureFormat::Rgba32Float => 16,
            TextureFormat::Etc1Rgb8
            | TextureFormat::Etc2Rgb8
            | TextureFormat::Etc2Rgba8
            | TextureFormat::PvrtcRgb4
            | TextureFormat::PvrtcRgba4
            | TextureFormat::Astc4x4 => 0,
        }
    }

    /// Returns the number of bytes needed to store one `width` x `height` image.
    pub fn image_size(self, width: u32, height: u32) -> u64 {
        let (w, h) = (width as u64, height as u64);
        match self {
            TextureFormat::Etc1Rgb8 | TextureFormat::Etc2Rgb8 => w.div_ceil(4) * h.div_ceil(4) * 8,
            TextureFormat::Etc2Rgba8 | TextureFormat::Astc4x4 => {
                w.div_ceil(4) * h.div_ceil(4) * 16
            }
            TextureFormat::PvrtcRgb4 | TextureFormat::PvrtcRgba4 => (w.max(8) * h.max(8) * 4).div_ceil(8),
            _ => w * h * self.bytes_per_pixel() as u64,
        }
    }

    /// Returns the capability a device must report before textures of this
    /// format can be created, if any.
    pub const fn required_feature(self) -> Option<Feature> {
        match self {
            TextureFormat::Etc1Rgb8 => Some(Feature::FormatEtc1),
            TextureFormat::Etc2Rgb8 | TextureFormat::Etc2Rgba8 => Some(Feature::FormatEtc2),
            TextureFormat::PvrtcRgb4 | TextureFormat::PvrtcRgba4 => Some(Feature::FormatPvrtc),
            TextureFormat::Astc4x4 => Some(Feature::FormatAstc),
            TextureFormat::R11G11B10Float => Some(Feature::FormatR11G11B10F),
            TextureFormat::Depth24Stencil8 => Some(Feature::FormatD24S8),
            TextureFormat::R16Float | TextureFormat::Rgba16Float => {
                Some(Feature::TextureHalfFloat)
            }
            TextureFormat::R32Float | TextureFormat::Rgba32Float => Some(Feature::TextureFloat),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_counts_per_primitive() {
        assert_eq!(PrimitiveMode::TriangleList.triangle_count(9), 3);
        assert_eq!(PrimitiveMode::TriangleList.triangle_count(10), 3);
        assert_eq!(PrimitiveMode::TriangleStrip.triangle_count(6), 4);
        assert_eq!(PrimitiveMode::TriangleFan.triangle_count(1), 0);
        assert_eq!(PrimitiveMode::LineList.triangle_count(12), 0);
    }

    #[test]
    fn test_compressed_image_sizes() {
        assert_eq!(TextureFormat::Etc1Rgb8.image_size(16, 16), 128);
        assert_eq!(TextureFormat::Etc2Rgba8.image_size(5, 5), 64);
        assert_eq!(TextureFormat::PvrtcRgba4.image_size(4, 4), 32);
        assert_eq!(TextureFormat::Rgba8Unorm.image_size(2, 3), 24);
    }

    #[test]
    fn test_required_features() {
        assert_eq!(
            TextureFormat::Etc1Rgb8.required_feature(),
            Some(Feature::FormatEtc1)
        );
        assert_eq!(TextureFormat::Rgba8Unorm.required_feature(), None);
        assert!(TextureFormat::Depth24Stencil8.has_stencil());
        assert!(!TextureFormat::Depth16Unorm.has_stencil());
    }
}
