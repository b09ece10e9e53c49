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

//! Descriptors for vertex input, render passes, framebuffers, binding
//! layouts and pipeline states.

use crate::renderer::api::shader::ShaderStageFlags;
use crate::renderer::api::util::{CompareFunction, PrimitiveMode, SampleCount, TextureFormat, VertexFormat};
use crate::renderer::traits::{
    BindingLayout, Buffer, PipelineLayout, RenderPass, Shader, TextureView,
};

// --- Input assembly ---

/// One vertex attribute read from a vertex buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    /// Attribute name in the shader.
    pub name: String,
    /// Component layout.
    pub format: VertexFormat,
    /// Index into [`InputAssemblerDescriptor::vertex_buffers`].
    pub stream: u32,
    /// Byte offset within one vertex, `None` to pack after the previous
    /// attribute of the same stream.
    pub offset: Option<u32>,
    /// Advance once per instance instead of once per vertex.
    pub per_instance: bool,
}

impl VertexAttribute {
    /// A per-vertex attribute in stream 0, packed after the previous one.
    pub fn new(name: impl Into<String>, format: VertexFormat) -> Self {
        Self {
            name: name.into(),
            format,
            stream: 0,
            offset: None,
            per_instance: false,
        }
    }
}

/// A descriptor used to create an input assembler.
#[derive(Debug)]
pub struct InputAssemblerDescriptor<'a> {
    /// Vertex attributes.
    pub attributes: Vec<VertexAttribute>,
    /// One buffer per stream.
    pub vertex_buffers: Vec<&'a dyn Buffer>,
    /// Optional index buffer.
    pub index_buffer: Option<&'a dyn Buffer>,
}

// --- Render passes and framebuffers ---

/// What happens to an attachment at the start of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadOp {
    /// Keep existing contents.
    Load,
    /// Clear to the pass clear value.
    #[default]
    Clear,
    /// Contents are undefined.
    Discard,
}

/// What happens to an attachment at the end of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StoreOp {
    /// Write results back.
    #[default]
    Store,
    /// Results may be discarded.
    Discard,
}

/// A color attachment slot in a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorAttachment {
    /// Attachment format.
    pub format: TextureFormat,
    /// Samples per pixel.
    pub sample_count: SampleCount,
    /// Load operation.
    pub load_op: LoadOp,
    /// Store operation.
    pub store_op: StoreOp,
}

/// The depth/stencil attachment slot in a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthStencilAttachment {
    /// Attachment format, must be a depth format.
    pub format: TextureFormat,
    /// Depth load operation.
    pub depth_load_op: LoadOp,
    /// Depth store operation.
    pub depth_store_op: StoreOp,
    /// Stencil load operation.
    pub stencil_load_op: LoadOp,
    /// Stencil store operation.
    pub stencil_store_op: StoreOp,
}

/// A descriptor used to create a render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderPassDescriptor {
    /// Color attachments. GLES 2 supports at most one.
    pub color_attachments: Vec<ColorAttachment>,
    /// Optional depth/stencil attachment.
    pub depth_stencil_attachment: Option<DepthStencilAttachment>,
}

/// A descriptor used to create a framebuffer.
#[derive(Debug)]
pub struct FramebufferDescriptor<'a> {
    /// The pass the framebuffer is compatible with.
    pub render_pass: &'a dyn RenderPass,
    /// One view per color attachment of the pass.
    pub color_views: Vec<&'a dyn TextureView>,
    /// Depth/stencil view, required if the pass has a depth attachment.
    pub depth_stencil_view: Option<&'a dyn TextureView>,
}

// --- Binding layouts ---

/// The kind of resource a binding slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingType {
    /// A uniform buffer.
    UniformBuffer,
    /// A combined texture and sampler.
    SampledTexture,
}

/// One slot in a binding layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingLayoutEntry {
    /// Slot index, unique within the layout.
    pub binding: u32,
    /// Resource kind.
    pub ty: BindingType,
    /// Array size, at least 1.
    pub count: u32,
    /// Stages that read the slot.
    pub visibility: ShaderStageFlags,
    /// Uniform block or sampler name in the program.
    pub name: String,
}

/// A descriptor used to create a binding layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingLayoutDescriptor {
    /// Slots in the layout.
    pub entries: Vec<BindingLayoutEntry>,
}

/// A descriptor used to create a pipeline layout.
#[derive(Debug, Default)]
pub struct PipelineLayoutDescriptor<'a> {
    /// Binding layouts, one per set.
    pub layouts: Vec<&'a dyn BindingLayout>,
}

// --- Pipeline state ---

/// Which faces are culled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullMode {
    /// No culling.
    None,
    /// Cull front faces.
    Front,
    /// Cull back faces.
    #[default]
    Back,
}

/// Rasterizer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RasterizerState {
    /// Face culling.
    pub cull_mode: CullMode,
    /// Counter-clockwise triangles are front-facing when `true`.
    pub front_ccw: bool,
    /// Enable scissor testing.
    pub scissor_test: bool,
}

/// Depth and stencil testing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DepthStencilState {
    /// Enable depth testing.
    pub depth_test: bool,
    /// Enable depth writes.
    pub depth_write: bool,
    /// Depth comparison.
    pub depth_compare: CompareFunction,
    /// Enable stencil testing.
    pub stencil_test: bool,
}

/// A blend factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendFactor {
    /// 0.
    Zero,
    /// 1.
    #[default]
    One,
    /// Source alpha.
    SrcAlpha,
    /// 1 - source alpha.
    OneMinusSrcAlpha,
    /// Destination alpha.
    DstAlpha,
    /// 1 - destination alpha.
    OneMinusDstAlpha,
}

/// Blending configuration for the single color target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlendState {
    /// Enable blending.
    pub enabled: bool,
    /// Source factor.
    pub src_factor: BlendFactor,
    /// Destination factor.
    pub dst_factor: BlendFactor,
}

impl BlendState {
    /// Standard premultiplied-less alpha blending.
    pub const ALPHA: BlendState = BlendState {
        enabled: true,
        src_factor: BlendFactor::SrcAlpha,
        dst_factor: BlendFactor::OneMinusSrcAlpha,
    };
}

/// A descriptor used to create a pipeline state.
#[derive(Debug)]
pub struct PipelineStateDescriptor<'a> {
    /// The linked program.
    pub shader: &'a dyn Shader,
    /// Resource layout.
    pub layout: &'a dyn PipelineLayout,
    /// The pass the pipeline renders into.
    pub render_pass: &'a dyn RenderPass,
    /// Primitive assembly mode.
    pub primitive: PrimitiveMode,
    /// Rasterizer state.
    pub rasterizer: RasterizerState,
    /// Depth/stencil state.
    pub depth_stencil: DepthStencilState,
    /// Blend state.
    pub blend: BlendState,
}
