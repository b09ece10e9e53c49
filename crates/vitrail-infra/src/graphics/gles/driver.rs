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

//! The native boundary of the GLES backend.
//!
//! Everything above this trait is plain Rust bookkeeping; everything below it
//! talks to an OpenGL ES implementation. The resource-setup calls
//! (`allocate_*`, `upload_texture`, `attach_framebuffer`,
//! `configure_vertex_array`) bind whatever they need and leave bindings
//! unspecified afterwards, so the state cache is invalidated before each
//! submission.

use std::fmt::Debug;
use std::rc::Rc;

use vitrail_core::math::Rect;
use vitrail_core::renderer::api::*;

/// Identification strings a driver can be queried for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlString {
    /// The space-separated extension list.
    Extensions,
    /// The renderer name.
    Renderer,
    /// The vendor name.
    Vendor,
    /// The version string.
    Version,
}

/// The kinds of named native objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlObjectKind {
    /// A buffer object.
    Buffer,
    /// A texture object.
    Texture,
    /// A program object.
    Program,
    /// A framebuffer object.
    Framebuffer,
    /// A vertex array object.
    VertexArray,
}

/// The binding point a buffer is used through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// `GL_ARRAY_BUFFER`.
    Array,
    /// `GL_ELEMENT_ARRAY_BUFFER`.
    ElementArray,
}

/// The result of creating a native context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextInfo {
    /// Name of the context.
    pub handle: NativeHandle,
    /// Default framebuffer formats.
    pub formats: SurfaceFormats,
}

/// Storage for every level of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureAllocation {
    /// 2D or cube.
    pub dimension: TextureDimension,
    /// Texel format.
    pub format: TextureFormat,
    /// Base level width.
    pub width: u32,
    /// Base level height.
    pub height: u32,
    /// Number of levels.
    pub mip_level_count: u32,
}

/// A rectangle of texels written into one level of a texture.
#[derive(Debug, Clone, Copy)]
pub struct TextureUpload<'a> {
    /// 2D or cube.
    pub dimension: TextureDimension,
    /// Cube face, `0` for 2D textures.
    pub face: u32,
    /// Destination level.
    pub mip_level: u32,
    /// Destination x offset.
    pub x: u32,
    /// Destination y offset.
    pub y: u32,
    /// Region width.
    pub width: u32,
    /// Region height.
    pub height: u32,
    /// Texel format of `data`.
    pub format: TextureFormat,
    /// Tightly packed texel data.
    pub data: &'a [u8],
}

/// Sources and attribute bindings of a program.
#[derive(Debug, Clone, Copy)]
pub struct ProgramSource<'a> {
    /// Vertex stage GLSL.
    pub vertex: &'a str,
    /// Fragment stage GLSL.
    pub fragment: &'a str,
    /// Attribute names bound to locations `0..n`.
    pub attributes: &'a [String],
}

/// Attachments wired into a framebuffer object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FramebufferAttachments {
    /// Color textures and the level attached.
    pub color: Vec<(NativeHandle, u32)>,
    /// Depth/stencil texture, its format and level.
    pub depth_stencil: Option<(NativeHandle, TextureFormat, u32)>,
}

/// One enabled vertex attribute location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexBinding {
    /// Attribute location.
    pub location: u32,
    /// Source buffer.
    pub buffer: NativeHandle,
    /// Component layout.
    pub format: VertexFormat,
    /// Byte distance between consecutive elements.
    pub stride: u32,
    /// Byte offset of the first element.
    pub offset: u32,
    /// Advance per instance.
    pub per_instance: bool,
}

/// A complete vertex input configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct VertexLayout {
    /// Enabled attributes.
    pub bindings: Vec<VertexBinding>,
    /// Index buffer and its element width.
    pub index_buffer: Option<(NativeHandle, IndexFormat)>,
}

/// Fixed-function state applied with a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RenderState {
    /// Rasterizer state.
    pub rasterizer: RasterizerState,
    /// Depth/stencil state.
    pub depth_stencil: DepthStencilState,
    /// Blend state.
    pub blend: BlendState,
}

/// A single draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    /// Primitive assembly mode.
    pub mode: PrimitiveMode,
    /// Range and instance count.
    pub info: DrawInfo,
    /// Index width for indexed draws.
    pub index_format: Option<IndexFormat>,
}

/// The operations the GLES backend needs from an OpenGL ES implementation.
pub trait GlesDriver: Debug {
    // --- Context ---

    /// Creates and makes current the native context.
    fn initialize_context(&self, descriptor: &ContextDescriptor) -> anyhow::Result<ContextInfo>;
    /// Destroys the native context.
    fn destroy_context(&self);
    /// Presents the back buffer.
    fn swap_buffers(&self) -> anyhow::Result<()>;
    /// Reads an identification string. Empty if unavailable.
    fn get_string(&self, name: GlString) -> String;

    // --- Objects ---

    /// Generates a new object name.
    fn create_object(&self, kind: GlObjectKind) -> anyhow::Result<NativeHandle>;
    /// Deletes an object. Unknown names are ignored.
    fn delete_object(&self, kind: GlObjectKind, handle: NativeHandle);

    // --- Storage and setup ---

    /// Allocates `size` bytes of storage for a buffer.
    fn allocate_buffer(
        &self,
        handle: NativeHandle,
        target: BufferTarget,
        size: u64,
        memory: MemoryUsage,
    ) -> anyhow::Result<()>;
    /// Writes into a buffer's storage.
    fn update_buffer(
        &self,
        handle: NativeHandle,
        target: BufferTarget,
        offset: u64,
        data: &[u8],
    ) -> anyhow::Result<()>;
    /// Allocates every level of a texture.
    fn allocate_texture(&self, handle: NativeHandle, allocation: &TextureAllocation)
        -> anyhow::Result<()>;
    /// Writes texels into the texture currently bound to the upload's target.
    fn upload_texture(&self, upload: &TextureUpload<'_>) -> anyhow::Result<()>;
    /// Compiles, attaches and links both stages. Errors carry the info log.
    fn link_program(&self, program: NativeHandle, source: &ProgramSource<'_>) -> anyhow::Result<()>;
    /// Attaches textures to a framebuffer and checks completeness.
    fn attach_framebuffer(
        &self,
        framebuffer: NativeHandle,
        attachments: &FramebufferAttachments,
    ) -> anyhow::Result<()>;
    /// Records a vertex layout into a vertex array object.
    fn configure_vertex_array(&self, vertex_array: NativeHandle, layout: &VertexLayout)
        -> anyhow::Result<()>;

    // --- Draw path ---

    /// Binds a framebuffer, [`NativeHandle::NONE`] for the default one.
    fn bind_framebuffer(&self, framebuffer: NativeHandle);
    /// Binds a texture to unit 0.
    fn bind_texture(&self, dimension: TextureDimension, texture: NativeHandle);
    /// Sets the viewport.
    fn set_viewport(&self, rect: Rect);
    /// Clears the bound framebuffer.
    fn clear(&self, values: &ClearValues);
    /// Makes a program current.
    fn use_program(&self, program: NativeHandle);
    /// Applies fixed-function state.
    fn apply_render_state(&self, state: &RenderState);
    /// Binds a vertex array object.
    fn bind_vertex_array(&self, vertex_array: NativeHandle);
    /// Enables the attributes of a layout directly, for drivers without vertex arrays.
    fn bind_vertex_layout(&self, layout: &VertexLayout);
    /// Issues a draw.
    fn draw(&self, call: &DrawCall);
}

/// Device-wide state shared with every object the device creates.
#[derive(Debug)]
pub struct GlesShared {
    /// The native driver.
    pub driver: Rc<dyn GlesDriver>,
    /// The negotiated capability table.
    pub features: FeatureTable,
    /// Backend behavior switches.
    pub toggles: BehaviorToggles,
}

/// Wraps a driver error into a resource error.
pub(crate) fn backend_error(err: anyhow::Error) -> vitrail_core::renderer::ResourceError {
    vitrail_core::renderer::ResourceError::Backend(format!("{err:#}"))
}
