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

//! A [`GlesDriver`] backed by a live OpenGL ES context through `glow`.

use std::cell::Cell;
use std::fmt;
use std::num::NonZeroU32;

use anyhow::{anyhow, bail, Context as _};
use glow::HasContext;
use vitrail_core::math::Rect;
use vitrail_core::renderer::api::*;

use super::conversions::{image_target, GlTextureFormat, IntoGl};
use super::driver::{
    BufferTarget, ContextInfo, DrawCall, FramebufferAttachments, GlObjectKind, GlString,
    GlesDriver, ProgramSource, RenderState, TextureAllocation, TextureUpload, VertexLayout,
};

/// Presents the default framebuffer of the embedder's surface.
pub type SwapBuffers = Box<dyn Fn() -> anyhow::Result<()>>;

/// Drives a `glow::Context` made current by the embedder.
///
/// Context creation and buffer swapping belong to the windowing layer
/// (EGL, glutin, SDL...), so the driver adopts an existing context and calls
/// back into `swap_buffers` on present.
pub struct GlowDriver {
    gl: glow::Context,
    formats: SurfaceFormats,
    swap_buffers: SwapBuffers,
    active: Cell<bool>,
    // Attribute locations enabled by the last direct layout, as bitmasks.
    enabled_attributes: Cell<u32>,
    instanced_attributes: Cell<u32>,
}

impl fmt::Debug for GlowDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlowDriver")
            .field("formats", &self.formats)
            .field("active", &self.active.get())
            .finish_non_exhaustive()
    }
}

fn name(handle: NativeHandle) -> Option<NonZeroU32> {
    NonZeroU32::new(handle.0)
}

fn buffer(handle: NativeHandle) -> Option<glow::NativeBuffer> {
    name(handle).map(glow::NativeBuffer)
}

fn texture(handle: NativeHandle) -> Option<glow::NativeTexture> {
    name(handle).map(glow::NativeTexture)
}

fn program(handle: NativeHandle) -> Option<glow::NativeProgram> {
    name(handle).map(glow::NativeProgram)
}

fn framebuffer(handle: NativeHandle) -> Option<glow::NativeFramebuffer> {
    name(handle).map(glow::NativeFramebuffer)
}

fn vertex_array(handle: NativeHandle) -> Option<glow::NativeVertexArray> {
    name(handle).map(glow::NativeVertexArray)
}

impl GlowDriver {
    /// Wraps a context that is already current on this thread.
    pub fn new(gl: glow::Context, formats: SurfaceFormats, swap_buffers: SwapBuffers) -> Self {
        Self {
            gl,
            formats,
            swap_buffers,
            active: Cell::new(false),
            enabled_attributes: Cell::new(0),
            instanced_attributes: Cell::new(0),
        }
    }

    /// The wrapped context.
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    unsafe fn compile_stage(&self, stage: u32, source: &str) -> anyhow::Result<glow::NativeShader> {
        let shader = self.gl.create_shader(stage).map_err(|err| anyhow!(err))?;
        self.gl.shader_source(shader, source);
        self.gl.compile_shader(shader);
        if !self.gl.get_shader_compile_status(shader) {
            let log = self.gl.get_shader_info_log(shader);
            self.gl.delete_shader(shader);
            bail!("{log}");
        }
        Ok(shader)
    }

    /// Points attribute locations at their buffers and returns the enabled
    /// and instanced location masks.
    unsafe fn apply_layout(&self, layout: &VertexLayout, previous: (u32, u32)) -> (u32, u32) {
        let (previous_enabled, previous_instanced) = previous;
        let mut enabled = 0u32;
        let mut instanced = 0u32;

        for binding in &layout.bindings {
            let bit = 1u32 << binding.location;
            let (size, ty, normalized) = binding.format.into_gl();
            self.gl.bind_buffer(glow::ARRAY_BUFFER, buffer(binding.buffer));
            self.gl.enable_vertex_attrib_array(binding.location);
            self.gl.vertex_attrib_pointer_f32(
                binding.location,
                size,
                ty,
                normalized,
                binding.stride as i32,
                binding.offset as i32,
            );
            if binding.per_instance {
                self.gl.vertex_attrib_divisor(binding.location, 1);
                instanced |= bit;
            } else if previous_instanced & bit != 0 {
                self.gl.vertex_attrib_divisor(binding.location, 0);
            }
            enabled |= bit;
        }

        let stale = previous_enabled & !enabled;
        for location in 0..u32::BITS {
            if stale & (1 << location) != 0 {
                self.gl.disable_vertex_attrib_array(location);
            }
        }

        let index_buffer = layout.index_buffer.and_then(|(handle, _)| buffer(handle));
        self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, index_buffer);
        (enabled, instanced | (previous_instanced & stale))
    }
}

impl GlesDriver for GlowDriver {
    fn initialize_context(&self, descriptor: &ContextDescriptor) -> anyhow::Result<ContextInfo> {
        if descriptor.shared_context.is_some() {
            log::debug!("GlowDriver: Shared contexts are configured by the embedder; ignoring.");
        }
        self.active.set(true);
        Ok(ContextInfo {
            handle: NativeHandle(1),
            formats: self.formats,
        })
    }

    fn destroy_context(&self) {
        self.active.set(false);
    }

    fn swap_buffers(&self) -> anyhow::Result<()> {
        if !self.active.get() {
            bail!("no current context");
        }
        (self.swap_buffers)()
    }

    fn get_string(&self, name: GlString) -> String {
        let parameter = match name {
            GlString::Extensions => {
                let mut extensions: Vec<&str> = self
                    .gl
                    .supported_extensions()
                    .iter()
                    .map(String::as_str)
                    .collect();
                extensions.sort_unstable();
                return extensions.join(" ");
            }
            GlString::Renderer => glow::RENDERER,
            GlString::Vendor => glow::VENDOR,
            GlString::Version => glow::VERSION,
        };
        unsafe { self.gl.get_parameter_string(parameter) }
    }

    fn create_object(&self, kind: GlObjectKind) -> anyhow::Result<NativeHandle> {
        let raw = unsafe {
            match kind {
                GlObjectKind::Buffer => self.gl.create_buffer().map(|object| object.0),
                GlObjectKind::Texture => self.gl.create_texture().map(|object| object.0),
                GlObjectKind::Program => self.gl.create_program().map(|object| object.0),
                GlObjectKind::Framebuffer => self.gl.create_framebuffer().map(|object| object.0),
                GlObjectKind::VertexArray => {
                    self.gl.create_vertex_array().map(|object| object.0)
                }
            }
        };
        raw.map(|name| NativeHandle(name.get()))
            .map_err(|err| anyhow!("failed to create {kind:?}: {err}"))
    }

    fn delete_object(&self, kind: GlObjectKind, handle: NativeHandle) {
        unsafe {
            match kind {
                GlObjectKind::Buffer => buffer(handle).map(|b| self.gl.delete_buffer(b)),
                GlObjectKind::Texture => texture(handle).map(|t| self.gl.delete_texture(t)),
                GlObjectKind::Program => program(handle).map(|p| self.gl.delete_program(p)),
                GlObjectKind::Framebuffer => {
                    framebuffer(handle).map(|f| self.gl.delete_framebuffer(f))
                }
                GlObjectKind::VertexArray => {
                    vertex_array(handle).map(|v| self.gl.delete_vertex_array(v))
                }
            };
        }
    }

    fn allocate_buffer(
        &self,
        handle: NativeHandle,
        target: BufferTarget,
        size: u64,
        memory: MemoryUsage,
    ) -> anyhow::Result<()> {
        let size = i32::try_from(size).context("buffer size exceeds GLsizeiptr")?;
        let target = target.into_gl();
        unsafe {
            self.gl.bind_buffer(target, buffer(handle));
            self.gl.buffer_data_size(target, size, memory.into_gl());
        }
        Ok(())
    }

    fn update_buffer(
        &self,
        handle: NativeHandle,
        target: BufferTarget,
        offset: u64,
        data: &[u8],
    ) -> anyhow::Result<()> {
        let offset = i32::try_from(offset).context("buffer offset exceeds GLintptr")?;
        let target = target.into_gl();
        unsafe {
            self.gl.bind_buffer(target, buffer(handle));
            self.gl.buffer_sub_data_u8_slice(target, offset, data);
        }
        Ok(())
    }

    fn allocate_texture(
        &self,
        handle: NativeHandle,
        allocation: &TextureAllocation,
    ) -> anyhow::Result<()> {
        let target = allocation.dimension.into_gl();
        let gl_format: GlTextureFormat = allocation.format.into_gl();
        let faces = match allocation.dimension {
            TextureDimension::D2 => 1,
            TextureDimension::Cube => 6,
        };

        unsafe {
            self.gl.bind_texture(target, texture(handle));
            let min_filter = if allocation.mip_level_count > 1 {
                glow::LINEAR_MIPMAP_LINEAR
            } else {
                glow::LINEAR
            };
            self.gl
                .tex_parameter_i32(target, glow::TEXTURE_MIN_FILTER, min_filter as i32);

            for level in 0..allocation.mip_level_count {
                let width = (allocation.width >> level).max(1);
                let height = (allocation.height >> level).max(1);
                for face in 0..faces {
                    let image = image_target(allocation.dimension, face);
                    if allocation.format.is_compressed() {
                        let zeros = vec![0u8; allocation.format.image_size(width, height) as usize];
                        self.gl.compressed_tex_image_2d(
                            image,
                            level as i32,
                            gl_format.internal_format as i32,
                            width as i32,
                            height as i32,
                            0,
                            zeros.len() as i32,
                            &zeros,
                        );
                    } else {
                        self.gl.tex_image_2d(
                            image,
                            level as i32,
                            gl_format.internal_format as i32,
                            width as i32,
                            height as i32,
                            0,
                            gl_format.format,
                            gl_format.ty,
                            glow::PixelUnpackData::Slice(None),
                        );
                    }
                }
            }

            match self.gl.get_error() {
                glow::NO_ERROR => Ok(()),
                error => Err(anyhow!(
                    "allocating {}x{} {:?} failed with GL error {error:#x}",
                    allocation.width,
                    allocation.height,
                    allocation.format
                )),
            }
        }
    }

    fn upload_texture(&self, upload: &TextureUpload<'_>) -> anyhow::Result<()> {
        let image = image_target(upload.dimension, upload.face);
        let gl_format: GlTextureFormat = upload.format.into_gl();
        unsafe {
            self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            if upload.format.is_compressed() {
                self.gl.compressed_tex_sub_image_2d(
                    image,
                    upload.mip_level as i32,
                    upload.x as i32,
                    upload.y as i32,
                    upload.width as i32,
                    upload.height as i32,
                    gl_format.internal_format,
                    glow::CompressedPixelUnpackData::Slice(upload.data),
                );
            } else {
                self.gl.tex_sub_image_2d(
                    image,
                    upload.mip_level as i32,
                    upload.x as i32,
                    upload.y as i32,
                    upload.width as i32,
                    upload.height as i32,
                    gl_format.format,
                    gl_format.ty,
                    glow::PixelUnpackData::Slice(Some(upload.data)),
                );
            }
        }
        Ok(())
    }

    fn link_program(&self, handle: NativeHandle, source: &ProgramSource<'_>) -> anyhow::Result<()> {
        let program = program(handle).context("null program name")?;
        unsafe {
            let vertex = self
                .compile_stage(glow::VERTEX_SHADER, source.vertex)
                .context("vertex stage")?;
            let fragment = match self.compile_stage(glow::FRAGMENT_SHADER, source.fragment) {
                Ok(fragment) => fragment,
                Err(err) => {
                    self.gl.delete_shader(vertex);
                    return Err(err.context("fragment stage"));
                }
            };

            self.gl.attach_shader(program, vertex);
            self.gl.attach_shader(program, fragment);
            for (location, attribute) in source.attributes.iter().enumerate() {
                self.gl
                    .bind_attrib_location(program, location as u32, attribute);
            }
            self.gl.link_program(program);

            for shader in [vertex, fragment] {
                self.gl.detach_shader(program, shader);
                self.gl.delete_shader(shader);
            }

            if !self.gl.get_program_link_status(program) {
                bail!("{}", self.gl.get_program_info_log(program));
            }
        }
        Ok(())
    }

    fn attach_framebuffer(
        &self,
        handle: NativeHandle,
        attachments: &FramebufferAttachments,
    ) -> anyhow::Result<()> {
        unsafe {
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, framebuffer(handle));
            for (slot, (color, level)) in attachments.color.iter().enumerate() {
                self.gl.framebuffer_texture_2d(
                    glow::FRAMEBUFFER,
                    glow::COLOR_ATTACHMENT0 + slot as u32,
                    glow::TEXTURE_2D,
                    texture(*color),
                    *level as i32,
                );
            }
            if let Some((depth, format, level)) = attachments.depth_stencil {
                let mut points = vec![glow::DEPTH_ATTACHMENT];
                if format.has_stencil() {
                    points.push(glow::STENCIL_ATTACHMENT);
                }
                for point in points {
                    self.gl.framebuffer_texture_2d(
                        glow::FRAMEBUFFER,
                        point,
                        glow::TEXTURE_2D,
                        texture(depth),
                        level as i32,
                    );
                }
            }

            let status = self.gl.check_framebuffer_status(glow::FRAMEBUFFER);
            if status != glow::FRAMEBUFFER_COMPLETE {
                bail!("framebuffer incomplete: status {status:#x}");
            }
        }
        Ok(())
    }

    fn configure_vertex_array(
        &self,
        handle: NativeHandle,
        layout: &VertexLayout,
    ) -> anyhow::Result<()> {
        let vao = vertex_array(handle).context("null vertex array name")?;
        unsafe {
            self.gl.bind_vertex_array(Some(vao));
            self.apply_layout(layout, (0, 0));
            self.gl.bind_vertex_array(None);
        }
        Ok(())
    }

    fn bind_framebuffer(&self, handle: NativeHandle) {
        unsafe { self.gl.bind_framebuffer(glow::FRAMEBUFFER, framebuffer(handle)) }
    }

    fn bind_texture(&self, dimension: TextureDimension, handle: NativeHandle) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0);
            self.gl.bind_texture(dimension.into_gl(), texture(handle));
        }
    }

    fn set_viewport(&self, rect: Rect) {
        unsafe {
            self.gl
                .viewport(rect.x, rect.y, rect.width as i32, rect.height as i32)
        }
    }

    fn clear(&self, values: &ClearValues) {
        let mut mask = 0;
        unsafe {
            if values.flags.contains(ClearFlags::COLOR) {
                let c = values.color;
                self.gl.clear_color(c.r, c.g, c.b, c.a);
                mask |= glow::COLOR_BUFFER_BIT;
            }
            if values.flags.contains(ClearFlags::DEPTH) {
                self.gl.depth_mask(true);
                self.gl.clear_depth_f32(values.depth);
                mask |= glow::DEPTH_BUFFER_BIT;
            }
            if values.flags.contains(ClearFlags::STENCIL) {
                self.gl.clear_stencil(values.stencil as i32);
                mask |= glow::STENCIL_BUFFER_BIT;
            }
            if mask != 0 {
                self.gl.clear(mask);
            }
        }
    }

    fn use_program(&self, handle: NativeHandle) {
        unsafe { self.gl.use_program(program(handle)) }
    }

    fn apply_render_state(&self, state: &RenderState) {
        let toggle = |capability: u32, enabled: bool| unsafe {
            if enabled {
                self.gl.enable(capability);
            } else {
                self.gl.disable(capability);
            }
        };

        let rasterizer = &state.rasterizer;
        let cull: Option<u32> = rasterizer.cull_mode.into_gl();
        toggle(glow::CULL_FACE, cull.is_some());
        toggle(glow::SCISSOR_TEST, rasterizer.scissor_test);

        let depth_stencil = &state.depth_stencil;
        toggle(glow::DEPTH_TEST, depth_stencil.depth_test);
        toggle(glow::STENCIL_TEST, depth_stencil.stencil_test);
        toggle(glow::BLEND, state.blend.enabled);

        unsafe {
            if let Some(face) = cull {
                self.gl.cull_face(face);
            }
            self.gl
                .front_face(if rasterizer.front_ccw { glow::CCW } else { glow::CW });
            self.gl.depth_func(depth_stencil.depth_compare.into_gl());
            self.gl.depth_mask(depth_stencil.depth_write);
            self.gl.blend_func(
                state.blend.src_factor.into_gl(),
                state.blend.dst_factor.into_gl(),
            );
        }
    }

    fn bind_vertex_array(&self, handle: NativeHandle) {
        unsafe { self.gl.bind_vertex_array(vertex_array(handle)) }
    }

    fn bind_vertex_layout(&self, layout: &VertexLayout) {
        let previous = (self.enabled_attributes.get(), self.instanced_attributes.get());
        let (enabled, instanced) = unsafe { self.apply_layout(layout, previous) };
        self.enabled_attributes.set(enabled);
        self.instanced_attributes.set(instanced);
    }

    fn draw(&self, call: &DrawCall) {
        let mode = call.mode.into_gl();
        let info = &call.info;
        let instances = info.instance_count as i32;
        unsafe {
            match call.index_format.filter(|_| info.is_indexed()) {
                Some(format) => {
                    let count = info.index_count as i32;
                    let offset = (info.first_index * format.size()) as i32;
                    if instances > 0 {
                        self.gl.draw_elements_instanced(
                            mode,
                            count,
                            format.into_gl(),
                            offset,
                            instances,
                        );
                    } else {
                        self.gl.draw_elements(mode, count, format.into_gl(), offset);
                    }
                }
                None => {
                    let first = info.first_vertex as i32;
                    let count = info.vertex_count as i32;
                    if instances > 0 {
                        self.gl.draw_arrays_instanced(mode, first, count, instances);
                    } else {
                        self.gl.draw_arrays(mode, first, count);
                    }
                }
            }
        }
    }
}
