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

//! A driver that needs no GPU.
//!
//! It hands out object names, tracks which ones are alive, counts the calls
//! that matter to the device and can be told to fail specific operations.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use anyhow::{anyhow, bail};
use vitrail_core::math::Rect;
use vitrail_core::renderer::api::*;

use super::driver::*;

/// The extension blob reported when none is configured.
pub const DEFAULT_EXTENSIONS: &str = "GL_OES_depth_texture GL_OES_compressed_ETC1_RGB8_texture \
     GL_EXT_color_buffer_half_float GL_OES_texture_half_float_linear \
     GL_EXT_draw_instanced_arrays GL_EXT_instanced_arrays GL_EXT_discard_framebuffer";

/// An in-memory [`GlesDriver`].
#[derive(Debug)]
pub struct HeadlessDriver {
    extensions: String,
    next_name: Cell<u32>,
    live: RefCell<HashMap<NativeHandle, GlObjectKind>>,
    texture_extents: RefCell<HashMap<NativeHandle, (u32, u32)>>,
    context_active: Cell<bool>,
    swap_count: Cell<u32>,
    executed_draws: Cell<u32>,
    state_changes: Cell<u32>,
    uploads: Cell<u32>,
    last_viewport: Cell<Option<Rect>>,
    fail_context: Cell<bool>,
    fail_object: Cell<Option<GlObjectKind>>,
    fail_link: Cell<bool>,
    fail_texture_storage: Cell<bool>,
}

impl Default for HeadlessDriver {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS)
    }
}

impl HeadlessDriver {
    /// Creates a driver that reports `extensions`.
    pub fn new(extensions: &str) -> Self {
        Self {
            extensions: extensions.to_owned(),
            next_name: Cell::new(1),
            live: RefCell::new(HashMap::new()),
            texture_extents: RefCell::new(HashMap::new()),
            context_active: Cell::new(false),
            swap_count: Cell::new(0),
            executed_draws: Cell::new(0),
            state_changes: Cell::new(0),
            uploads: Cell::new(0),
            last_viewport: Cell::new(None),
            fail_context: Cell::new(false),
            fail_object: Cell::new(None),
            fail_link: Cell::new(false),
            fail_texture_storage: Cell::new(false),
        }
    }

    // --- Failure injection ---

    /// Makes `initialize_context` fail.
    pub fn fail_context_creation(&self, fail: bool) {
        self.fail_context.set(fail);
    }

    /// Makes `create_object` fail for `kind`, or for nothing.
    pub fn fail_object(&self, kind: Option<GlObjectKind>) {
        self.fail_object.set(kind);
    }

    /// Makes `link_program` fail.
    pub fn fail_program_link(&self, fail: bool) {
        self.fail_link.set(fail);
    }

    /// Makes `allocate_texture` fail.
    pub fn fail_texture_storage(&self, fail: bool) {
        self.fail_texture_storage.set(fail);
    }

    // --- Observation ---

    /// Number of live objects of every kind.
    pub fn live_objects(&self) -> usize {
        self.live.borrow().len()
    }

    /// Number of live objects of `kind`.
    pub fn live_objects_of(&self, kind: GlObjectKind) -> usize {
        self.live.borrow().values().filter(|&&k| k == kind).count()
    }

    /// Whether a context currently exists.
    pub fn context_active(&self) -> bool {
        self.context_active.get()
    }

    /// Number of presented frames.
    pub fn swap_count(&self) -> u32 {
        self.swap_count.get()
    }

    /// Number of draws issued.
    pub fn executed_draws(&self) -> u32 {
        self.executed_draws.get()
    }

    /// Number of binding and state calls that reached the driver.
    pub fn state_changes(&self) -> u32 {
        self.state_changes.get()
    }

    /// Number of texture uploads.
    pub fn uploads(&self) -> u32 {
        self.uploads.get()
    }

    /// The last viewport set.
    pub fn last_viewport(&self) -> Option<Rect> {
        self.last_viewport.get()
    }

    /// The base level size last allocated for a texture.
    pub fn texture_extent(&self, handle: NativeHandle) -> Option<(u32, u32)> {
        self.texture_extents.borrow().get(&handle).copied()
    }

    fn require_live(&self, handle: NativeHandle, kind: GlObjectKind) -> anyhow::Result<()> {
        match self.live.borrow().get(&handle) {
            Some(&k) if k == kind => Ok(()),
            _ => Err(anyhow!("{handle} is not a live {kind:?}")),
        }
    }

    fn bump(counter: &Cell<u32>) {
        counter.set(counter.get() + 1);
    }
}

impl GlesDriver for HeadlessDriver {
    fn initialize_context(&self, _descriptor: &ContextDescriptor) -> anyhow::Result<ContextInfo> {
        if self.fail_context.get() {
            bail!("no matching EGL configuration");
        }
        self.context_active.set(true);
        Ok(ContextInfo {
            handle: NativeHandle(1),
            formats: SurfaceFormats::default(),
        })
    }

    fn destroy_context(&self) {
        self.context_active.set(false);
    }

    fn swap_buffers(&self) -> anyhow::Result<()> {
        if !self.context_active.get() {
            bail!("no current context");
        }
        Self::bump(&self.swap_count);
        Ok(())
    }

    fn get_string(&self, name: GlString) -> String {
        match name {
            GlString::Extensions => self.extensions.clone(),
            GlString::Renderer => "Vitrail Headless".to_owned(),
            GlString::Vendor => "Vitrail".to_owned(),
            GlString::Version => "OpenGL ES 2.0 (headless)".to_owned(),
        }
    }

    fn create_object(&self, kind: GlObjectKind) -> anyhow::Result<NativeHandle> {
        if self.fail_object.get() == Some(kind) {
            bail!("out of memory creating {kind:?}");
        }
        let handle = NativeHandle(self.next_name.get());
        self.next_name.set(handle.0 + 1);
        self.live.borrow_mut().insert(handle, kind);
        Ok(handle)
    }

    fn delete_object(&self, kind: GlObjectKind, handle: NativeHandle) {
        let mut live = self.live.borrow_mut();
        if live.get(&handle) == Some(&kind) {
            live.remove(&handle);
            self.texture_extents.borrow_mut().remove(&handle);
        }
    }

    fn allocate_buffer(
        &self,
        handle: NativeHandle,
        _target: BufferTarget,
        _size: u64,
        _memory: MemoryUsage,
    ) -> anyhow::Result<()> {
        self.require_live(handle, GlObjectKind::Buffer)
    }

    fn update_buffer(
        &self,
        handle: NativeHandle,
        _target: BufferTarget,
        _offset: u64,
        _data: &[u8],
    ) -> anyhow::Result<()> {
        self.require_live(handle, GlObjectKind::Buffer)
    }

    fn allocate_texture(
        &self,
        handle: NativeHandle,
        allocation: &TextureAllocation,
    ) -> anyhow::Result<()> {
        self.require_live(handle, GlObjectKind::Texture)?;
        if self.fail_texture_storage.get() {
            bail!(
                "out of memory allocating {}x{} texture storage",
                allocation.width,
                allocation.height
            );
        }
        self.texture_extents
            .borrow_mut()
            .insert(handle, (allocation.width, allocation.height));
        Ok(())
    }

    fn upload_texture(&self, upload: &TextureUpload<'_>) -> anyhow::Result<()> {
        let expected = upload.format.image_size(upload.width, upload.height);
        if (upload.data.len() as u64) < expected {
            bail!(
                "upload of {}x{} {:?} needs {expected} bytes, got {}",
                upload.width,
                upload.height,
                upload.format,
                upload.data.len()
            );
        }
        Self::bump(&self.uploads);
        Ok(())
    }

    fn link_program(&self, program: NativeHandle, source: &ProgramSource<'_>) -> anyhow::Result<()> {
        self.require_live(program, GlObjectKind::Program)?;
        if self.fail_link.get() || source.vertex.trim().is_empty() {
            bail!("ERROR: 0:1: '' : syntax error");
        }
        Ok(())
    }

    fn attach_framebuffer(
        &self,
        framebuffer: NativeHandle,
        attachments: &FramebufferAttachments,
    ) -> anyhow::Result<()> {
        self.require_live(framebuffer, GlObjectKind::Framebuffer)?;
        if attachments.color.is_empty() && attachments.depth_stencil.is_none() {
            bail!("GL_FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT");
        }
        for (texture, _) in &attachments.color {
            self.require_live(*texture, GlObjectKind::Texture)?;
        }
        if let Some((texture, _, _)) = attachments.depth_stencil {
            self.require_live(texture, GlObjectKind::Texture)?;
        }
        Ok(())
    }

    fn configure_vertex_array(
        &self,
        vertex_array: NativeHandle,
        layout: &VertexLayout,
    ) -> anyhow::Result<()> {
        self.require_live(vertex_array, GlObjectKind::VertexArray)?;
        for binding in &layout.bindings {
            self.require_live(binding.buffer, GlObjectKind::Buffer)?;
        }
        Ok(())
    }

    fn bind_framebuffer(&self, _framebuffer: NativeHandle) {
        Self::bump(&self.state_changes);
    }

    fn bind_texture(&self, _dimension: TextureDimension, _texture: NativeHandle) {
        Self::bump(&self.state_changes);
    }

    fn set_viewport(&self, rect: Rect) {
        self.last_viewport.set(Some(rect));
        Self::bump(&self.state_changes);
    }

    fn clear(&self, _values: &ClearValues) {}

    fn use_program(&self, _program: NativeHandle) {
        Self::bump(&self.state_changes);
    }

    fn apply_render_state(&self, _state: &RenderState) {
        Self::bump(&self.state_changes);
    }

    fn bind_vertex_array(&self, _vertex_array: NativeHandle) {
        Self::bump(&self.state_changes);
    }

    fn bind_vertex_layout(&self, _layout: &VertexLayout) {
        Self::bump(&self.state_changes);
    }

    fn draw(&self, _call: &DrawCall) {
        Self::bump(&self.executed_draws);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_objects_are_tracked() {
        let driver = HeadlessDriver::default();
        let buffer = driver.create_object(GlObjectKind::Buffer).unwrap();
        let texture = driver.create_object(GlObjectKind::Texture).unwrap();
        assert_ne!(buffer, texture);
        assert_eq!(driver.live_objects(), 2);

        // Wrong kind is ignored.
        driver.delete_object(GlObjectKind::Texture, buffer);
        assert_eq!(driver.live_objects_of(GlObjectKind::Buffer), 1);

        driver.delete_object(GlObjectKind::Buffer, buffer);
        driver.delete_object(GlObjectKind::Buffer, buffer);
        assert_eq!(driver.live_objects(), 1);
    }

    #[test]
    fn test_failure_injection() {
        let driver = HeadlessDriver::default();
        driver.fail_object(Some(GlObjectKind::Program));
        assert!(driver.create_object(GlObjectKind::Program).is_err());
        assert!(driver.create_object(GlObjectKind::Buffer).is_ok());

        driver.fail_context_creation(true);
        assert!(driver
            .initialize_context(&ContextDescriptor::default())
            .is_err());
        assert!(!driver.context_active());
    }

    #[test]
    fn test_swap_requires_context() {
        let driver = HeadlessDriver::default();
        assert!(driver.swap_buffers().is_err());
        driver
            .initialize_context(&ContextDescriptor::default())
            .unwrap();
        driver.swap_buffers().unwrap();
        assert_eq!(driver.swap_count(), 1);
    }
}
