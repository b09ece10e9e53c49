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

//! Tracks what is currently bound so redundant driver calls are skipped.

use vitrail_core::math::Rect;
use vitrail_core::renderer::api::{NativeHandle, TextureDimension};

use super::driver::{GlesDriver, RenderState};

/// Shadow copy of the driver's binding state.
///
/// `None` means unknown: the next request always reaches the driver.
#[derive(Debug, Default)]
pub struct GlesStateCache {
    framebuffer: Option<NativeHandle>,
    program: Option<NativeHandle>,
    vertex_array: Option<NativeHandle>,
    texture: Option<(TextureDimension, NativeHandle)>,
    viewport: Option<Rect>,
    render_state: Option<RenderState>,
}

impl GlesStateCache {
    /// Creates a cache where every binding is unknown.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets every binding.
    pub fn invalidate(&mut self) {
        *self = Self::default();
    }

    /// Binds `framebuffer` unless it already is.
    pub fn bind_framebuffer(&mut self, driver: &dyn GlesDriver, framebuffer: NativeHandle) {
        if self.framebuffer != Some(framebuffer) {
            driver.bind_framebuffer(framebuffer);
            self.framebuffer = Some(framebuffer);
        }
    }

    /// Binds `texture` to unit 0 unless it already is.
    pub fn bind_texture(
        &mut self,
        driver: &dyn GlesDriver,
        dimension: TextureDimension,
        texture: NativeHandle,
    ) {
        if self.texture != Some((dimension, texture)) {
            driver.bind_texture(dimension, texture);
            self.texture = Some((dimension, texture));
        }
    }

    /// Sets the viewport unless it is unchanged.
    pub fn set_viewport(&mut self, driver: &dyn GlesDriver, rect: Rect) {
        if self.viewport != Some(rect) {
            driver.set_viewport(rect);
            self.viewport = Some(rect);
        }
    }

    /// Makes `program` current unless it already is.
    pub fn use_program(&mut self, driver: &dyn GlesDriver, program: NativeHandle) {
        if self.program != Some(program) {
            driver.use_program(program);
            self.program = Some(program);
        }
    }

    /// Applies `state` unless it is already active.
    pub fn apply_render_state(&mut self, driver: &dyn GlesDriver, state: &RenderState) {
        if self.render_state.as_ref() != Some(state) {
            driver.apply_render_state(state);
            self.render_state = Some(*state);
        }
    }

    /// Binds `vertex_array` unless it already is.
    pub fn bind_vertex_array(&mut self, driver: &dyn GlesDriver, vertex_array: NativeHandle) {
        if self.vertex_array != Some(vertex_array) {
            driver.bind_vertex_array(vertex_array);
            self.vertex_array = Some(vertex_array);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::gles::HeadlessDriver;

    #[test]
    fn test_redundant_binds_are_skipped() {
        let driver = HeadlessDriver::default();
        let mut cache = GlesStateCache::new();

        cache.use_program(&driver, NativeHandle(3));
        cache.use_program(&driver, NativeHandle(3));
        cache.bind_framebuffer(&driver, NativeHandle::NONE);
        cache.bind_framebuffer(&driver, NativeHandle::NONE);
        cache.set_viewport(&driver, Rect::from_size(4, 4));
        cache.set_viewport(&driver, Rect::from_size(4, 4));
        assert_eq!(driver.state_changes(), 3);

        cache.use_program(&driver, NativeHandle(5));
        assert_eq!(driver.state_changes(), 4);
    }

    #[test]
    fn test_invalidate_forces_rebind() {
        let driver = HeadlessDriver::default();
        let mut cache = GlesStateCache::new();

        cache.bind_vertex_array(&driver, NativeHandle(9));
        cache.invalidate();
        cache.bind_vertex_array(&driver, NativeHandle(9));
        assert_eq!(driver.state_changes(), 2);
    }
}
