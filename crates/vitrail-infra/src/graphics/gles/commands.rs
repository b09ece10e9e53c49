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

//! Recorded commands and their execution against the driver.

use std::borrow::Cow;
use std::rc::Rc;

use vitrail_core::math::Rect;
use vitrail_core::renderer::api::*;
use vitrail_core::renderer::traits::{GpuResource, Texture};
use vitrail_core::renderer::ResourceError;

use super::driver::{backend_error, DrawCall, GlesDriver, RenderState, TextureUpload, VertexLayout};
use super::state_cache::GlesStateCache;
use super::texture::GlesTexture;

/// Where a render pass draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramebufferTarget {
    /// The window's framebuffer, resolved at execution time.
    Window,
    /// A framebuffer object.
    Offscreen(NativeHandle),
}

/// A single recorded command.
#[derive(Debug, Clone)]
pub enum GlesCmd {
    /// Bind a framebuffer, set the viewport and clear.
    BeginRenderPass {
        /// Target framebuffer.
        target: FramebufferTarget,
        /// Render area.
        area: Rect,
        /// Clear values, `None` when nothing is cleared.
        clear: Option<ClearValues>,
    },
    /// Close the current pass.
    EndRenderPass,
    /// Make a program and its fixed-function state current.
    BindPipelineState {
        /// Program.
        program: NativeHandle,
        /// Fixed-function state.
        state: RenderState,
    },
    /// Bind vertex input.
    BindInputAssembler {
        /// Vertex array object, [`NativeHandle::NONE`] when the layout is bound directly.
        vertex_array: NativeHandle,
        /// The layout recorded in the vertex array, or to enable directly.
        layout: Rc<VertexLayout>,
    },
    /// Issue a draw.
    Draw(DrawCall),
}

/// Storage for one command buffer's recorded commands and counters.
#[derive(Debug, Default)]
pub struct CommandPackage {
    pub(crate) cmds: Vec<GlesCmd>,
    pub(crate) draw_calls: u32,
    pub(crate) triangles: u32,
}

impl CommandPackage {
    /// Empties the package, keeping its allocation.
    pub fn clear(&mut self) {
        self.cmds.clear();
        self.draw_calls = 0;
        self.triangles = 0;
    }

    /// Number of recorded commands.
    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    /// Returns `true` if nothing is recorded.
    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }
}

/// Replays a package through the state cache.
pub(crate) fn execute(
    driver: &dyn GlesDriver,
    cache: &mut GlesStateCache,
    package: &CommandPackage,
    window_framebuffer: NativeHandle,
) {
    for cmd in &package.cmds {
        match cmd {
            GlesCmd::BeginRenderPass {
                target,
                area,
                clear,
            } => {
                let framebuffer = match target {
                    FramebufferTarget::Window => window_framebuffer,
                    FramebufferTarget::Offscreen(handle) => *handle,
                };
                cache.bind_framebuffer(driver, framebuffer);
                cache.set_viewport(driver, *area);
                if let Some(values) = clear {
                    driver.clear(values);
                }
            }
            GlesCmd::EndRenderPass => {}
            GlesCmd::BindPipelineState { program, state } => {
                cache.use_program(driver, *program);
                cache.apply_render_state(driver, state);
            }
            GlesCmd::BindInputAssembler {
                vertex_array,
                layout,
            } => {
                cache.bind_vertex_array(driver, *vertex_array);
                if vertex_array.is_none() {
                    driver.bind_vertex_layout(layout);
                }
            }
            GlesCmd::Draw(call) => driver.draw(call),
        }
    }
}

/// A validated region, ready to upload.
struct PlannedUpload<'a> {
    region: &'a BufferTextureCopy,
    layer_count: u32,
    row_length: u32,
    layer_size: usize,
    start: usize,
}

/// Writes buffer regions into a texture.
///
/// Every region is checked before the first upload, so a rejected copy leaves the
/// texture untouched.
pub(crate) fn copy_buffers_to_texture(
    driver: &dyn GlesDriver,
    cache: &mut GlesStateCache,
    data: &[u8],
    texture: &GlesTexture,
    regions: &[BufferTextureCopy],
) -> Result<(), ResourceError> {
    let format = texture.format();
    let dimension = texture.dimension();

    let plans = regions
        .iter()
        .map(|region| plan_region(data.len(), texture, region))
        .collect::<Result<Vec<_>, _>>()?;

    cache.bind_texture(driver, dimension, texture.native_handle());

    for plan in &plans {
        let region = plan.region;
        let extent = region.texture_extent;
        for layer in 0..plan.layer_count {
            let start = plan.start + layer as usize * plan.layer_size;
            let source = &data[start..start + plan.layer_size];
            let texels = pack_rows(source, format, plan.row_length, extent.width, extent.height);

            driver
                .upload_texture(&TextureUpload {
                    dimension,
                    face: region.base_array_layer + layer,
                    mip_level: region.mip_level,
                    x: region.texture_offset.x,
                    y: region.texture_offset.y,
                    width: extent.width,
                    height: extent.height,
                    format,
                    data: &texels,
                })
                .map_err(backend_error)?;
        }
    }
    Ok(())
}

/// Checks one region against the texture and the source data.
fn plan_region<'a>(
    data_len: usize,
    texture: &GlesTexture,
    region: &'a BufferTextureCopy,
) -> Result<PlannedUpload<'a>, ResourceError> {
    let format = texture.format();
    let layers = match texture.dimension() {
        TextureDimension::D2 => 1,
        TextureDimension::Cube => 6,
    };
    let extent = region.texture_extent;

    if region.mip_level >= texture.mip_level_count() {
        return Err(ResourceError::OutOfBounds);
    }
    let level = texture.size().mip_level_size(region.mip_level);
    let fits = |offset: u32, size: u32, limit: u32| {
        offset.checked_add(size).is_some_and(|end| end <= limit)
    };
    if !fits(region.texture_offset.x, extent.width, level.width)
        || !fits(region.texture_offset.y, extent.height, level.height)
    {
        return Err(ResourceError::OutOfBounds);
    }
    let layer_count = region.layer_count.max(1);
    if !fits(region.base_array_layer, layer_count, layers) {
        return Err(ResourceError::OutOfBounds);
    }

    let row_length = if region.buffer_row_length == 0 {
        extent.width
    } else {
        region.buffer_row_length
    };
    let image_height = if region.buffer_image_height == 0 {
        extent.height
    } else {
        region.buffer_image_height
    };
    if row_length < extent.width || image_height < extent.height {
        return Err(ResourceError::InvalidDescriptor {
            kind: ResourceKind::Texture,
            reason: "buffer row length or image height smaller than the copied region".to_string(),
        });
    }
    if format.is_compressed() && row_length != extent.width {
        return Err(ResourceError::InvalidDescriptor {
            kind: ResourceKind::Texture,
            reason: "compressed copies must be tightly packed".to_string(),
        });
    }

    let layer_size = format.image_size(row_length, image_height);
    let end = layer_size
        .checked_mul(u64::from(layer_count))
        .and_then(|total| total.checked_add(region.buffer_offset))
        .ok_or(ResourceError::OutOfBounds)?;
    if end > data_len as u64 {
        return Err(ResourceError::OutOfBounds);
    }

    Ok(PlannedUpload {
        region,
        layer_count,
        row_length,
        layer_size: layer_size as usize,
        start: region.buffer_offset as usize,
    })
}

/// Drops the padding between rows when the source rows are wider than the region.
fn pack_rows(
    source: &[u8],
    format: TextureFormat,
    row_length: u32,
    width: u32,
    height: u32,
) -> Cow<'_, [u8]> {
    if row_length == width || format.is_compressed() {
        return Cow::Borrowed(source);
    }
    let bpp = format.bytes_per_pixel() as usize;
    let src_stride = row_length as usize * bpp;
    let row = width as usize * bpp;
    let mut packed = Vec::with_capacity(row * height as usize);
    for y in 0..height as usize {
        let begin = y * src_stride;
        packed.extend_from_slice(&source[begin..begin + row]);
    }
    Cow::Owned(packed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_rows_strips_padding() {
        // 2x2 RGBA8 region read from rows of 3 texels.
        let source: Vec<u8> = (0..24).collect();
        let packed = pack_rows(&source, TextureFormat::Rgba8Unorm, 3, 2, 2);
        assert_eq!(&packed[..8], &source[0..8]);
        assert_eq!(&packed[8..], &source[12..20]);
    }

    #[test]
    fn test_pack_rows_borrows_tight_data() {
        let source = [0u8; 16];
        assert!(matches!(
            pack_rows(&source, TextureFormat::Rgba8Unorm, 2, 2, 2),
            Cow::Borrowed(_)
        ));
    }
}
