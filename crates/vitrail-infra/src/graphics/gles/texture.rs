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

use std::rc::Rc;

use vitrail_core::math::{Extent2D, Extent3D};
use vitrail_core::renderer::api::*;
use vitrail_core::renderer::traits::{GpuResource, ResourceLifecycle, Texture, TextureView};
use vitrail_core::renderer::ResourceError;

use super::driver::{backend_error, GlObjectKind, GlesShared, TextureAllocation};

fn invalid(kind: ResourceKind, reason: impl Into<String>) -> ResourceError {
    ResourceError::InvalidDescriptor {
        kind,
        reason: reason.into(),
    }
}

/// A GLES texture object with storage for every mip level.
#[derive(Debug)]
pub struct GlesTexture {
    shared: Rc<GlesShared>,
    handle: NativeHandle,
    label: Option<String>,
    format: TextureFormat,
    dimension: TextureDimension,
    size: Extent3D,
    mip_level_count: u32,
    sample_count: SampleCount,
    usage: TextureUsage,
}

impl GlesTexture {
    /// Creates an empty texture bound to the device.
    pub fn new(shared: Rc<GlesShared>) -> Self {
        Self {
            shared,
            handle: NativeHandle::NONE,
            label: None,
            format: TextureFormat::Rgba8Unorm,
            dimension: TextureDimension::D2,
            size: Extent3D::default(),
            mip_level_count: 0,
            sample_count: SampleCount::X1,
            usage: TextureUsage::EMPTY,
        }
    }

    /// The debug label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn validate(&self, descriptor: &TextureDescriptor) -> Result<(), ResourceError> {
        let kind = ResourceKind::Texture;
        let size = descriptor.size;
        if size.width == 0 || size.height == 0 {
            return Err(invalid(kind, "texture size must be non-zero"));
        }
        if descriptor.mip_level_count == 0 {
            return Err(invalid(kind, "a texture needs at least one mip level"));
        }
        let max_levels = 32 - size.width.max(size.height).leading_zeros();
        if descriptor.mip_level_count > max_levels {
            return Err(invalid(
                kind,
                format!(
                    "{} mip levels requested, {}x{} allows {max_levels}",
                    descriptor.mip_level_count, size.width, size.height
                ),
            ));
        }
        match descriptor.dimension {
            TextureDimension::D2 if size.depth_or_array_layers > 1 => {
                return Err(invalid(kind, "GLES 2 has no texture arrays"));
            }
            TextureDimension::Cube
                if size.depth_or_array_layers != 6 || size.width != size.height =>
            {
                return Err(invalid(kind, "cube maps need six square faces"));
            }
            _ => {}
        }

        if let Some(feature) = descriptor.format.required_feature() {
            if !self.shared.features[feature] {
                return Err(ResourceError::UnsupportedFormat {
                    format: descriptor.format,
                    feature,
                });
            }
        }
        if descriptor.sample_count != SampleCount::X1 && !self.shared.features[Feature::Msaa] {
            return Err(ResourceError::UnsupportedFormat {
                format: descriptor.format,
                feature: Feature::Msaa,
            });
        }
        Ok(())
    }
}

impl ResourceLifecycle for GlesTexture {
    type Descriptor<'a> = TextureDescriptor;
    const KIND: ResourceKind = ResourceKind::Texture;

    fn initialize(&mut self, descriptor: &TextureDescriptor) -> Result<(), ResourceError> {
        self.validate(descriptor)?;

        self.label = descriptor.label.clone();
        self.format = descriptor.format;
        self.dimension = descriptor.dimension;
        self.size = descriptor.size;
        self.mip_level_count = descriptor.mip_level_count;
        self.sample_count = descriptor.sample_count;
        self.usage = descriptor.usage;

        let driver = &self.shared.driver;
        self.handle = driver
            .create_object(GlObjectKind::Texture)
            .map_err(backend_error)?;
        driver
            .allocate_texture(
                self.handle,
                &TextureAllocation {
                    dimension: self.dimension,
                    format: self.format,
                    width: self.size.width,
                    height: self.size.height,
                    mip_level_count: self.mip_level_count,
                },
            )
            .map_err(backend_error)
    }

    fn destroy(&mut self) {
        if !self.handle.is_none() {
            self.shared
                .driver
                .delete_object(GlObjectKind::Texture, self.handle);
            self.handle = NativeHandle::NONE;
        }
    }
}

impl Drop for GlesTexture {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl GpuResource for GlesTexture {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Texture
    }

    fn native_handle(&self) -> NativeHandle {
        self.handle
    }
}

impl Texture for GlesTexture {
    fn format(&self) -> TextureFormat {
        self.format
    }

    fn dimension(&self) -> TextureDimension {
        self.dimension
    }

    fn size(&self) -> Extent3D {
        self.size
    }

    fn mip_level_count(&self) -> u32 {
        self.mip_level_count
    }

    fn sample_count(&self) -> SampleCount {
        self.sample_count
    }

    fn usage(&self) -> TextureUsage {
        self.usage
    }
}

/// A range of mip levels of a texture. GLES 2 has no view objects, so the view
/// only records which texture and levels it covers.
#[derive(Debug, Default)]
pub struct GlesTextureView {
    texture: NativeHandle,
    format: Option<TextureFormat>,
    size: Extent2D,
    base_mip_level: u32,
    mip_level_count: u32,
}

impl GlesTextureView {
    /// Creates an empty view.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResourceLifecycle for GlesTextureView {
    type Descriptor<'a> = TextureViewDescriptor<'a>;
    const KIND: ResourceKind = ResourceKind::TextureView;

    fn initialize(&mut self, descriptor: &TextureViewDescriptor<'_>) -> Result<(), ResourceError> {
        let kind = ResourceKind::TextureView;
        let texture = descriptor.texture;
        if texture.native_handle().is_none() {
            return Err(invalid(kind, "the viewed texture was destroyed"));
        }

        let available = texture.mip_level_count();
        let base = descriptor.base_mip_level;
        let count = descriptor
            .mip_level_count
            .unwrap_or(available.saturating_sub(base));
        let end = base.checked_add(count);
        if base >= available || count == 0 || end.map_or(true, |end| end > available) {
            return Err(invalid(
                kind,
                format!("mip range {base}+{count} outside 0..{available}"),
            ));
        }

        let format = descriptor.format.unwrap_or(texture.format());
        let source = texture.format();
        if format.is_depth() != source.is_depth()
            || format.is_compressed() != source.is_compressed()
            || format.bytes_per_pixel() != source.bytes_per_pixel()
        {
            return Err(invalid(
                kind,
                format!("{format:?} cannot view a {source:?} texture"),
            ));
        }

        self.texture = texture.native_handle();
        self.format = Some(format);
        self.size = texture.size().mip_level_size(base);
        self.base_mip_level = base;
        self.mip_level_count = count;
        Ok(())
    }

    fn destroy(&mut self) {
        self.texture = NativeHandle::NONE;
        self.format = None;
    }
}

impl GpuResource for GlesTextureView {
    fn kind(&self) -> ResourceKind {
        ResourceKind::TextureView
    }

    fn native_handle(&self) -> NativeHandle {
        self.texture
    }
}

impl TextureView for GlesTextureView {
    fn texture_handle(&self) -> NativeHandle {
        self.texture
    }

    fn format(&self) -> TextureFormat {
        self.format.unwrap_or(TextureFormat::Rgba8Unorm)
    }

    fn size(&self) -> Extent2D {
        self.size
    }

    fn base_mip_level(&self) -> u32 {
        self.base_mip_level
    }

    fn mip_level_count(&self) -> u32 {
        self.mip_level_count
    }
}
