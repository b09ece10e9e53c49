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

//! Defines data structures for textures, texture views and samplers.

use crate::math::Extent3D;
use crate::renderer::api::util::{CompareFunction, SampleCount, TextureFormat};
use crate::renderer::traits::Texture;
use crate::vitrail_bitflags;

vitrail_bitflags! {
    /// Describes how a texture will be used.
    pub struct TextureUsage: u32 {
        /// The texture can be the source of a copy.
        const TRANSFER_SRC = 1 << 0;
        /// The texture can be the destination of a copy or upload.
        const TRANSFER_DST = 1 << 1;
        /// The texture can be sampled in a shader.
        const SAMPLED = 1 << 2;
        /// The texture can be a color attachment.
        const COLOR_ATTACHMENT = 1 << 3;
        /// The texture can be a depth/stencil attachment.
        const DEPTH_STENCIL_ATTACHMENT = 1 << 4;
    }
}

/// The dimensionality of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureDimension {
    /// A two-dimensional texture.
    #[default]
    D2,
    /// A cube map with six 2D faces.
    Cube,
}

/// A descriptor used to create a texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureDescriptor {
    /// An optional debug label.
    pub label: Option<String>,
    /// Dimensionality.
    pub dimension: TextureDimension,
    /// Texel format.
    pub format: TextureFormat,
    /// Allowed usages.
    pub usage: TextureUsage,
    /// Size of the base level. `depth_or_array_layers` must be 6 for cube maps.
    pub size: Extent3D,
    /// Number of mip levels, at least 1.
    pub mip_level_count: u32,
    /// Samples per texel.
    pub sample_count: SampleCount,
}

impl TextureDescriptor {
    /// A sampled 2D texture with a single mip level.
    pub fn d2(format: TextureFormat, width: u32, height: u32) -> Self {
        Self {
            label: None,
            dimension: TextureDimension::D2,
            format,
            usage: TextureUsage::SAMPLED | TextureUsage::TRANSFER_DST,
            size: Extent3D::new(width, height, 1),
            mip_level_count: 1,
            sample_count: SampleCount::X1,
        }
    }
}

/// A descriptor used to create a view onto an existing texture.
#[derive(Debug)]
pub struct TextureViewDescriptor<'a> {
    /// The viewed texture.
    pub texture: &'a dyn Texture,
    /// Format override, `None` to inherit the texture's.
    pub format: Option<TextureFormat>,
    /// First visible mip level.
    pub base_mip_level: u32,
    /// Number of visible mip levels, `None` for the rest of the chain.
    pub mip_level_count: Option<u32>,
}

impl<'a> TextureViewDescriptor<'a> {
    /// A view of the whole texture.
    pub fn of(texture: &'a dyn Texture) -> Self {
        Self {
            texture,
            format: None,
            base_mip_level: 0,
            mip_level_count: None,
        }
    }
}

/// Texel filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    /// Nearest texel.
    Nearest,
    /// Linear interpolation.
    #[default]
    Linear,
}

/// Texture coordinate wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressMode {
    /// Clamp to the edge texel.
    #[default]
    ClampToEdge,
    /// Repeat.
    Repeat,
    /// Repeat with mirroring.
    MirrorRepeat,
}

/// A descriptor used to create a sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SamplerDescriptor {
    /// Minification filter.
    pub min_filter: FilterMode,
    /// Magnification filter.
    pub mag_filter: FilterMode,
    /// Filter between mip levels, `None` disables mipmapping.
    pub mip_filter: Option<FilterMode>,
    /// Wrapping along U.
    pub address_u: AddressMode,
    /// Wrapping along V.
    pub address_v: AddressMode,
    /// Wrapping along W.
    pub address_w: AddressMode,
    /// Comparison function for shadow samplers.
    pub compare: Option<CompareFunction>,
}
