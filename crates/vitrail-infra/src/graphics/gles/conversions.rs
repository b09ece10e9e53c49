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

//! Mappings from backend-agnostic enums to OpenGL ES enumerants.

use vitrail_core::renderer::api::*;

use super::driver::BufferTarget;

// Extension enumerants that are not part of core GLES 2.
const HALF_FLOAT_OES: u32 = 0x8D61;
const DEPTH_STENCIL_OES: u32 = 0x84F9;
const UNSIGNED_INT_24_8_OES: u32 = 0x84FA;
const UNSIGNED_INT_10F_11F_11F_REV: u32 = 0x8C3B;
const ETC1_RGB8_OES: u32 = 0x8D64;
const COMPRESSED_RGB8_ETC2: u32 = 0x9274;
const COMPRESSED_RGBA8_ETC2_EAC: u32 = 0x9278;
const COMPRESSED_RGB_PVRTC_4BPPV1_IMG: u32 = 0x8C00;
const COMPRESSED_RGBA_PVRTC_4BPPV1_IMG: u32 = 0x8C02;
const COMPRESSED_RGBA_ASTC_4X4_KHR: u32 = 0x93B0;

/// A local extension trait to convert backend-agnostic types into GL enumerants.
pub trait IntoGl<T> {
    /// Consumes self and converts it into its GL representation.
    fn into_gl(self) -> T;
}

/// The three enumerants describing a texel layout to `glTexImage2D`.
///
/// Compressed formats only use `internal_format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlTextureFormat {
    /// Internal format. Equal to `format` for uncompressed GLES 2 textures.
    pub internal_format: u32,
    /// Pixel transfer format.
    pub format: u32,
    /// Pixel transfer component type.
    pub ty: u32,
}

impl GlTextureFormat {
    const fn uncompressed(format: u32, ty: u32) -> Self {
        Self {
            internal_format: format,
            format,
            ty,
        }
    }

    const fn compressed(internal_format: u32) -> Self {
        Self {
            internal_format,
            format: 0,
            ty: 0,
        }
    }
}

impl IntoGl<GlTextureFormat> for TextureFormat {
    fn into_gl(self) -> GlTextureFormat {
        use GlTextureFormat as F;
        match self {
            TextureFormat::R8Unorm => F::uncompressed(glow::LUMINANCE, glow::UNSIGNED_BYTE),
            TextureFormat::Rg8Unorm => F::uncompressed(glow::LUMINANCE_ALPHA, glow::UNSIGNED_BYTE),
            TextureFormat::Rgb8Unorm => F::uncompressed(glow::RGB, glow::UNSIGNED_BYTE),
            TextureFormat::Rgba8Unorm => F::uncompressed(glow::RGBA, glow::UNSIGNED_BYTE),
            TextureFormat::Rgb565Unorm => F::uncompressed(glow::RGB, glow::UNSIGNED_SHORT_5_6_5),
            TextureFormat::Rgb5A1Unorm => F::uncompressed(glow::RGBA, glow::UNSIGNED_SHORT_5_5_5_1),
            TextureFormat::Rgba4Unorm => F::uncompressed(glow::RGBA, glow::UNSIGNED_SHORT_4_4_4_4),
            TextureFormat::R16Float => F::uncompressed(glow::LUMINANCE, HALF_FLOAT_OES),
            TextureFormat::Rgba16Float => F::uncompressed(glow::RGBA, HALF_FLOAT_OES),
            TextureFormat::R32Float => F::uncompressed(glow::LUMINANCE, glow::FLOAT),
            TextureFormat::Rgba32Float => F::uncompressed(glow::RGBA, glow::FLOAT),
            TextureFormat::R11G11B10Float => {
                F::uncompressed(glow::RGB, UNSIGNED_INT_10F_11F_11F_REV)
            }
            TextureFormat::Depth16Unorm => {
                F::uncompressed(glow::DEPTH_COMPONENT, glow::UNSIGNED_SHORT)
            }
            TextureFormat::Depth24 => F::uncompressed(glow::DEPTH_COMPONENT, glow::UNSIGNED_INT),
            TextureFormat::Depth24Stencil8 => {
                F::uncompressed(DEPTH_STENCIL_OES, UNSIGNED_INT_24_8_OES)
            }
            TextureFormat::Etc1Rgb8 => F::compressed(ETC1_RGB8_OES),
            TextureFormat::Etc2Rgb8 => F::compressed(COMPRESSED_RGB8_ETC2),
            TextureFormat::Etc2Rgba8 => F::compressed(COMPRESSED_RGBA8_ETC2_EAC),
            TextureFormat::PvrtcRgb4 => F::compressed(COMPRESSED_RGB_PVRTC_4BPPV1_IMG),
            TextureFormat::PvrtcRgba4 => F::compressed(COMPRESSED_RGBA_PVRTC_4BPPV1_IMG),
            TextureFormat::Astc4x4 => F::compressed(COMPRESSED_RGBA_ASTC_4X4_KHR),
        }
    }
}

/// Component count, component type and normalization of a vertex attribute.
impl IntoGl<(i32, u32, bool)> for VertexFormat {
    fn into_gl(self) -> (i32, u32, bool) {
        let ty = match self {
            VertexFormat::Float32
            | VertexFormat::Float32x2
            | VertexFormat::Float32x3
            | VertexFormat::Float32x4 => glow::FLOAT,
            VertexFormat::Unorm8x4 => glow::UNSIGNED_BYTE,
            VertexFormat::Uint16x2 => glow::UNSIGNED_SHORT,
        };
        (self.components() as i32, ty, self.is_normalized())
    }
}

impl IntoGl<u32> for IndexFormat {
    fn into_gl(self) -> u32 {
        match self {
            IndexFormat::Uint16 => glow::UNSIGNED_SHORT,
            IndexFormat::Uint32 => glow::UNSIGNED_INT,
        }
    }
}

impl IntoGl<u32> for PrimitiveMode {
    fn into_gl(self) -> u32 {
        match self {
            PrimitiveMode::PointList => glow::POINTS,
            PrimitiveMode::LineList => glow::LINES,
            PrimitiveMode::LineStrip => glow::LINE_STRIP,
            PrimitiveMode::TriangleList => glow::TRIANGLES,
            PrimitiveMode::TriangleStrip => glow::TRIANGLE_STRIP,
            PrimitiveMode::TriangleFan => glow::TRIANGLE_FAN,
        }
    }
}

impl IntoGl<u32> for CompareFunction {
    fn into_gl(self) -> u32 {
        match self {
            CompareFunction::Never => glow::NEVER,
            CompareFunction::Less => glow::LESS,
            CompareFunction::Equal => glow::EQUAL,
            CompareFunction::LessEqual => glow::LEQUAL,
            CompareFunction::Greater => glow::GREATER,
            CompareFunction::NotEqual => glow::NOTEQUAL,
            CompareFunction::GreaterEqual => glow::GEQUAL,
            CompareFunction::Always => glow::ALWAYS,
        }
    }
}

impl IntoGl<u32> for BlendFactor {
    fn into_gl(self) -> u32 {
        match self {
            BlendFactor::Zero => glow::ZERO,
            BlendFactor::One => glow::ONE,
            BlendFactor::SrcAlpha => glow::SRC_ALPHA,
            BlendFactor::OneMinusSrcAlpha => glow::ONE_MINUS_SRC_ALPHA,
            BlendFactor::DstAlpha => glow::DST_ALPHA,
            BlendFactor::OneMinusDstAlpha => glow::ONE_MINUS_DST_ALPHA,
        }
    }
}

/// `None` means culling is disabled.
impl IntoGl<Option<u32>> for CullMode {
    fn into_gl(self) -> Option<u32> {
        match self {
            CullMode::None => None,
            CullMode::Front => Some(glow::FRONT),
            CullMode::Back => Some(glow::BACK),
        }
    }
}

impl IntoGl<u32> for TextureDimension {
    fn into_gl(self) -> u32 {
        match self {
            TextureDimension::D2 => glow::TEXTURE_2D,
            TextureDimension::Cube => glow::TEXTURE_CUBE_MAP,
        }
    }
}

impl IntoGl<u32> for BufferTarget {
    fn into_gl(self) -> u32 {
        match self {
            BufferTarget::Array => glow::ARRAY_BUFFER,
            BufferTarget::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
        }
    }
}

impl IntoGl<u32> for MemoryUsage {
    fn into_gl(self) -> u32 {
        match self {
            MemoryUsage::Device => glow::STATIC_DRAW,
            MemoryUsage::Host => glow::DYNAMIC_DRAW,
        }
    }
}

impl IntoGl<u32> for FilterMode {
    fn into_gl(self) -> u32 {
        match self {
            FilterMode::Nearest => glow::NEAREST,
            FilterMode::Linear => glow::LINEAR,
        }
    }
}

/// The image target of one level of a texture: the texture target for 2D,
/// the face target for cube maps.
pub fn image_target(dimension: TextureDimension, face: u32) -> u32 {
    match dimension {
        TextureDimension::D2 => glow::TEXTURE_2D,
        TextureDimension::Cube => glow::TEXTURE_CUBE_MAP_POSITIVE_X + face,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compressed_formats_only_carry_internal_format() {
        let etc1: GlTextureFormat = TextureFormat::Etc1Rgb8.into_gl();
        assert_eq!(etc1.internal_format, 0x8D64);
        assert_eq!(etc1.format, 0);

        let rgba: GlTextureFormat = TextureFormat::Rgba8Unorm.into_gl();
        assert_eq!(rgba.internal_format, rgba.format);
        assert_eq!(rgba.ty, glow::UNSIGNED_BYTE);
    }

    #[test]
    fn test_vertex_format_components() {
        let (size, ty, normalized): (i32, u32, bool) = VertexFormat::Unorm8x4.into_gl();
        assert_eq!((size, ty, normalized), (4, glow::UNSIGNED_BYTE, true));
        let (size, ty, _): (i32, u32, bool) = VertexFormat::Float32x3.into_gl();
        assert_eq!((size, ty), (3, glow::FLOAT));
    }

    #[test]
    fn test_cube_faces_are_consecutive() {
        assert_eq!(image_target(TextureDimension::D2, 0), glow::TEXTURE_2D);
        assert_eq!(
            image_target(TextureDimension::Cube, 5),
            glow::TEXTURE_CUBE_MAP_NEGATIVE_Z
        );
        assert_eq!(IntoGl::<Option<u32>>::into_gl(CullMode::None), None);
    }
}
