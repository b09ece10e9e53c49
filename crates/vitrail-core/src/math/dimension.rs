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

//! Provides structs for representing extents (sizes), origins (offsets) and
//! rectangular regions.
//!
//! These types describe the dimensions of textures, windows and the regions within
//! them. They use integer components, suitable for pixel-based coordinates.

/// A two-dimensional extent, typically representing width and height.
///
/// This is commonly used for window and surface sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent2D {
    /// The width component of the extent.
    pub width: u32,
    /// The height component of the extent.
    pub height: u32,
}

impl Extent2D {
    /// Creates a new two-dimensional extent.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A three-dimensional extent, representing width, height, and depth.
///
/// This is used for 2D textures (depth 1), cubemaps and texture arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent3D {
    /// The width component of the extent.
    pub width: u32,
    /// The height component of the extent.
    pub height: u32,
    /// The depth or number of array layers.
    pub depth_or_array_layers: u32,
}

impl Extent3D {
    /// Creates a new three-dimensional extent.
    pub const fn new(width: u32, height: u32, depth_or_array_layers: u32) -> Self {
        Self {
            width,
            height,
            depth_or_array_layers,
        }
    }

    /// Returns the extent of the given mip level. Each axis is halved per level
    /// and never drops below one texel.
    pub fn mip_level_size(&self, level: u32) -> Extent2D {
        Extent2D {
            width: (self.width >> level).max(1),
            height: (self.height >> level).max(1),
        }
    }

    /// Returns `true` if any axis is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.depth_or_array_layers == 0
    }
}

/// A three-dimensional origin, representing an offset into a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Origin3D {
    /// The x-coordinate of the origin.
    pub x: u32,
    /// The y-coordinate of the origin.
    pub y: u32,
    /// The z-coordinate or array layer of the origin.
    pub z: u32,
}

/// An axis-aligned pixel rectangle, used for render areas and viewports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge, in pixels.
    pub x: i32,
    /// Bottom edge, in pixels.
    pub y: i32,
    /// Width, in pixels.
    pub width: u32,
    /// Height, in pixels.
    pub height: u32,
}

impl Rect {
    /// Creates a rectangle anchored at the origin.
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mip_level_size_clamps_to_one() {
        let extent = Extent3D::new(256, 64, 1);
        assert_eq!(extent.mip_level_size(0), Extent2D::new(256, 64));
        assert_eq!(extent.mip_level_size(3), Extent2D::new(32, 8));
        assert_eq!(extent.mip_level_size(8), Extent2D::new(1, 1));
    }

    #[test]
    fn test_empty_extent() {
        assert!(Extent3D::new(0, 4, 1).is_empty());
        assert!(!Extent3D::new(4, 4, 1).is_empty());
    }
}
