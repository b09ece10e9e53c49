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

mod common;

use common::ready_device;
use vitrail_core::math::{Extent3D, Origin3D};
use vitrail_core::renderer::api::*;
use vitrail_core::renderer::traits::Buffer;
use vitrail_core::renderer::{GraphicsDevice, ResourceError};

fn staging(device: &vitrail_infra::GlesDevice, size: u64) -> vitrail_infra::graphics::gles::GlesBuffer {
    let mut buffer = device
        .create_buffer(&BufferDescriptor::new(BufferUsage::TRANSFER_SRC, size, 4))
        .expect("staging buffer");
    let bytes: Vec<u8> = (0..size).map(|i| i as u8).collect();
    buffer.update(&bytes, 0).expect("fill staging buffer");
    buffer
}

fn whole(width: u32, height: u32) -> BufferTextureCopy {
    BufferTextureCopy {
        texture_extent: Extent3D::new(width, height, 1),
        layer_count: 1,
        ..Default::default()
    }
}

#[test]
fn test_copy_uploads_each_region() {
    // --- 1. ARRANGE ---
    let (driver, mut device) = ready_device();
    let source = staging(&device, 4 * 4 * 4);
    let texture = device
        .create_texture(&TextureDescriptor::d2(TextureFormat::Rgba8Unorm, 4, 4))
        .expect("texture");
    let top_left = BufferTextureCopy {
        buffer_row_length: 4,
        texture_extent: Extent3D::new(2, 2, 1),
        layer_count: 1,
        ..Default::default()
    };

    // --- 2. ACT ---
    device
        .copy_buffers_to_texture(&source, &texture, &[whole(4, 4), top_left])
        .expect("copy");

    // --- 3. ASSERT ---
    assert_eq!(driver.uploads(), 2);
}

#[test]
fn test_copy_into_cube_faces() {
    let (driver, mut device) = ready_device();
    let mut descriptor = TextureDescriptor::d2(TextureFormat::Rgba8Unorm, 2, 2);
    descriptor.dimension = TextureDimension::Cube;
    descriptor.size = Extent3D::new(2, 2, 6);
    let cube = device.create_texture(&descriptor).expect("cube");
    let source = staging(&device, 2 * 2 * 4 * 6);

    let faces = BufferTextureCopy {
        layer_count: 6,
        ..whole(2, 2)
    };
    device
        .copy_buffers_to_texture(&source, &cube, &[faces])
        .expect("copy all faces");
    assert_eq!(driver.uploads(), 6);
}

#[test]
fn test_copy_bounds_are_checked() {
    let (driver, mut device) = ready_device();
    let source = staging(&device, 64);
    let texture = device
        .create_texture(&TextureDescriptor::d2(TextureFormat::Rgba8Unorm, 4, 4))
        .expect("texture");

    // Region larger than the texture.
    let oversized = whole(8, 8);
    assert!(matches!(
        device.copy_buffers_to_texture(&source, &texture, &[oversized]),
        Err(ResourceError::OutOfBounds)
    ));

    // Region past the end of the source buffer.
    let offset = BufferTextureCopy {
        buffer_offset: 16,
        ..whole(4, 4)
    };
    assert!(matches!(
        device.copy_buffers_to_texture(&source, &texture, &[offset]),
        Err(ResourceError::OutOfBounds)
    ));

    // Mip level that does not exist.
    let mip = BufferTextureCopy {
        mip_level: 1,
        ..whole(1, 1)
    };
    assert!(matches!(
        device.copy_buffers_to_texture(&source, &texture, &[mip]),
        Err(ResourceError::OutOfBounds)
    ));

    // Offset region past the edge.
    let shifted = BufferTextureCopy {
        texture_offset: Origin3D { x: 3, y: 0, z: 0 },
        ..whole(2, 2)
    };
    assert!(device
        .copy_buffers_to_texture(&source, &texture, &[shifted])
        .is_err());
    assert_eq!(driver.uploads(), 0);
}

#[test]
fn test_copy_source_must_be_a_staging_buffer() {
    let (_driver, mut device) = ready_device();
    let vertices = device
        .create_buffer(&BufferDescriptor::new(BufferUsage::VERTEX, 64, 16))
        .expect("vertex buffer");
    let texture = device
        .create_texture(&TextureDescriptor::d2(TextureFormat::Rgba8Unorm, 4, 4))
        .expect("texture");

    assert!(matches!(
        device.copy_buffers_to_texture(&vertices, &texture, &[whole(4, 4)]),
        Err(ResourceError::InvalidDescriptor { .. })
    ));
}

#[test]
fn test_copy_requires_a_ready_device() {
    let (_driver, mut device) = ready_device();
    let source = staging(&device, 64);
    let texture = device
        .create_texture(&TextureDescriptor::d2(TextureFormat::Rgba8Unorm, 4, 4))
        .expect("texture");

    device.destroy();
    assert!(matches!(
        device.copy_buffers_to_texture(&source, &texture, &[whole(4, 4)]),
        Err(ResourceError::DeviceNotReady)
    ));
}

#[test]
fn test_copy_rejects_offsets_that_overflow() {
    // --- 1. ARRANGE ---
    let (driver, mut device) = ready_device();
    let source = staging(&device, 64);
    let texture = device
        .create_texture(&TextureDescriptor::d2(TextureFormat::Rgba8Unorm, 4, 4))
        .expect("texture");
    let far_column = BufferTextureCopy {
        texture_offset: Origin3D {
            x: u32::MAX,
            y: 0,
            z: 0,
        },
        ..whole(1, 1)
    };
    let far_layer = BufferTextureCopy {
        base_array_layer: u32::MAX,
        ..whole(1, 1)
    };

    // --- 2. ACT & 3. ASSERT ---
    assert!(matches!(
        device.copy_buffers_to_texture(&source, &texture, &[far_column]),
        Err(ResourceError::OutOfBounds)
    ));
    assert!(matches!(
        device.copy_buffers_to_texture(&source, &texture, &[far_layer]),
        Err(ResourceError::OutOfBounds)
    ));
    assert_eq!(driver.uploads(), 0);
}

#[test]
fn test_rejected_copy_uploads_nothing() {
    // --- 1. ARRANGE ---
    let (driver, mut device) = ready_device();
    let source = staging(&device, 64);
    let texture = device
        .create_texture(&TextureDescriptor::d2(TextureFormat::Rgba8Unorm, 4, 4))
        .expect("texture");

    // --- 2. ACT ---
    let result = device.copy_buffers_to_texture(&source, &texture, &[whole(4, 4), whole(8, 8)]);

    // --- 3. ASSERT ---
    assert!(matches!(result, Err(ResourceError::OutOfBounds)));
    assert_eq!(driver.uploads(), 0, "the valid first region must not be written");
}
