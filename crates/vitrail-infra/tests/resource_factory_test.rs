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

use common::{
    color_pass, headless_device, ready_device, record_draws, triangle_scene, FRAGMENT_SOURCE,
    VERTEX_SOURCE,
};
use vitrail_core::math::Extent3D;
use vitrail_core::renderer::api::*;
use vitrail_core::renderer::traits::{
    Buffer, Framebuffer, GpuResource, Queue, Texture, TextureView,
};
use vitrail_core::renderer::{GraphicsDevice, ResourceError, ShaderError};
use vitrail_infra::graphics::gles::GlObjectKind;

#[test]
fn test_failed_link_releases_the_program() {
    // --- 1. ARRANGE ---
    let (driver, device) = ready_device();
    driver.fail_program_link(true);

    // --- 2. ACT ---
    let result = device.create_shader(&ShaderDescriptor::new("broken", VERTEX_SOURCE, FRAGMENT_SOURCE));

    // --- 3. ASSERT ---
    match result {
        Err(ResourceError::Shader(ShaderError::CompilationFailed { name, details })) => {
            assert_eq!(name, "broken");
            assert!(!details.is_empty());
        }
        other => panic!("expected a compilation failure, got {other:?}"),
    }
    assert_eq!(driver.live_objects_of(GlObjectKind::Program), 0);
}

#[test]
fn test_shader_needs_both_stages() {
    let (driver, device) = ready_device();
    let mut descriptor = ShaderDescriptor::new("vertex-only", VERTEX_SOURCE, FRAGMENT_SOURCE);
    descriptor.stages.retain(|s| s.stage == ShaderStage::Vertex);

    let result = device.create_shader(&descriptor);
    assert!(matches!(
        result,
        Err(ResourceError::Shader(ShaderError::MissingStage {
            stage: ShaderStage::Fragment,
            ..
        }))
    ));
    assert_eq!(driver.live_objects_of(GlObjectKind::Program), 0);
}

#[test]
fn test_failed_texture_creation_leaves_no_objects() {
    let (driver, device) = ready_device();
    let before = driver.live_objects();
    driver.fail_object(Some(GlObjectKind::Texture));

    let result = device.create_texture(&TextureDescriptor::d2(TextureFormat::Rgba8Unorm, 4, 4));
    assert!(matches!(result, Err(ResourceError::Backend(_))));
    assert_eq!(driver.live_objects(), before);
}

#[test]
fn test_dropping_resources_releases_native_objects() {
    let (driver, device) = ready_device();
    let before = driver.live_objects();
    {
        let _vertices = device
            .create_buffer(&BufferDescriptor::new(BufferUsage::VERTEX, 64, 16))
            .expect("buffer");
        let _texture = device
            .create_texture(&TextureDescriptor::d2(TextureFormat::Rgb565Unorm, 16, 16))
            .expect("texture");
        let _shader = device
            .create_shader(&ShaderDescriptor::new("s", VERTEX_SOURCE, FRAGMENT_SOURCE))
            .expect("shader");
        assert_eq!(driver.live_objects(), before + 3);
    }
    assert_eq!(driver.live_objects(), before);
}

#[test]
fn test_resource_round_trip_leaves_device_untouched() {
    // --- 1. ARRANGE ---
    let (_driver, mut device) = ready_device();
    let warmup = triangle_scene(&device);
    let mut frame = record_draws(&device, &warmup, 2);
    device.present().expect("present");
    device.submit(&mut [&mut frame]).expect("submit");

    let features = *device.features();
    let toggles = device.toggles();
    let extensions = device.extensions().clone();
    let stats = device.frame_stats();
    let queue_counters = device.queue().map(|q| (q.draw_calls(), q.triangles()));
    let context = device.context().map(|c| c as *const _);
    let window = device.window().map(|w| w as *const _);
    let queue = device.queue().map(|q| q as *const _);
    let allocator = device.command_allocator().map(|a| a as *const _);
    assert_eq!(queue_counters, Some((2, 2)));

    // --- 2. ACT ---
    {
        let scene = triangle_scene(&device);
        let texture = device
            .create_texture(&TextureDescriptor::d2(TextureFormat::Rgba8Unorm, 4, 4))
            .expect("texture");
        let _view = device
            .create_texture_view(&TextureViewDescriptor::of(&texture))
            .expect("view");
        let _sampler = device
            .create_sampler(&SamplerDescriptor::default())
            .expect("sampler");
        let _commands = record_draws(&device, &scene, 1);
    }

    // --- 3. ASSERT ---
    assert!(*device.features() == features);
    assert_eq!(device.toggles(), toggles);
    assert_eq!(device.extensions(), &extensions);
    assert_eq!(device.frame_stats(), stats);
    assert_eq!(
        device.queue().map(|q| (q.draw_calls(), q.triangles())),
        queue_counters
    );
    assert_eq!(device.context().map(|c| c as *const _), context);
    assert_eq!(device.window().map(|w| w as *const _), window);
    assert_eq!(device.queue().map(|q| q as *const _), queue);
    assert_eq!(device.command_allocator().map(|a| a as *const _), allocator);
}

#[test]
fn test_oversized_ranges_are_rejected() {
    let (_driver, device) = ready_device();
    let texture = device
        .create_texture(&TextureDescriptor::d2(TextureFormat::Rgba8Unorm, 4, 4))
        .expect("texture");
    let every_level = TextureViewDescriptor {
        base_mip_level: 0,
        mip_level_count: Some(u32::MAX),
        ..TextureViewDescriptor::of(&texture)
    };
    assert!(matches!(
        device.create_texture_view(&every_level),
        Err(ResourceError::InvalidDescriptor { .. })
    ));

    let vertices = device
        .create_buffer(&BufferDescriptor::new(BufferUsage::VERTEX, 64, 16))
        .expect("buffer");
    let mut far = VertexAttribute::new("a_position", VertexFormat::Float32x3);
    far.offset = Some(u32::MAX - 4);
    let result = device.create_input_assembler(&InputAssemblerDescriptor {
        attributes: vec![far],
        vertex_buffers: vec![&vertices as &dyn Buffer],
        index_buffer: None,
    });
    assert!(matches!(result, Err(ResourceError::InvalidDescriptor { .. })));
}

#[test]
fn test_compressed_textures_follow_negotiated_features() {
    let (_driver, mut bare) = headless_device("");
    bare.initialize(&DeviceInfo::default()).expect("init");
    let etc1 = TextureDescriptor::d2(TextureFormat::Etc1Rgb8, 8, 8);
    assert!(matches!(
        bare.create_texture(&etc1),
        Err(ResourceError::UnsupportedFormat {
            feature: Feature::FormatEtc1,
            ..
        })
    ));
    // ETC2 is always reported.
    assert!(bare
        .create_texture(&TextureDescriptor::d2(TextureFormat::Etc2Rgb8, 8, 8))
        .is_ok());

    let (_driver, mobile) = ready_device();
    assert!(mobile.create_texture(&etc1).is_ok());
}

#[test]
fn test_texture_descriptor_validation() {
    let (_driver, device) = ready_device();

    let mut too_many_levels = TextureDescriptor::d2(TextureFormat::Rgba8Unorm, 4, 4);
    too_many_levels.mip_level_count = 4;
    assert!(device.create_texture(&too_many_levels).is_err());

    let mut cube = TextureDescriptor::d2(TextureFormat::Rgba8Unorm, 8, 8);
    cube.dimension = TextureDimension::Cube;
    assert!(device.create_texture(&cube).is_err(), "cube maps need six layers");
    cube.size = Extent3D::new(8, 8, 6);
    let cube = device.create_texture(&cube).expect("cube map");
    assert_eq!(cube.dimension(), TextureDimension::Cube);

    assert!(device
        .create_texture(&TextureDescriptor::d2(TextureFormat::Rgba8Unorm, 0, 4))
        .is_err());
}

#[test]
fn test_host_backed_buffers() {
    let (_driver, device) = ready_device();
    let mut uniforms = device
        .create_buffer(&BufferDescriptor::new(BufferUsage::UNIFORM, 16, 16))
        .expect("uniform buffer");

    assert!(uniforms.native_handle().is_none(), "GLES 2 has no uniform buffers");
    uniforms.write(&[1.0f32, 2.0, 3.0, 4.0], 0).expect("write");
    let host = uniforms.host_data().expect("host copy");
    assert_eq!(&host[4..8], &2.0f32.to_ne_bytes());
    assert!(matches!(
        uniforms.update(&[0u8; 8], 12),
        Err(ResourceError::OutOfBounds)
    ));
}

#[test]
fn test_index_buffer_stride_is_checked() {
    let (_driver, device) = ready_device();
    let bad = BufferDescriptor::new(BufferUsage::INDEX, 12, 3);
    assert!(matches!(
        device.create_buffer(&bad),
        Err(ResourceError::InvalidDescriptor { .. })
    ));
    let good = device
        .create_buffer(&BufferDescriptor::new(BufferUsage::INDEX, 12, 2))
        .expect("index buffer");
    assert_eq!(good.count(), 6);
}

#[test]
fn test_render_pass_limits() {
    let (_driver, device) = ready_device();
    let mut two_colors = color_pass();
    two_colors.color_attachments.push(two_colors.color_attachments[0]);
    assert!(device.create_render_pass(&two_colors).is_err());

    let mut float_target = color_pass();
    float_target.color_attachments[0].format = TextureFormat::Rgba32Float;
    assert!(matches!(
        device.create_render_pass(&float_target),
        Err(ResourceError::UnsupportedFormat {
            feature: Feature::ColorFloat,
            ..
        })
    ));
}

#[test]
fn test_offscreen_framebuffer() {
    // --- 1. ARRANGE ---
    let (driver, device) = ready_device();
    let render_pass = device.create_render_pass(&color_pass()).expect("pass");
    let mut descriptor = TextureDescriptor::d2(TextureFormat::Rgba8Unorm, 64, 32);
    descriptor.usage = TextureUsage::COLOR_ATTACHMENT | TextureUsage::SAMPLED;
    let target = device.create_texture(&descriptor).expect("target");
    let view = device
        .create_texture_view(&TextureViewDescriptor::of(&target))
        .expect("view");
    assert_eq!(view.texture_handle(), target.native_handle());

    // --- 2. ACT ---
    let framebuffer = device
        .create_framebuffer(&FramebufferDescriptor {
            render_pass: &render_pass,
            color_views: vec![&view as &dyn TextureView],
            depth_stencil_view: None,
        })
        .expect("framebuffer");

    // --- 3. ASSERT ---
    assert!(!framebuffer.native_handle().is_none());
    assert!(!framebuffer.is_window_target());
    assert_eq!(framebuffer.size().width, 64);
    assert_eq!(framebuffer.color_attachment_count(), 1);
    assert_eq!(driver.live_objects_of(GlObjectKind::Framebuffer), 1);

    drop(framebuffer);
    assert_eq!(driver.live_objects_of(GlObjectKind::Framebuffer), 0);
}

#[test]
fn test_framebuffer_rejects_mismatched_views() {
    let (_driver, device) = ready_device();
    let render_pass = device.create_render_pass(&color_pass()).expect("pass");
    let wrong = device
        .create_texture(&TextureDescriptor::d2(TextureFormat::Rgb565Unorm, 8, 8))
        .expect("texture");
    let view = device
        .create_texture_view(&TextureViewDescriptor::of(&wrong))
        .expect("view");

    let result = device.create_framebuffer(&FramebufferDescriptor {
        render_pass: &render_pass,
        color_views: vec![&view as &dyn TextureView],
        depth_stencil_view: None,
    });
    assert!(matches!(result, Err(ResourceError::InvalidDescriptor { .. })));
}

#[test]
fn test_compare_samplers_are_rejected() {
    let (_driver, device) = ready_device();
    let sampler = SamplerDescriptor {
        compare: Some(CompareFunction::LessEqual),
        ..Default::default()
    };
    assert!(device.create_sampler(&sampler).is_err());
    assert!(device.create_sampler(&SamplerDescriptor::default()).is_ok());
}
