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

use common::{headless_device, ready_device};
use vitrail_core::math::Extent2D;
use vitrail_core::renderer::api::*;
use vitrail_core::renderer::traits::{Queue, Window};
use vitrail_core::renderer::{GraphicsDevice, RenderError, ResourceError};
use vitrail_infra::graphics::gles::{GlObjectKind, DEFAULT_EXTENSIONS};

#[test]
fn test_initialize_builds_every_subsystem() {
    // --- 1. ARRANGE ---
    let (driver, mut device) = headless_device(DEFAULT_EXTENSIONS);
    let settings = DeviceSettings {
        width: 800,
        height: 600,
        native_width: 1600,
        native_height: 1200,
        ..Default::default()
    };

    // --- 2. ACT ---
    device
        .initialize(&DeviceInfo::new(settings))
        .expect("initialization should succeed");

    // --- 3. ASSERT ---
    assert_eq!(device.state(), DeviceState::Ready);
    assert_eq!(device.api(), GraphicsApi::Gles2);
    assert!(device.context().is_some());
    assert!(device.window().is_some());
    assert!(device.queue().is_some());
    assert!(device.command_allocator().is_some());
    assert!(driver.context_active());

    assert_eq!((device.width(), device.height()), (800, 600));
    assert_eq!((device.native_width(), device.native_height()), (1600, 1200));
    assert_eq!(device.window().map(|w| w.size()), Some(Extent2D::new(800, 600)));
    assert_eq!(device.identity().renderer, "Vitrail Headless");
    assert_eq!(device.frame_stats(), FrameStats::default());
}

#[test]
fn test_second_initialize_is_rejected() {
    let (_driver, mut device) = ready_device();
    let result = device.initialize(&DeviceInfo::default());
    assert!(matches!(result, Err(RenderError::AlreadyInitialized)));
    assert_eq!(device.state(), DeviceState::Ready);
}

#[test]
fn test_failed_context_leaves_nothing_alive() {
    // --- 1. ARRANGE ---
    let (driver, mut device) = headless_device(DEFAULT_EXTENSIONS);
    driver.fail_context_creation(true);

    // --- 2. ACT ---
    let result = device.initialize(&DeviceInfo::default());

    // --- 3. ASSERT ---
    match result {
        Err(RenderError::InitializationFailed { step, reason }) => {
            assert_eq!(step, ResourceKind::Context);
            assert!(reason.contains("EGL"), "reason should carry the driver error: {reason}");
        }
        other => panic!("expected an initialization failure, got {other:?}"),
    }
    assert_eq!(device.state(), DeviceState::Failed);
    assert!(device.context().is_none());
    assert!(device.window().is_none());
    assert!(device.queue().is_none());
    assert_eq!(driver.live_objects(), 0);
    assert!(!driver.context_active());

    // Destroy is a no-op on a failed device, and a retry succeeds.
    device.destroy();
    driver.fail_context_creation(false);
    device
        .initialize(&DeviceInfo::default())
        .expect("retry should succeed");
    assert_eq!(device.state(), DeviceState::Ready);
}

#[test]
fn test_failed_offscreen_window_rolls_back_the_context() {
    // --- 1. ARRANGE ---
    let (driver, mut device) = headless_device(DEFAULT_EXTENSIONS);
    driver.fail_object(Some(GlObjectKind::Framebuffer));
    let settings = DeviceSettings {
        offscreen: true,
        ..Default::default()
    };

    // --- 2. ACT ---
    let result = device.initialize(&DeviceInfo::new(settings));

    // --- 3. ASSERT ---
    assert!(matches!(
        result,
        Err(RenderError::InitializationFailed {
            step: ResourceKind::Window,
            ..
        })
    ));
    assert!(device.context().is_none(), "the context must be torn down too");
    assert!(!driver.context_active());
    assert_eq!(
        driver.live_objects(),
        0,
        "textures created before the failure must be released"
    );
}

#[test]
fn test_destroy_and_reinitialize_round_trip() {
    // --- 1. ARRANGE ---
    let (driver, mut device) = ready_device();
    let features = *device.features();
    let toggles = device.toggles();
    let label = device.compressed_formats().to_owned();

    // --- 2. ACT ---
    device.destroy();
    device.destroy();
    assert_eq!(device.state(), DeviceState::Uninitialized);
    assert!(!driver.context_active());
    device
        .initialize(&DeviceInfo::default())
        .expect("re-initialization should succeed");

    // --- 3. ASSERT ---
    assert_eq!(*device.features(), features);
    assert_eq!(device.toggles(), toggles);
    assert_eq!(device.compressed_formats(), label);
    assert_eq!(device.queue().map(|q| q.draw_calls()), Some(0));
    assert_eq!(device.frame_stats(), FrameStats::default());
    assert!(device.context().is_some() && device.window().is_some());
}

#[test]
fn test_operations_require_an_initialized_device() {
    let (driver, mut device) = headless_device(DEFAULT_EXTENSIONS);

    assert!(matches!(device.present(), Err(RenderError::NotInitialized)));
    assert!(matches!(device.resize(10, 10), Err(RenderError::NotInitialized)));
    assert!(matches!(device.submit(&mut []), Err(RenderError::NotInitialized)));
    assert!(matches!(
        device.create_buffer(&BufferDescriptor::new(BufferUsage::VERTEX, 16, 4)),
        Err(ResourceError::DeviceNotReady)
    ));
    assert!(matches!(
        device.create_sampler(&SamplerDescriptor::default()),
        Err(ResourceError::DeviceNotReady)
    ));
    assert_eq!(driver.swap_count(), 0);
}

#[test]
fn test_resize_forwards_exact_size() {
    let (_driver, mut device) = ready_device();

    device.resize(640, 480).expect("resize");
    assert_eq!((device.width(), device.height()), (640, 480));
    assert_eq!(device.window().map(|w| w.size()), Some(Extent2D::new(640, 480)));

    device.resize(0, 0).expect("zero-sized resize is stored as-is");
    assert_eq!((device.width(), device.height()), (0, 0));
    assert_eq!(device.window().map(|w| w.size()), Some(Extent2D::new(0, 0)));
}

#[test]
fn test_resize_reallocates_offscreen_targets() {
    // --- 1. ARRANGE ---
    let (driver, mut device) = headless_device(DEFAULT_EXTENSIONS);
    let settings = DeviceSettings {
        width: 320,
        height: 240,
        offscreen: true,
        ..Default::default()
    };
    device
        .initialize(&DeviceInfo::new(settings))
        .expect("offscreen initialization");
    let color = device.window().map(|w| w.color_texture()).expect("window");
    assert_eq!(driver.texture_extent(color), Some((320, 240)));

    // --- 2. ACT ---
    device.resize(1024, 768).expect("resize");

    // --- 3. ASSERT ---
    assert_eq!(driver.texture_extent(color), Some((1024, 768)));
    assert!(device.window().is_some_and(|w| w.is_offscreen()));
}

#[test]
fn test_failed_resize_keeps_the_previous_size() {
    // --- 1. ARRANGE ---
    let (driver, mut device) = headless_device(DEFAULT_EXTENSIONS);
    let settings = DeviceSettings {
        width: 320,
        height: 240,
        offscreen: true,
        ..Default::default()
    };
    device
        .initialize(&DeviceInfo::new(settings))
        .expect("offscreen initialization");
    driver.fail_texture_storage(true);

    // --- 2. ACT ---
    let result = device.resize(1024, 768);

    // --- 3. ASSERT ---
    assert!(result.is_err());
    assert_eq!((device.width(), device.height()), (320, 240));
    assert_eq!(device.window().map(|w| w.size()), Some(Extent2D::new(320, 240)));

    driver.fail_texture_storage(false);
    device.resize(1024, 768).expect("resize after recovery");
    assert_eq!((device.width(), device.height()), (1024, 768));
}

#[test]
fn test_capabilities_follow_the_extension_blob() {
    let (_driver, mut bare) = headless_device("");
    bare.initialize(&DeviceInfo::default()).expect("bare init");
    assert!(!bare.has_feature(Feature::FormatEtc1));
    assert!(bare.has_feature(Feature::FormatEtc2));
    assert_eq!(bare.compressed_formats(), "etc2");
    assert!(!bare.toggles().use_vao);

    let (_driver, mut mobile) = headless_device(DEFAULT_EXTENSIONS);
    mobile.initialize(&DeviceInfo::default()).expect("mobile init");
    assert!(mobile.has_feature(Feature::FormatEtc1));
    assert!(mobile.has_extension("GL_OES_depth_texture"));
    assert_eq!(mobile.compressed_formats(), "etc1 etc2");
    assert!(mobile.toggles().use_vao);
    assert!(mobile.toggles().use_instanced_arrays);
}
