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

use common::{ready_device, record_draws, triangle_scene};
use vitrail_core::renderer::api::*;
use vitrail_core::renderer::traits::{CommandBuffer, CommandBufferState, Queue};
use vitrail_core::renderer::{GraphicsDevice, RenderError, ResourceError};

#[test]
fn test_frame_stats_accumulate_across_presents() {
    // --- 1. ARRANGE ---
    let (driver, mut device) = ready_device();
    let mut scene = triangle_scene(&device);

    // --- 2. ACT ---
    // Frame 1: two single-triangle draws.
    let mut first = record_draws(&device, &scene, 2);
    device.submit(&mut [&mut first]).expect("submit frame 1");
    assert_eq!(device.queue().map(|q| q.draw_calls()), Some(2));
    assert_eq!(device.queue().map(|q| q.triangles()), Some(2));
    device.present().expect("present frame 1");
    assert_eq!(device.queue().map(|q| q.draw_calls()), Some(0));

    // Frame 2: one instanced draw of three instances.
    scene.input.set_instance_count(3);
    let mut second = record_draws(&device, &scene, 1);
    device.submit(&mut [&mut second]).expect("submit frame 2");
    device.present().expect("present frame 2");

    // --- 3. ASSERT ---
    let stats = device.frame_stats();
    assert_eq!(stats.frames, 2);
    assert_eq!(stats.draw_calls, 3);
    assert_eq!(stats.triangles, 2 + 3);
    assert_eq!(device.queue().map(|q| q.triangles()), Some(0));
    assert_eq!(driver.executed_draws(), 3);
    assert_eq!(driver.swap_count(), 2);
}

#[test]
fn test_submission_resets_buffers_and_recycles_packages() {
    let (_driver, mut device) = ready_device();
    let scene = triangle_scene(&device);

    let mut commands = record_draws(&device, &scene, 1);
    assert_eq!(commands.state(), CommandBufferState::Executable);
    device.submit(&mut [&mut commands]).expect("submit");
    assert_eq!(commands.state(), CommandBufferState::Initial);
    assert_eq!(commands.command_count(), 0);

    let allocator = device.command_allocator().expect("allocator");
    assert_eq!(allocator.retired_packages(), 1);
    device.present().expect("present");
    let allocator = device.command_allocator().expect("allocator");
    assert_eq!(allocator.retired_packages(), 0);
    assert!(allocator.free_packages() >= 1);
}

#[test]
fn test_submit_rejects_unfinished_buffers() {
    // --- 1. ARRANGE ---
    let (driver, mut device) = ready_device();
    let scene = triangle_scene(&device);
    let mut finished = record_draws(&device, &scene, 1);
    let mut recording = device
        .create_command_buffer(&CommandBufferDescriptor::default())
        .expect("command buffer");
    recording.begin().expect("begin");

    // --- 2. ACT ---
    let result = device.submit(&mut [&mut finished, &mut recording]);

    // --- 3. ASSERT ---
    assert!(matches!(
        result,
        Err(RenderError::ResourceError(ResourceError::InvalidState { .. }))
    ));
    assert_eq!(driver.executed_draws(), 0, "a rejected submission runs nothing");
    assert_eq!(finished.state(), CommandBufferState::Executable);
}

#[test]
fn test_secondary_buffers_are_inlined() {
    let (driver, mut device) = ready_device();
    let scene = triangle_scene(&device);

    let mut secondary = device
        .create_command_buffer(&CommandBufferDescriptor {
            kind: CommandBufferKind::Secondary,
            ..Default::default()
        })
        .expect("secondary");
    secondary.begin().expect("begin");
    secondary.bind_pipeline_state(&scene.pipeline).expect("pipeline");
    secondary.bind_input_assembler(&scene.input).expect("input");
    secondary.end().expect("end");

    let mut primary = record_draws(&device, &scene, 0);
    primary.begin().expect("re-begin");
    primary
        .begin_render_pass(
            &scene.framebuffer,
            &scene.render_pass,
            vitrail_core::math::Rect::from_size(64, 64),
            &ClearValues::default(),
        )
        .expect("render pass");
    primary.execute(&[&secondary]).expect("execute secondary");
    primary.end_render_pass().expect("end pass");
    primary.end().expect("end");

    device.submit(&mut [&mut primary]).expect("submit");
    assert_eq!(driver.executed_draws(), 0);
    assert!(driver.state_changes() > 0);
    assert_eq!(
        driver.last_viewport(),
        Some(vitrail_core::math::Rect::from_size(64, 64))
    );
}

#[test]
fn test_draw_validation() {
    let (_driver, device) = ready_device();
    let scene = triangle_scene(&device);
    let mut commands = device
        .create_command_buffer(&CommandBufferDescriptor::default())
        .expect("command buffer");

    // Recording outside begin/end.
    assert!(commands.draw(&scene.input).is_err());

    commands.begin().expect("begin");
    // Outside a render pass.
    assert!(commands.draw(&scene.input).is_err());
    commands
        .begin_render_pass(
            &scene.framebuffer,
            &scene.render_pass,
            vitrail_core::math::Rect::from_size(8, 8),
            &ClearValues::default(),
        )
        .expect("render pass");
    // Without a pipeline.
    assert!(commands.draw(&scene.input).is_err());
    commands.bind_pipeline_state(&scene.pipeline).expect("pipeline");
    // Without an input assembler.
    assert!(commands.draw(&scene.input).is_err());
    // Ending inside a pass.
    assert!(commands.end().is_err());
    assert_eq!(commands.draw_calls(), 0);
}

#[test]
fn test_instanced_draw_needs_driver_support() {
    let (_driver, mut device) = common::headless_device("");
    device.initialize(&DeviceInfo::default()).expect("init");
    let mut scene = triangle_scene(&device);
    scene.input.set_instance_count(2);

    let mut commands = device
        .create_command_buffer(&CommandBufferDescriptor::default())
        .expect("command buffer");
    commands.begin().expect("begin");
    commands
        .begin_render_pass(
            &scene.framebuffer,
            &scene.render_pass,
            vitrail_core::math::Rect::from_size(8, 8),
            &ClearValues::default(),
        )
        .expect("render pass");
    commands.bind_pipeline_state(&scene.pipeline).expect("pipeline");
    commands.bind_input_assembler(&scene.input).expect("input");

    let result = commands.draw(&scene.input);
    assert!(matches!(result, Err(ResourceError::InvalidState { .. })));
}
