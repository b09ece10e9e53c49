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

//! Scene helpers shared by the device integration tests.

#![allow(dead_code)]

use std::rc::Rc;

use vitrail_core::math::Rect;
use vitrail_core::renderer::api::*;
use vitrail_core::renderer::traits::{BindingLayout, Buffer, CommandBuffer};
use vitrail_core::renderer::GraphicsDevice;
use vitrail_infra::graphics::gles::*;

pub const VERTEX_SOURCE: &str = "attribute vec3 a_position;\n\
    void main() { gl_Position = vec4(a_position, 1.0); }";
pub const FRAGMENT_SOURCE: &str = "precision mediump float;\n\
    void main() { gl_FragColor = vec4(1.0); }";

/// Builds an uninitialized device over a fresh headless driver.
pub fn headless_device(extensions: &str) -> (Rc<HeadlessDriver>, GlesDevice) {
    let driver = Rc::new(HeadlessDriver::new(extensions));
    let device = GlesDevice::new(driver.clone());
    (driver, device)
}

/// Builds and initializes a device with default settings.
pub fn ready_device() -> (Rc<HeadlessDriver>, GlesDevice) {
    let (driver, mut device) = headless_device(DEFAULT_EXTENSIONS);
    device
        .initialize(&DeviceInfo::default())
        .expect("headless initialization should succeed");
    (driver, device)
}

/// Everything needed to draw a single triangle to the window.
pub struct TriangleScene {
    pub vertex_buffer: GlesBuffer,
    pub input: GlesInputAssembler,
    pub shader: GlesShader,
    pub render_pass: GlesRenderPass,
    pub framebuffer: GlesFramebuffer,
    pub binding_layout: GlesBindingLayout,
    pub pipeline_layout: GlesPipelineLayout,
    pub pipeline: GlesPipelineState,
}

pub fn color_pass() -> RenderPassDescriptor {
    RenderPassDescriptor {
        color_attachments: vec![ColorAttachment {
            format: TextureFormat::Rgba8Unorm,
            sample_count: SampleCount::X1,
            load_op: LoadOp::Clear,
            store_op: StoreOp::Store,
        }],
        depth_stencil_attachment: None,
    }
}

pub fn triangle_scene(device: &GlesDevice) -> TriangleScene {
    let mut vertex_buffer = device
        .create_buffer(&BufferDescriptor::new(BufferUsage::VERTEX, 36, 12))
        .expect("vertex buffer");
    let positions: [f32; 9] = [-1.0, -1.0, 0.0, 1.0, -1.0, 0.0, 0.0, 1.0, 0.0];
    vertex_buffer.write(&positions, 0).expect("vertex upload");

    let input = device
        .create_input_assembler(&InputAssemblerDescriptor {
            attributes: vec![VertexAttribute::new("a_position", VertexFormat::Float32x3)],
            vertex_buffers: vec![&vertex_buffer as &dyn Buffer],
            index_buffer: None,
        })
        .expect("input assembler");

    let mut shader_descriptor = ShaderDescriptor::new("triangle", VERTEX_SOURCE, FRAGMENT_SOURCE);
    shader_descriptor.attributes = vec!["a_position".to_string()];
    let shader = device.create_shader(&shader_descriptor).expect("shader");

    let render_pass = device.create_render_pass(&color_pass()).expect("render pass");
    let framebuffer = device
        .create_framebuffer(&FramebufferDescriptor {
            render_pass: &render_pass,
            color_views: Vec::new(),
            depth_stencil_view: None,
        })
        .expect("window framebuffer");

    let binding_layout = device
        .create_binding_layout(&BindingLayoutDescriptor::default())
        .expect("binding layout");
    let pipeline_layout = device
        .create_pipeline_layout(&PipelineLayoutDescriptor {
            layouts: vec![&binding_layout as &dyn BindingLayout],
        })
        .expect("pipeline layout");
    let pipeline = device
        .create_pipeline_state(&PipelineStateDescriptor {
            shader: &shader,
            layout: &pipeline_layout,
            render_pass: &render_pass,
            primitive: PrimitiveMode::TriangleList,
            rasterizer: RasterizerState::default(),
            depth_stencil: DepthStencilState::default(),
            blend: BlendState::default(),
        })
        .expect("pipeline state");

    TriangleScene {
        vertex_buffer,
        input,
        shader,
        render_pass,
        framebuffer,
        binding_layout,
        pipeline_layout,
        pipeline,
    }
}

/// Records `draws` draws of the scene into a fresh primary command buffer.
pub fn record_draws(device: &GlesDevice, scene: &TriangleScene, draws: u32) -> GlesCommandBuffer {
    let mut commands = device
        .create_command_buffer(&CommandBufferDescriptor::default())
        .expect("command buffer");
    commands.begin().expect("begin");
    commands
        .begin_render_pass(
            &scene.framebuffer,
            &scene.render_pass,
            Rect::from_size(device.width(), device.height()),
            &ClearValues::default(),
        )
        .expect("begin render pass");
    commands.bind_pipeline_state(&scene.pipeline).expect("bind pipeline");
    commands.bind_input_assembler(&scene.input).expect("bind input");
    for _ in 0..draws {
        commands.draw(&scene.input).expect("draw");
    }
    commands.end_render_pass().expect("end render pass");
    commands.end().expect("end");
    commands
}
