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

// Vitrail Sandbox
// Drives a GLES device over the headless driver for a few frames.

use std::mem;
use std::rc::Rc;

use anyhow::{Context as _, Result};
use vitrail_core::math::{LinearRgba, Rect};
use vitrail_core::renderer::api::*;
use vitrail_core::renderer::traits::{BindingLayout, Buffer, CommandBuffer, TextureView};
use vitrail_core::renderer::GraphicsDevice;
use vitrail_infra::graphics::gles::*;

const FRAME_COUNT: u32 = 3;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
    color: [f32; 3],
}

const VERTICES: &[Vertex] = &[
    Vertex {
        position: [0.0, 0.5, 0.0],
        color: [1.0, 0.0, 0.0],
    },
    Vertex {
        position: [-0.5, -0.5, 0.0],
        color: [0.0, 1.0, 0.0],
    },
    Vertex {
        position: [0.5, -0.5, 0.0],
        color: [0.0, 0.0, 1.0],
    },
];

const INDICES: &[u16] = &[0, 1, 2];

const VERTEX_SHADER: &str = r#"
attribute vec3 a_position;
attribute vec3 a_color;
varying vec3 v_color;
void main() {
    v_color = a_color;
    gl_Position = vec4(a_position, 1.0);
}
"#;

const FRAGMENT_SHADER: &str = r#"
precision mediump float;
varying vec3 v_color;
void main() {
    gl_FragColor = vec4(v_color, 1.0);
}
"#;

/// Reads settings from the JSON file given as first argument, if any.
fn load_settings() -> Result<DeviceSettings> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from '{path}'"))?;
            DeviceSettings::from_json(&json).context("Invalid device settings")
        }
        None => Ok(DeviceSettings {
            window_title: "Vitrail Sandbox".to_string(),
            ..Default::default()
        }),
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = load_settings()?;
    let driver = Rc::new(HeadlessDriver::default());
    let mut device = GlesDevice::new(driver.clone());
    device
        .initialize(&DeviceInfo::new(settings))
        .context("Failed to initialize the GLES device")?;

    log::info!("Sandbox: Creating GPU resources...");

    // --- Step 1: Geometry ---
    let vertex_stride = mem::size_of::<Vertex>() as u32;
    let mut vertex_buffer = device.create_buffer(&BufferDescriptor::new(
        BufferUsage::VERTEX,
        mem::size_of_val(VERTICES) as u64,
        vertex_stride,
    ))?;
    vertex_buffer.write(VERTICES, 0)?;

    let mut index_buffer = device.create_buffer(&BufferDescriptor::new(
        BufferUsage::INDEX,
        mem::size_of_val(INDICES) as u64,
        mem::size_of::<u16>() as u32,
    ))?;
    index_buffer.write(INDICES, 0)?;

    let input = device.create_input_assembler(&InputAssemblerDescriptor {
        attributes: vec![
            VertexAttribute::new("a_position", VertexFormat::Float32x3),
            VertexAttribute::new("a_color", VertexFormat::Float32x3),
        ],
        vertex_buffers: vec![&vertex_buffer as &dyn Buffer],
        index_buffer: Some(&index_buffer),
    })?;

    // --- Step 2: A checkerboard texture uploaded through a staging buffer ---
    let checker: Vec<u8> = (0..16u32)
        .flat_map(|i| {
            let lit = ((i % 4) + (i / 4)) % 2 == 0;
            if lit {
                [255, 255, 255, 255]
            } else {
                [0, 0, 0, 255]
            }
        })
        .collect();
    let mut staging = device.create_buffer(&BufferDescriptor::new(
        BufferUsage::TRANSFER_SRC,
        checker.len() as u64,
        4,
    ))?;
    staging.update(&checker, 0)?;
    let texture = device.create_texture(&TextureDescriptor {
        label: Some("checker".to_string()),
        ..TextureDescriptor::d2(TextureFormat::Rgba8Unorm, 4, 4)
    })?;
    device.copy_buffers_to_texture(
        &staging,
        &texture,
        &[BufferTextureCopy {
            texture_extent: vitrail_core::math::Extent3D::new(4, 4, 1),
            layer_count: 1,
            ..Default::default()
        }],
    )?;
    let texture_view = device.create_texture_view(&TextureViewDescriptor::of(&texture))?;
    let sampler = device.create_sampler(&SamplerDescriptor::default())?;
    log::info!(
        " -> Texture view {:?} ({}x{}), sampler {:?}",
        texture_view.texture_handle(),
        texture_view.size().width,
        texture_view.size().height,
        sampler
    );

    // --- Step 3: Pipeline ---
    let mut shader_desc = ShaderDescriptor::new("vertex-color", VERTEX_SHADER, FRAGMENT_SHADER);
    shader_desc.attributes = vec!["a_position".to_string(), "a_color".to_string()];
    let shader = device.create_shader(&shader_desc)?;

    let surface = device
        .window()
        .map(|window| vitrail_core::renderer::traits::Window::formats(window))
        .unwrap_or_default();
    let render_pass = device.create_render_pass(&RenderPassDescriptor {
        color_attachments: vec![ColorAttachment {
            format: surface.color,
            sample_count: SampleCount::X1,
            load_op: LoadOp::Clear,
            store_op: StoreOp::Store,
        }],
        depth_stencil_attachment: Some(DepthStencilAttachment {
            format: surface.depth_stencil,
            depth_load_op: LoadOp::Clear,
            depth_store_op: StoreOp::Discard,
            stencil_load_op: LoadOp::Clear,
            stencil_store_op: StoreOp::Discard,
        }),
    })?;
    let framebuffer = device.create_framebuffer(&FramebufferDescriptor {
        render_pass: &render_pass,
        color_views: Vec::new(),
        depth_stencil_view: None,
    })?;

    let bindings = device.create_binding_layout(&BindingLayoutDescriptor {
        entries: vec![BindingLayoutEntry {
            binding: 0,
            ty: BindingType::SampledTexture,
            count: 1,
            visibility: ShaderStageFlags::FRAGMENT,
            name: "u_texture".to_string(),
        }],
    })?;
    let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
        layouts: vec![&bindings as &dyn BindingLayout],
    })?;
    let pipeline = device.create_pipeline_state(&PipelineStateDescriptor {
        shader: &shader,
        layout: &pipeline_layout,
        render_pass: &render_pass,
        primitive: PrimitiveMode::TriangleList,
        rasterizer: RasterizerState::default(),
        depth_stencil: DepthStencilState {
            depth_test: true,
            depth_write: true,
            depth_compare: CompareFunction::Less,
            stencil_test: false,
        },
        blend: BlendState::default(),
    })?;
    log::info!(" -> Pipeline state created for program {:?}", pipeline.program());

    // --- Step 4: Frames ---
    let mut commands = device.create_command_buffer(&CommandBufferDescriptor::default())?;
    let clear = ClearValues {
        color: LinearRgba::new(0.1, 0.1, 0.12, 1.0),
        ..Default::default()
    };
    for frame in 0..FRAME_COUNT {
        commands.begin()?;
        commands.begin_render_pass(
            &framebuffer,
            &render_pass,
            Rect::from_size(device.width(), device.height()),
            &clear,
        )?;
        commands.bind_pipeline_state(&pipeline)?;
        commands.bind_input_assembler(&input)?;
        commands.draw(&input)?;
        commands.end_render_pass()?;
        commands.end()?;

        device.submit(&mut [&mut commands])?;
        device.present()?;
        log::debug!("Frame {frame} presented.");
    }

    let stats = device.frame_stats();
    log::info!(
        "Sandbox: {} frames, {} draw calls, {} triangles ({} draws reached the driver).",
        stats.frames,
        stats.draw_calls,
        stats.triangles,
        driver.executed_draws()
    );

    device.destroy();
    Ok(())
}
