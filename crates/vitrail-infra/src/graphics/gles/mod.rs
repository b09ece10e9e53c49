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

//! The OpenGL ES 2 backend.
//!
//! [`GlesDevice`] implements [`GraphicsDevice`](vitrail_core::renderer::GraphicsDevice)
//! on top of a [`GlesDriver`]. [`HeadlessDriver`] records calls without a GPU;
//! [`GlowDriver`] forwards them to a live context.

mod binding;
mod buffer;
mod command_allocator;
mod command_buffer;
mod commands;
mod context;
mod device;
mod driver;
mod framebuffer;
mod headless;
mod input_assembler;
mod pipeline_state;
mod queue;
mod render_pass;
mod sampler;
mod shader;
mod state_cache;
mod texture;
mod window;

#[cfg(not(target_arch = "wasm32"))]
mod conversions;
#[cfg(not(target_arch = "wasm32"))]
mod glow_driver;

pub use binding::{GlesBindingLayout, GlesPipelineLayout};
pub use buffer::GlesBuffer;
pub use command_allocator::GlesCommandAllocator;
pub use command_buffer::GlesCommandBuffer;
pub use commands::{CommandPackage, FramebufferTarget};
pub use context::GlesContext;
pub use device::GlesDevice;
pub use driver::*;
pub use framebuffer::GlesFramebuffer;
pub use headless::{HeadlessDriver, DEFAULT_EXTENSIONS};
pub use input_assembler::GlesInputAssembler;
pub use pipeline_state::GlesPipelineState;
pub use queue::GlesQueue;
pub use render_pass::GlesRenderPass;
pub use sampler::GlesSampler;
pub use shader::GlesShader;
pub use state_cache::GlesStateCache;
pub use texture::{GlesTexture, GlesTextureView};
pub use window::GlesWindow;

#[cfg(not(target_arch = "wasm32"))]
pub use glow_driver::{GlowDriver, SwapBuffers};
