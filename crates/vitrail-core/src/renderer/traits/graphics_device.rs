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

use crate::renderer::api::*;
use crate::renderer::error::{RenderError, ResourceError};
use crate::renderer::traits::resources;
use std::fmt::Debug;

/// The device contract: bootstrap, factories for every resource kind, frame
/// submission and capability queries.
///
/// A device is driven from a single rendering thread. Resources are owned by
/// the caller and release their native objects when dropped.
pub trait GraphicsDevice: Debug {
    /// Native context type.
    type Context: resources::Context;
    /// Presentation target type.
    type Window: resources::Window;
    /// Submission queue type.
    type Queue: resources::Queue;
    /// Command storage pool type.
    type CommandAllocator: resources::CommandAllocator;
    /// Command buffer type.
    type CommandBuffer: resources::CommandBuffer;
    /// Buffer type.
    type Buffer: resources::Buffer;
    /// Texture type.
    type Texture: resources::Texture;
    /// Texture view type.
    type TextureView: resources::TextureView;
    /// Sampler type.
    type Sampler: resources::Sampler;
    /// Shader program type.
    type Shader: resources::Shader;
    /// Input assembler type.
    type InputAssembler: resources::InputAssembler;
    /// Render pass type.
    type RenderPass: resources::RenderPass;
    /// Framebuffer type.
    type Framebuffer: resources::Framebuffer;
    /// Binding layout type.
    type BindingLayout: resources::BindingLayout;
    /// Pipeline layout type.
    type PipelineLayout: resources::PipelineLayout;
    /// Pipeline state type.
    type PipelineState: resources::PipelineState;

    // --- Lifecycle ---

    /// Builds the context, negotiates capabilities and creates the window,
    /// queue and command allocator.
    /// ## Arguments
    /// * `info` - Dimensions, window options and the native window handle.
    /// ## Errors
    /// * `RenderError::AlreadyInitialized` - If the device is already ready.
    /// * `RenderError::InitializationFailed` - If a step failed. Everything
    ///   built before it has been destroyed and `initialize` may be retried.
    fn initialize(&mut self, info: &DeviceInfo) -> Result<(), RenderError>;

    /// Destroys the subsystems in reverse creation order. Safe to call in any state.
    fn destroy(&mut self);

    /// Stores the new logical size and resizes the window.
    /// ## Errors
    /// * `RenderError::NotInitialized` - If the device is not ready.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError>;

    /// Ends the frame: recycles command storage, folds the queue counters into
    /// the totals, presents and resets the counters.
    /// ## Errors
    /// * `RenderError::NotInitialized` - If the device is not ready.
    fn present(&mut self) -> Result<(), RenderError>;

    /// Executes recorded command buffers on the queue.
    /// ## Arguments
    /// * `command_buffers` - Buffers in the `Executable` state. They return to
    ///   `Initial` once their commands are consumed.
    fn submit(&mut self, command_buffers: &mut [&mut Self::CommandBuffer]) -> Result<(), RenderError>;

    /// Copies regions of a transfer-source buffer into a texture.
    /// ## Arguments
    /// * `source` - A buffer created with `BufferUsage::TRANSFER_SRC`.
    /// * `destination` - The texture to write.
    /// * `regions` - The regions to copy.
    /// ## Errors
    /// * `ResourceError::OutOfBounds` - If a region reads past the end of `source`.
    fn copy_buffers_to_texture(
        &mut self,
        source: &Self::Buffer,
        destination: &Self::Texture,
        regions: &[BufferTextureCopy],
    ) -> Result<(), ResourceError>;

    // --- Subsystem factories ---

    /// Creates a presentation target.
    fn create_window(&self, descriptor: &WindowDescriptor) -> Result<Self::Window, ResourceError>;

    /// Creates a submission queue.
    fn create_queue(&self, descriptor: &QueueDescriptor) -> Result<Self::Queue, ResourceError>;

    /// Creates a command storage pool.
    fn create_command_allocator(
        &self,
        descriptor: &CommandAllocatorDescriptor,
    ) -> Result<Self::CommandAllocator, ResourceError>;

    // --- Resource factories ---
    //
    // Each returns a fully initialized object or an error, never a partial
    // object. All fail with `ResourceError::DeviceNotReady` before a
    // successful `initialize`.

    /// Creates a command buffer.
    fn create_command_buffer(
        &self,
        descriptor: &CommandBufferDescriptor,
    ) -> Result<Self::CommandBuffer, ResourceError>;

    /// Creates a buffer.
    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<Self::Buffer, ResourceError>;

    /// Creates a texture.
    /// ## Errors
    /// * `ResourceError::UnsupportedFormat` - If the format needs a feature the device lacks.
    fn create_texture(&self, descriptor: &TextureDescriptor)
        -> Result<Self::Texture, ResourceError>;

    /// Creates a view onto a texture.
    fn create_texture_view(
        &self,
        descriptor: &TextureViewDescriptor<'_>,
    ) -> Result<Self::TextureView, ResourceError>;

    /// Creates a sampler.
    fn create_sampler(&self, descriptor: &SamplerDescriptor)
        -> Result<Self::Sampler, ResourceError>;

    /// Compiles and links a shader program.
    /// ## Errors
    /// * `ResourceError::Shader` - If a stage is missing or the program fails to build.
    fn create_shader(&self, descriptor: &ShaderDescriptor) -> Result<Self::Shader, ResourceError>;

    /// Creates an input assembler.
    fn create_input_assembler(
        &self,
        descriptor: &InputAssemblerDescriptor<'_>,
    ) -> Result<Self::InputAssembler, ResourceError>;

    /// Creates a render pass.
    fn create_render_pass(
        &self,
        descriptor: &RenderPassDescriptor,
    ) -> Result<Self::RenderPass, ResourceError>;

    /// Creates a framebuffer.
    fn create_framebuffer(
        &self,
        descriptor: &FramebufferDescriptor<'_>,
    ) -> Result<Self::Framebuffer, ResourceError>;

    /// Creates a binding layout.
    fn create_binding_layout(
        &self,
        descriptor: &BindingLayoutDescriptor,
    ) -> Result<Self::BindingLayout, ResourceError>;

    /// Creates a pipeline layout.
    fn create_pipeline_layout(
        &self,
        descriptor: &PipelineLayoutDescriptor<'_>,
    ) -> Result<Self::PipelineLayout, ResourceError>;

    /// Creates a pipeline state.
    fn create_pipeline_state(
        &self,
        descriptor: &PipelineStateDescriptor<'_>,
    ) -> Result<Self::PipelineState, ResourceError>;

    // --- Queries ---

    /// The native API driven by the device.
    fn api(&self) -> GraphicsApi;

    /// Bootstrap progress.
    fn state(&self) -> DeviceState;

    /// Logical width.
    fn width(&self) -> u32;

    /// Logical height.
    fn height(&self) -> u32;

    /// Backing width in pixels.
    fn native_width(&self) -> u32;

    /// Backing height in pixels.
    fn native_height(&self) -> u32;

    /// The negotiated capability table.
    fn features(&self) -> &FeatureTable;

    /// Returns `true` if `feature` is supported.
    fn has_feature(&self, feature: Feature) -> bool {
        self.features()[feature]
    }

    /// The driver extensions.
    fn extensions(&self) -> &ExtensionSet;

    /// Returns `true` if an extension name contains `marker`.
    fn has_extension(&self, marker: &str) -> bool {
        self.extensions().contains(marker)
    }

    /// Backend behavior switches.
    fn toggles(&self) -> BehaviorToggles;

    /// Renderer, vendor and version strings.
    fn identity(&self) -> &DeviceIdentity;

    /// Space-separated names of the supported compressed formats.
    fn compressed_formats(&self) -> &str;

    /// Totals accumulated over every presented frame.
    fn frame_stats(&self) -> FrameStats;

    /// The native context, once created.
    fn context(&self) -> Option<&Self::Context>;

    /// The presentation target, once created.
    fn window(&self) -> Option<&Self::Window>;

    /// The submission queue, once created.
    fn queue(&self) -> Option<&Self::Queue>;
}
