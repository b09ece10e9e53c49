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

use std::rc::Rc;

use vitrail_core::math::Extent2D;
use vitrail_core::renderer::api::*;
use vitrail_core::renderer::traits::{
    Buffer, CommandAllocator, Context, Queue, ResourceLifecycle, Texture, Window,
};
use vitrail_core::renderer::{construct, GraphicsDevice, RenderError, ResourceError};

use super::binding::{GlesBindingLayout, GlesPipelineLayout};
use super::buffer::GlesBuffer;
use super::command_allocator::GlesCommandAllocator;
use super::command_buffer::GlesCommandBuffer;
use super::commands;
use super::context::GlesContext;
use super::driver::{GlString, GlesDriver, GlesShared};
use super::framebuffer::GlesFramebuffer;
use super::input_assembler::GlesInputAssembler;
use super::pipeline_state::GlesPipelineState;
use super::queue::GlesQueue;
use super::render_pass::GlesRenderPass;
use super::sampler::GlesSampler;
use super::shader::GlesShader;
use super::state_cache::GlesStateCache;
use super::texture::{GlesTexture, GlesTextureView};
use super::window::GlesWindow;

/// An OpenGL ES 2 device.
///
/// Owns the context, window, queue, command allocator and state cache, and
/// creates every other resource. All subsystems are either present or absent
/// once `initialize` returns.
#[derive(Debug)]
pub struct GlesDevice {
    driver: Rc<dyn GlesDriver>,
    shared: Option<Rc<GlesShared>>,
    state: DeviceState,

    width: u32,
    height: u32,
    native_width: u32,
    native_height: u32,

    capabilities: CapabilityReport,
    identity: DeviceIdentity,
    frame_stats: FrameStats,

    state_cache: Option<GlesStateCache>,
    context: Option<GlesContext>,
    window: Option<GlesWindow>,
    queue: Option<GlesQueue>,
    allocator: Option<GlesCommandAllocator>,
}

impl GlesDevice {
    /// Creates an uninitialized device over `driver`.
    pub fn new(driver: Rc<dyn GlesDriver>) -> Self {
        Self {
            driver,
            shared: None,
            state: DeviceState::Uninitialized,
            width: 0,
            height: 0,
            native_width: 0,
            native_height: 0,
            capabilities: CapabilityReport::default(),
            identity: DeviceIdentity::default(),
            frame_stats: FrameStats::default(),
            state_cache: None,
            context: None,
            window: None,
            queue: None,
            allocator: None,
        }
    }

    /// The command allocator, once created.
    pub fn command_allocator(&self) -> Option<&GlesCommandAllocator> {
        self.allocator.as_ref()
    }

    fn ready_shared(&self) -> Result<&Rc<GlesShared>, ResourceError> {
        match (self.state, &self.shared) {
            (DeviceState::Ready, Some(shared)) => Ok(shared),
            _ => Err(ResourceError::DeviceNotReady),
        }
    }

    /// Runs every bootstrap step, stopping at the first failure.
    fn bootstrap(&mut self, info: &DeviceInfo) -> Result<(), (ResourceKind, ResourceError)> {
        let settings = &info.settings;
        self.width = settings.width;
        self.height = settings.height;
        self.native_width = settings.native_width;
        self.native_height = settings.native_height;
        self.frame_stats = FrameStats::default();
        self.state_cache = Some(GlesStateCache::new());

        let context = construct(
            GlesContext::new(self.driver.clone()),
            &ContextDescriptor {
                window_handle: info.window_handle.clone(),
                shared_context: info.shared_context,
            },
        )
        .map_err(|err| (ResourceKind::Context, err))?;
        let formats = context.formats();
        self.context = Some(context);
        self.state = DeviceState::ContextReady;

        self.capabilities = probe_capabilities(&self.driver.get_string(GlString::Extensions));
        self.identity = DeviceIdentity {
            renderer: self.driver.get_string(GlString::Renderer),
            vendor: self.driver.get_string(GlString::Vendor),
            version: self.driver.get_string(GlString::Version),
        };
        log::info!("RENDERER: {}", self.identity.renderer);
        log::info!("VENDOR: {}", self.identity.vendor);
        log::info!("VERSION: {}", self.identity.version);
        log::info!("COMPRESSED_FORMATS: {}", self.capabilities.compressed_formats);
        log::debug!(
            "{} extensions, features {:?}, toggles {:?}",
            self.capabilities.extensions.len(),
            self.capabilities.features,
            self.capabilities.toggles
        );

        let shared = Rc::new(GlesShared {
            driver: self.driver.clone(),
            features: self.capabilities.features,
            toggles: self.capabilities.toggles,
        });
        self.shared = Some(shared.clone());

        let window = construct(
            GlesWindow::new(shared.clone()),
            &WindowDescriptor {
                title: settings.window_title.clone(),
                width: self.width,
                height: self.height,
                offscreen: settings.offscreen,
                formats,
            },
        )
        .map_err(|err| (ResourceKind::Window, err))?;
        self.window = Some(window);
        self.state = DeviceState::WindowReady;

        let queue = construct(GlesQueue::new(shared), &QueueDescriptor::default())
            .map_err(|err| (ResourceKind::Queue, err))?;
        self.queue = Some(queue);
        self.state = DeviceState::QueueReady;

        let allocator = construct(
            GlesCommandAllocator::new(),
            &CommandAllocatorDescriptor::default(),
        )
        .map_err(|err| (ResourceKind::CommandAllocator, err))?;
        self.allocator = Some(allocator);
        self.state = DeviceState::AllocatorReady;

        Ok(())
    }
}

impl Drop for GlesDevice {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl GraphicsDevice for GlesDevice {
    type Context = GlesContext;
    type Window = GlesWindow;
    type Queue = GlesQueue;
    type CommandAllocator = GlesCommandAllocator;
    type CommandBuffer = GlesCommandBuffer;
    type Buffer = GlesBuffer;
    type Texture = GlesTexture;
    type TextureView = GlesTextureView;
    type Sampler = GlesSampler;
    type Shader = GlesShader;
    type InputAssembler = GlesInputAssembler;
    type RenderPass = GlesRenderPass;
    type Framebuffer = GlesFramebuffer;
    type BindingLayout = GlesBindingLayout;
    type PipelineLayout = GlesPipelineLayout;
    type PipelineState = GlesPipelineState;

    fn initialize(&mut self, info: &DeviceInfo) -> Result<(), RenderError> {
        if !self.state.can_initialize() {
            return Err(RenderError::AlreadyInitialized);
        }
        log::info!("GlesDevice: Initializing...");

        match self.bootstrap(info) {
            Ok(()) => {
                self.state = DeviceState::Ready;
                log::info!(
                    "GlesDevice: Ready ({}x{}, native {}x{}).",
                    self.width,
                    self.height,
                    self.native_width,
                    self.native_height
                );
                Ok(())
            }
            Err((step, err)) => {
                log::error!("GlesDevice: Failed to create the {step}: {err}");
                self.destroy();
                self.state = DeviceState::Failed;
                Err(RenderError::InitializationFailed {
                    step,
                    reason: err.to_string(),
                })
            }
        }
    }

    fn destroy(&mut self) {
        if let Some(mut allocator) = self.allocator.take() {
            allocator.destroy();
        }
        if let Some(mut queue) = self.queue.take() {
            queue.destroy();
        }
        if let Some(mut window) = self.window.take() {
            window.destroy();
        }
        if let Some(mut context) = self.context.take() {
            context.destroy();
        }
        self.state_cache = None;
        self.shared = None;
        self.capabilities = CapabilityReport::default();
        self.identity = DeviceIdentity::default();
        if self.state != DeviceState::Uninitialized {
            log::debug!("GlesDevice: Destroyed.");
        }
        self.state = DeviceState::Uninitialized;
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        let Some(window) = self.window.as_mut().filter(|_| self.state.is_ready()) else {
            return Err(RenderError::NotInitialized);
        };
        window.resize(width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn present(&mut self) -> Result<(), RenderError> {
        if !self.state.is_ready() {
            return Err(RenderError::NotInitialized);
        }
        let (Some(allocator), Some(queue), Some(context)) = (
            self.allocator.as_mut(),
            self.queue.as_mut(),
            self.context.as_mut(),
        ) else {
            return Err(RenderError::NotInitialized);
        };

        allocator.release_commands();
        self.frame_stats
            .accumulate(queue.draw_calls(), queue.triangles());
        let presented = context.present();
        queue.reset_counters();
        presented.map_err(RenderError::from)
    }

    fn submit(
        &mut self,
        command_buffers: &mut [&mut GlesCommandBuffer],
    ) -> Result<(), RenderError> {
        if !self.state.is_ready() {
            return Err(RenderError::NotInitialized);
        }
        let (Some(queue), Some(allocator), Some(cache), Some(window)) = (
            self.queue.as_mut(),
            self.allocator.as_mut(),
            self.state_cache.as_mut(),
            self.window.as_ref(),
        ) else {
            return Err(RenderError::NotInitialized);
        };
        queue.submit(command_buffers, allocator, cache, window.framebuffer_handle())?;
        Ok(())
    }

    fn copy_buffers_to_texture(
        &mut self,
        source: &GlesBuffer,
        destination: &GlesTexture,
        regions: &[BufferTextureCopy],
    ) -> Result<(), ResourceError> {
        let driver = self.ready_shared()?.driver.clone();
        let Some(cache) = self.state_cache.as_mut() else {
            return Err(ResourceError::DeviceNotReady);
        };

        let data = source
            .host_data()
            .filter(|_| source.usage().contains(BufferUsage::TRANSFER_SRC))
            .ok_or_else(|| ResourceError::InvalidDescriptor {
                kind: ResourceKind::Buffer,
                reason: "copy source must be a TRANSFER_SRC buffer".to_string(),
            })?;
        if !destination.usage().contains(TextureUsage::TRANSFER_DST) {
            return Err(ResourceError::InvalidDescriptor {
                kind: ResourceKind::Texture,
                reason: "copy destination must be a TRANSFER_DST texture".to_string(),
            });
        }

        cache.invalidate();
        commands::copy_buffers_to_texture(driver.as_ref(), cache, data, destination, regions)
    }

    // --- Subsystem factories ---

    fn create_window(&self, descriptor: &WindowDescriptor) -> Result<GlesWindow, ResourceError> {
        construct(GlesWindow::new(self.ready_shared()?.clone()), descriptor)
    }

    fn create_queue(&self, descriptor: &QueueDescriptor) -> Result<GlesQueue, ResourceError> {
        construct(GlesQueue::new(self.ready_shared()?.clone()), descriptor)
    }

    fn create_command_allocator(
        &self,
        descriptor: &CommandAllocatorDescriptor,
    ) -> Result<GlesCommandAllocator, ResourceError> {
        self.ready_shared()?;
        construct(GlesCommandAllocator::new(), descriptor)
    }

    // --- Resource factories ---

    fn create_command_buffer(
        &self,
        descriptor: &CommandBufferDescriptor,
    ) -> Result<GlesCommandBuffer, ResourceError> {
        construct(GlesCommandBuffer::new(self.ready_shared()?.clone()), descriptor)
    }

    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<GlesBuffer, ResourceError> {
        construct(GlesBuffer::new(self.ready_shared()?.clone()), descriptor)
    }

    fn create_texture(&self, descriptor: &TextureDescriptor) -> Result<GlesTexture, ResourceError> {
        construct(GlesTexture::new(self.ready_shared()?.clone()), descriptor)
    }

    fn create_texture_view(
        &self,
        descriptor: &TextureViewDescriptor<'_>,
    ) -> Result<GlesTextureView, ResourceError> {
        self.ready_shared()?;
        construct(GlesTextureView::new(), descriptor)
    }

    fn create_sampler(&self, descriptor: &SamplerDescriptor) -> Result<GlesSampler, ResourceError> {
        self.ready_shared()?;
        construct(GlesSampler::new(), descriptor)
    }

    fn create_shader(&self, descriptor: &ShaderDescriptor) -> Result<GlesShader, ResourceError> {
        construct(GlesShader::new(self.ready_shared()?.clone()), descriptor)
    }

    fn create_input_assembler(
        &self,
        descriptor: &InputAssemblerDescriptor<'_>,
    ) -> Result<GlesInputAssembler, ResourceError> {
        construct(GlesInputAssembler::new(self.ready_shared()?.clone()), descriptor)
    }

    fn create_render_pass(
        &self,
        descriptor: &RenderPassDescriptor,
    ) -> Result<GlesRenderPass, ResourceError> {
        construct(GlesRenderPass::new(self.ready_shared()?.clone()), descriptor)
    }

    fn create_framebuffer(
        &self,
        descriptor: &FramebufferDescriptor<'_>,
    ) -> Result<GlesFramebuffer, ResourceError> {
        let shared = self.ready_shared()?.clone();
        let window_size = self
            .window
            .as_ref()
            .map_or(Extent2D::default(), |window| window.size());
        construct(GlesFramebuffer::new(shared, window_size), descriptor)
    }

    fn create_binding_layout(
        &self,
        descriptor: &BindingLayoutDescriptor,
    ) -> Result<GlesBindingLayout, ResourceError> {
        self.ready_shared()?;
        construct(GlesBindingLayout::new(), descriptor)
    }

    fn create_pipeline_layout(
        &self,
        descriptor: &PipelineLayoutDescriptor<'_>,
    ) -> Result<GlesPipelineLayout, ResourceError> {
        self.ready_shared()?;
        construct(GlesPipelineLayout::new(), descriptor)
    }

    fn create_pipeline_state(
        &self,
        descriptor: &PipelineStateDescriptor<'_>,
    ) -> Result<GlesPipelineState, ResourceError> {
        self.ready_shared()?;
        construct(GlesPipelineState::new(), descriptor)
    }

    // --- Queries ---

    fn api(&self) -> GraphicsApi {
        GraphicsApi::Gles2
    }

    fn state(&self) -> DeviceState {
        self.state
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn native_width(&self) -> u32 {
        self.native_width
    }

    fn native_height(&self) -> u32 {
        self.native_height
    }

    fn features(&self) -> &FeatureTable {
        &self.capabilities.features
    }

    fn extensions(&self) -> &ExtensionSet {
        &self.capabilities.extensions
    }

    fn toggles(&self) -> BehaviorToggles {
        self.capabilities.toggles
    }

    fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    fn compressed_formats(&self) -> &str {
        &self.capabilities.compressed_formats
    }

    fn frame_stats(&self) -> FrameStats {
        self.frame_stats
    }

    fn context(&self) -> Option<&GlesContext> {
        self.context.as_ref()
    }

    fn window(&self) -> Option<&GlesWindow> {
        self.window.as_ref()
    }

    fn queue(&self) -> Option<&GlesQueue> {
        self.queue.as_ref()
    }
}
