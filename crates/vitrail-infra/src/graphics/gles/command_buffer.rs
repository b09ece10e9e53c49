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

use vitrail_core::math::Rect;
use vitrail_core::renderer::api::*;
use vitrail_core::renderer::traits::{
    CommandBuffer, CommandBufferState, GpuResource, InputAssembler, ResourceLifecycle,
};
use vitrail_core::renderer::ResourceError;

use super::commands::{CommandPackage, FramebufferTarget, GlesCmd};
use super::driver::{DrawCall, GlesShared};
use super::framebuffer::GlesFramebuffer;
use super::input_assembler::GlesInputAssembler;
use super::pipeline_state::GlesPipelineState;
use super::render_pass::GlesRenderPass;

/// Records commands into a package that the queue replays on submission.
#[derive(Debug)]
pub struct GlesCommandBuffer {
    shared: Rc<GlesShared>,
    kind: CommandBufferKind,
    queue_type: QueueType,
    state: CommandBufferState,
    package: CommandPackage,
    in_render_pass: bool,
    primitive: Option<PrimitiveMode>,
    input_bound: bool,
    live: bool,
}

impl GlesCommandBuffer {
    /// Creates an empty command buffer bound to the device.
    pub fn new(shared: Rc<GlesShared>) -> Self {
        Self {
            shared,
            kind: CommandBufferKind::Primary,
            queue_type: QueueType::Graphics,
            state: CommandBufferState::Initial,
            package: CommandPackage::default(),
            in_render_pass: false,
            primitive: None,
            input_bound: false,
            live: false,
        }
    }

    /// The queue type the buffer targets.
    pub fn queue_type(&self) -> QueueType {
        self.queue_type
    }

    /// Number of recorded commands.
    pub fn command_count(&self) -> usize {
        self.package.len()
    }

    fn invalid(reason: &str) -> ResourceError {
        ResourceError::InvalidState {
            kind: ResourceKind::CommandBuffer,
            reason: reason.to_string(),
        }
    }

    fn ensure_recording(&self) -> Result<(), ResourceError> {
        if self.state != CommandBufferState::Recording {
            return Err(Self::invalid("command recorded outside begin/end"));
        }
        Ok(())
    }

    /// Starts a render pass on `framebuffer` and clears what the pass asks for.
    pub fn begin_render_pass(
        &mut self,
        framebuffer: &GlesFramebuffer,
        render_pass: &GlesRenderPass,
        render_area: Rect,
        clear: &ClearValues,
    ) -> Result<(), ResourceError> {
        self.ensure_recording()?;
        if self.in_render_pass {
            return Err(Self::invalid("render passes cannot be nested"));
        }

        if !framebuffer.is_window_target() && framebuffer.native_handle().is_none() {
            return Err(Self::invalid("render pass on a destroyed framebuffer"));
        }
        let target = if framebuffer.is_window_target() {
            FramebufferTarget::Window
        } else {
            FramebufferTarget::Offscreen(framebuffer.native_handle())
        };
        let flags = clear.flags & render_pass.clear_flags();
        let clear = (!flags.is_empty()).then_some(ClearValues { flags, ..*clear });

        self.package.cmds.push(GlesCmd::BeginRenderPass {
            target,
            area: render_area,
            clear,
        });
        self.in_render_pass = true;
        Ok(())
    }

    /// Ends the current render pass.
    pub fn end_render_pass(&mut self) -> Result<(), ResourceError> {
        self.ensure_recording()?;
        if !self.in_render_pass {
            return Err(Self::invalid("no render pass to end"));
        }
        self.package.cmds.push(GlesCmd::EndRenderPass);
        self.in_render_pass = false;
        Ok(())
    }

    /// Makes `pipeline` current for the following draws.
    pub fn bind_pipeline_state(&mut self, pipeline: &GlesPipelineState) -> Result<(), ResourceError> {
        self.ensure_recording()?;
        self.package.cmds.push(GlesCmd::BindPipelineState {
            program: pipeline.program(),
            state: pipeline.render_state(),
        });
        self.primitive = Some(pipeline.primitive_mode());
        Ok(())
    }

    /// Binds the vertex input of `input`.
    pub fn bind_input_assembler(&mut self, input: &GlesInputAssembler) -> Result<(), ResourceError> {
        self.ensure_recording()?;
        self.package.cmds.push(GlesCmd::BindInputAssembler {
            vertex_array: input.vertex_array(),
            layout: input.layout(),
        });
        self.input_bound = true;
        Ok(())
    }

    /// Draws the current range of `input` with the bound pipeline.
    pub fn draw(&mut self, input: &GlesInputAssembler) -> Result<(), ResourceError> {
        self.ensure_recording()?;
        if !self.in_render_pass {
            return Err(Self::invalid("draw outside a render pass"));
        }
        let Some(mode) = self.primitive else {
            return Err(Self::invalid("draw without a pipeline state"));
        };
        if !self.input_bound {
            return Err(Self::invalid("draw without an input assembler"));
        }

        let info = input.draw_info();
        let toggles = self.shared.toggles;
        if info.instance_count > 0 && !(toggles.use_draw_instanced || toggles.use_instanced_arrays)
        {
            return Err(Self::invalid("instanced draws are not supported by the driver"));
        }

        let triangles = mode
            .triangle_count(info.element_count())
            .saturating_mul(info.effective_instances());
        self.package.cmds.push(GlesCmd::Draw(DrawCall {
            mode,
            info,
            index_format: input.index_format(),
        }));
        self.package.draw_calls += 1;
        self.package.triangles = self.package.triangles.saturating_add(triangles);
        Ok(())
    }

    /// Appends the commands of executable secondary buffers.
    pub fn execute(&mut self, secondaries: &[&GlesCommandBuffer]) -> Result<(), ResourceError> {
        self.ensure_recording()?;
        for secondary in secondaries {
            if secondary.kind != CommandBufferKind::Secondary
                || secondary.state != CommandBufferState::Executable
            {
                return Err(Self::invalid(
                    "only executable secondary buffers can be executed",
                ));
            }
            self.package
                .cmds
                .extend(secondary.package.cmds.iter().cloned());
            self.package.draw_calls += secondary.package.draw_calls;
            self.package.triangles = self
                .package
                .triangles
                .saturating_add(secondary.package.triangles);
        }
        Ok(())
    }

    /// Swaps out the recorded package and returns the buffer to `Initial`.
    pub(crate) fn take_package(&mut self, replacement: CommandPackage) -> CommandPackage {
        self.state = CommandBufferState::Initial;
        std::mem::replace(&mut self.package, replacement)
    }

    fn reset_recording(&mut self) {
        self.package.clear();
        self.in_render_pass = false;
        self.primitive = None;
        self.input_bound = false;
    }
}

impl ResourceLifecycle for GlesCommandBuffer {
    type Descriptor<'a> = CommandBufferDescriptor;
    const KIND: ResourceKind = ResourceKind::CommandBuffer;

    fn initialize(&mut self, descriptor: &CommandBufferDescriptor) -> Result<(), ResourceError> {
        if descriptor.queue_type != QueueType::Graphics {
            return Err(ResourceError::InvalidDescriptor {
                kind: ResourceKind::CommandBuffer,
                reason: format!("GLES only has a graphics queue, got {:?}", descriptor.queue_type),
            });
        }
        self.kind = descriptor.kind;
        self.queue_type = descriptor.queue_type;
        self.live = true;
        Ok(())
    }

    fn destroy(&mut self) {
        self.reset_recording();
        self.state = CommandBufferState::Initial;
        self.live = false;
    }
}

impl GpuResource for GlesCommandBuffer {
    fn kind(&self) -> ResourceKind {
        ResourceKind::CommandBuffer
    }

    fn native_handle(&self) -> NativeHandle {
        NativeHandle::NONE
    }
}

impl CommandBuffer for GlesCommandBuffer {
    fn buffer_kind(&self) -> CommandBufferKind {
        self.kind
    }

    fn state(&self) -> CommandBufferState {
        self.state
    }

    fn draw_calls(&self) -> u32 {
        self.package.draw_calls
    }

    fn triangles(&self) -> u32 {
        self.package.triangles
    }

    fn begin(&mut self) -> Result<(), ResourceError> {
        if !self.live {
            return Err(Self::invalid("begin on a destroyed command buffer"));
        }
        if self.state == CommandBufferState::Recording {
            return Err(Self::invalid("begin while already recording"));
        }
        self.reset_recording();
        self.state = CommandBufferState::Recording;
        Ok(())
    }

    fn end(&mut self) -> Result<(), ResourceError> {
        self.ensure_recording()?;
        if self.in_render_pass {
            return Err(Self::invalid("end inside a render pass"));
        }
        self.state = CommandBufferState::Executable;
        Ok(())
    }
}
