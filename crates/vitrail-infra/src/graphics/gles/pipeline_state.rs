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

use vitrail_core::renderer::api::*;
use vitrail_core::renderer::traits::{GpuResource, PipelineState, RenderPass, ResourceLifecycle};
use vitrail_core::renderer::ResourceError;

use super::driver::RenderState;

/// A program plus the fixed-function state applied with it.
#[derive(Debug, Default)]
pub struct GlesPipelineState {
    program: NativeHandle,
    primitive: PrimitiveMode,
    render_state: RenderState,
}

impl GlesPipelineState {
    /// Creates an empty pipeline state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The program made current by this pipeline.
    pub fn program(&self) -> NativeHandle {
        self.program
    }

    /// The primitive mode used for draws.
    pub fn primitive_mode(&self) -> PrimitiveMode {
        self.primitive
    }

    /// The fixed-function state.
    pub fn render_state(&self) -> RenderState {
        self.render_state
    }
}

impl ResourceLifecycle for GlesPipelineState {
    type Descriptor<'a> = PipelineStateDescriptor<'a>;
    const KIND: ResourceKind = ResourceKind::PipelineState;

    fn initialize(
        &mut self,
        descriptor: &PipelineStateDescriptor<'_>,
    ) -> Result<(), ResourceError> {
        let invalid = |reason: &str| ResourceError::InvalidDescriptor {
            kind: ResourceKind::PipelineState,
            reason: reason.to_string(),
        };
        let program = descriptor.shader.native_handle();
        if program.is_none() {
            return Err(invalid("the shader was destroyed"));
        }
        let pass = descriptor.render_pass;
        let depth_used = descriptor.depth_stencil.depth_test
            || descriptor.depth_stencil.depth_write
            || descriptor.depth_stencil.stencil_test;
        if depth_used && pass.depth_stencil_attachment().is_none() {
            return Err(invalid("depth/stencil testing needs a depth attachment"));
        }
        if descriptor.blend.enabled && pass.color_attachments().is_empty() {
            return Err(invalid("blending needs a color attachment"));
        }

        self.program = program;
        self.primitive = descriptor.primitive;
        self.render_state = RenderState {
            rasterizer: descriptor.rasterizer,
            depth_stencil: descriptor.depth_stencil,
            blend: descriptor.blend,
        };
        Ok(())
    }

    fn destroy(&mut self) {
        self.program = NativeHandle::NONE;
    }
}

impl GpuResource for GlesPipelineState {
    fn kind(&self) -> ResourceKind {
        ResourceKind::PipelineState
    }

    fn native_handle(&self) -> NativeHandle {
        NativeHandle::NONE
    }
}

impl PipelineState for GlesPipelineState {
    fn primitive(&self) -> PrimitiveMode {
        self.primitive
    }

    fn shader_handle(&self) -> NativeHandle {
        self.program
    }
}
