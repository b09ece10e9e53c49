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

use vitrail_core::renderer::api::*;
use vitrail_core::renderer::traits::{GpuResource, ResourceLifecycle, Shader};
use vitrail_core::renderer::{ResourceError, ShaderError};

use super::driver::{backend_error, GlObjectKind, GlesShared, ProgramSource};

/// A linked GLES program.
#[derive(Debug)]
pub struct GlesShader {
    shared: Rc<GlesShared>,
    handle: NativeHandle,
    name: String,
    attributes: Vec<String>,
}

impl GlesShader {
    /// Creates an empty program bound to the device.
    pub fn new(shared: Rc<GlesShared>) -> Self {
        Self {
            shared,
            handle: NativeHandle::NONE,
            name: String::new(),
            attributes: Vec::new(),
        }
    }
}

impl ResourceLifecycle for GlesShader {
    type Descriptor<'a> = ShaderDescriptor;
    const KIND: ResourceKind = ResourceKind::Shader;

    fn initialize(&mut self, descriptor: &ShaderDescriptor) -> Result<(), ResourceError> {
        self.name = descriptor.name.clone();
        self.attributes = descriptor.attributes.clone();

        let stage = |stage| {
            descriptor.stage(stage).ok_or_else(|| ShaderError::MissingStage {
                name: descriptor.name.clone(),
                stage,
            })
        };
        let vertex = stage(ShaderStage::Vertex)?;
        let fragment = stage(ShaderStage::Fragment)?;

        let driver = &self.shared.driver;
        self.handle = driver
            .create_object(GlObjectKind::Program)
            .map_err(backend_error)?;
        driver
            .link_program(
                self.handle,
                &ProgramSource {
                    vertex,
                    fragment,
                    attributes: &self.attributes,
                },
            )
            .map_err(|err| ShaderError::CompilationFailed {
                name: self.name.clone(),
                details: format!("{err:#}"),
            })?;
        log::debug!("Linked program '{}' as {}.", self.name, self.handle);
        Ok(())
    }

    fn destroy(&mut self) {
        if !self.handle.is_none() {
            self.shared
                .driver
                .delete_object(GlObjectKind::Program, self.handle);
            self.handle = NativeHandle::NONE;
        }
    }
}

impl Drop for GlesShader {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl GpuResource for GlesShader {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Shader
    }

    fn native_handle(&self) -> NativeHandle {
        self.handle
    }
}

impl Shader for GlesShader {
    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &[String] {
        &self.attributes
    }
}
