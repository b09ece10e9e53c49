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
use vitrail_core::renderer::traits::{GpuResource, ResourceLifecycle, Sampler};
use vitrail_core::renderer::ResourceError;

/// Sampling state. GLES 2 applies it as texture parameters at bind time, so
/// there is no native object.
#[derive(Debug, Default)]
pub struct GlesSampler {
    descriptor: SamplerDescriptor,
}

impl GlesSampler {
    /// Creates a sampler with default state.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResourceLifecycle for GlesSampler {
    type Descriptor<'a> = SamplerDescriptor;
    const KIND: ResourceKind = ResourceKind::Sampler;

    fn initialize(&mut self, descriptor: &SamplerDescriptor) -> Result<(), ResourceError> {
        if descriptor.compare.is_some() {
            return Err(ResourceError::InvalidDescriptor {
                kind: ResourceKind::Sampler,
                reason: "comparison samplers need GLES 3".to_string(),
            });
        }
        self.descriptor = *descriptor;
        Ok(())
    }

    fn destroy(&mut self) {}
}

impl GpuResource for GlesSampler {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Sampler
    }

    fn native_handle(&self) -> NativeHandle {
        NativeHandle::NONE
    }
}

impl Sampler for GlesSampler {
    fn descriptor(&self) -> &SamplerDescriptor {
        &self.descriptor
    }
}
