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

//! Defines data structures for shader programs.

use crate::renderer::api::util::ShaderStage;
use crate::vitrail_bitflags;

vitrail_bitflags! {
    /// The set of stages that can see a binding.
    pub struct ShaderStageFlags: u32 {
        /// The vertex stage.
        const VERTEX = 1 << 0;
        /// The fragment stage.
        const FRAGMENT = 1 << 1;
    }
}

impl From<ShaderStage> for ShaderStageFlags {
    fn from(stage: ShaderStage) -> Self {
        match stage {
            ShaderStage::Vertex => ShaderStageFlags::VERTEX,
            ShaderStage::Fragment => ShaderStageFlags::FRAGMENT,
        }
    }
}

/// The source of a single shader stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderStageSource {
    /// The stage this source implements.
    pub stage: ShaderStage,
    /// GLSL ES source text.
    pub source: String,
}

/// A descriptor used to create a shader program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderDescriptor {
    /// Program name, used in diagnostics.
    pub name: String,
    /// One source per stage.
    pub stages: Vec<ShaderStageSource>,
    /// Vertex attribute names, bound to locations in order.
    pub attributes: Vec<String>,
}

impl ShaderDescriptor {
    /// Builds a program descriptor from a vertex and a fragment source.
    pub fn new(name: impl Into<String>, vertex: &str, fragment: &str) -> Self {
        Self {
            name: name.into(),
            stages: vec![
                ShaderStageSource {
                    stage: ShaderStage::Vertex,
                    source: vertex.to_owned(),
                },
                ShaderStageSource {
                    stage: ShaderStage::Fragment,
                    source: fragment.to_owned(),
                },
            ],
            attributes: Vec::new(),
        }
    }

    /// Returns the source for `stage`, if provided.
    pub fn stage(&self, stage: ShaderStage) -> Option<&str> {
        self.stages
            .iter()
            .find(|s| s.stage == stage)
            .map(|s| s.source.as_str())
    }
}
