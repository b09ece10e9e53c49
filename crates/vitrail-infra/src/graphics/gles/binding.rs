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

use std::collections::HashSet;

use vitrail_core::renderer::api::*;
use vitrail_core::renderer::traits::{BindingLayout, GpuResource, PipelineLayout, ResourceLifecycle};
use vitrail_core::renderer::ResourceError;

/// Resource slots of a program, sorted by binding index.
#[derive(Debug, Default)]
pub struct GlesBindingLayout {
    entries: Vec<BindingLayoutEntry>,
}

impl GlesBindingLayout {
    /// Creates an empty layout.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResourceLifecycle for GlesBindingLayout {
    type Descriptor<'a> = BindingLayoutDescriptor;
    const KIND: ResourceKind = ResourceKind::BindingLayout;

    fn initialize(&mut self, descriptor: &BindingLayoutDescriptor) -> Result<(), ResourceError> {
        let mut seen = HashSet::new();
        for entry in &descriptor.entries {
            let reason = if !seen.insert(entry.binding) {
                format!("binding {} is declared twice", entry.binding)
            } else if entry.count == 0 {
                format!("binding {} has a zero count", entry.binding)
            } else if entry.visibility.is_empty() {
                format!("binding {} is visible to no stage", entry.binding)
            } else {
                continue;
            };
            return Err(ResourceError::InvalidDescriptor {
                kind: ResourceKind::BindingLayout,
                reason,
            });
        }

        self.entries = descriptor.entries.clone();
        self.entries.sort_by_key(|e| e.binding);
        Ok(())
    }

    fn destroy(&mut self) {
        self.entries.clear();
    }
}

impl GpuResource for GlesBindingLayout {
    fn kind(&self) -> ResourceKind {
        ResourceKind::BindingLayout
    }

    fn native_handle(&self) -> NativeHandle {
        NativeHandle::NONE
    }
}

impl BindingLayout for GlesBindingLayout {
    fn entries(&self) -> &[BindingLayoutEntry] {
        &self.entries
    }
}

/// The binding layouts a pipeline uses, one per set.
#[derive(Debug, Default)]
pub struct GlesPipelineLayout {
    sets: Vec<Vec<BindingLayoutEntry>>,
}

impl GlesPipelineLayout {
    /// Creates an empty layout.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResourceLifecycle for GlesPipelineLayout {
    type Descriptor<'a> = PipelineLayoutDescriptor<'a>;
    const KIND: ResourceKind = ResourceKind::PipelineLayout;

    fn initialize(
        &mut self,
        descriptor: &PipelineLayoutDescriptor<'_>,
    ) -> Result<(), ResourceError> {
        self.sets = descriptor
            .layouts
            .iter()
            .map(|layout| layout.entries().to_vec())
            .collect();
        Ok(())
    }

    fn destroy(&mut self) {
        self.sets.clear();
    }
}

impl GpuResource for GlesPipelineLayout {
    fn kind(&self) -> ResourceKind {
        ResourceKind::PipelineLayout
    }

    fn native_handle(&self) -> NativeHandle {
        NativeHandle::NONE
    }
}

impl PipelineLayout for GlesPipelineLayout {
    fn sets(&self) -> &[Vec<BindingLayoutEntry>] {
        &self.sets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrail_core::renderer::construct;

    fn entry(binding: u32) -> BindingLayoutEntry {
        BindingLayoutEntry {
            binding,
            ty: BindingType::UniformBuffer,
            count: 1,
            visibility: ShaderStageFlags::VERTEX,
            name: format!("block{binding}"),
        }
    }

    #[test]
    fn test_entries_are_sorted() {
        let layout = construct(
            GlesBindingLayout::new(),
            &BindingLayoutDescriptor {
                entries: vec![entry(2), entry(0)],
            },
        )
        .unwrap();
        let bindings: Vec<u32> = layout.entries().iter().map(|e| e.binding).collect();
        assert_eq!(bindings, [0, 2]);
    }

    #[test]
    fn test_duplicate_binding_is_rejected() {
        let result = construct(
            GlesBindingLayout::new(),
            &BindingLayoutDescriptor {
                entries: vec![entry(1), entry(1)],
            },
        );
        assert!(matches!(
            result,
            Err(ResourceError::InvalidDescriptor {
                kind: ResourceKind::BindingLayout,
                ..
            })
        ));
    }

    #[test]
    fn test_pipeline_layout_copies_sets() {
        let set0 = construct(
            GlesBindingLayout::new(),
            &BindingLayoutDescriptor {
                entries: vec![entry(0)],
            },
        )
        .unwrap();
        let layout = construct(
            GlesPipelineLayout::new(),
            &PipelineLayoutDescriptor {
                layouts: vec![&set0 as &dyn BindingLayout, &set0],
            },
        )
        .unwrap();
        assert_eq!(layout.sets().len(), 2);
        assert_eq!(layout.sets()[1][0].name, "block0");
    }
}
