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
use vitrail_core::renderer::traits::{CommandAllocator, GpuResource, ResourceLifecycle};
use vitrail_core::renderer::ResourceError;

use super::commands::CommandPackage;

/// Recycles command packages between frames.
///
/// Submitted packages are retired here and only become reusable after
/// `release_commands`, which the device calls once per presented frame.
#[derive(Debug, Default)]
pub struct GlesCommandAllocator {
    free: Vec<CommandPackage>,
    retired: Vec<CommandPackage>,
    max_recycled: usize,
    live: bool,
}

impl GlesCommandAllocator {
    /// Creates an empty allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out an empty package.
    pub(crate) fn acquire(&mut self) -> CommandPackage {
        self.free.pop().unwrap_or_default()
    }

    /// Takes back a package whose commands were executed.
    pub(crate) fn retire(&mut self, package: CommandPackage) {
        self.retired.push(package);
    }

    /// Packages ready for reuse.
    pub fn free_packages(&self) -> usize {
        self.free.len()
    }

    /// Packages waiting for the next release.
    pub fn retired_packages(&self) -> usize {
        self.retired.len()
    }
}

impl ResourceLifecycle for GlesCommandAllocator {
    type Descriptor<'a> = CommandAllocatorDescriptor;
    const KIND: ResourceKind = ResourceKind::CommandAllocator;

    fn initialize(&mut self, descriptor: &CommandAllocatorDescriptor) -> Result<(), ResourceError> {
        self.max_recycled = descriptor.max_recycled_packages;
        self.live = true;
        Ok(())
    }

    fn destroy(&mut self) {
        self.free.clear();
        self.retired.clear();
        self.live = false;
    }
}

impl GpuResource for GlesCommandAllocator {
    fn kind(&self) -> ResourceKind {
        ResourceKind::CommandAllocator
    }

    fn native_handle(&self) -> NativeHandle {
        NativeHandle::NONE
    }
}

impl CommandAllocator for GlesCommandAllocator {
    fn release_commands(&mut self) {
        for mut package in self.retired.drain(..) {
            if self.free.len() < self.max_recycled {
                package.clear();
                self.free.push(package);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrail_core::renderer::construct;

    #[test]
    fn test_release_caps_free_list() {
        let mut allocator = construct(
            GlesCommandAllocator::new(),
            &CommandAllocatorDescriptor {
                max_recycled_packages: 2,
            },
        )
        .unwrap();

        for _ in 0..3 {
            let mut package = allocator.acquire();
            package.draw_calls = 1;
            allocator.retire(package);
        }
        assert_eq!(allocator.retired_packages(), 3);

        allocator.release_commands();
        assert_eq!(allocator.retired_packages(), 0);
        assert_eq!(allocator.free_packages(), 2);
        assert_eq!(allocator.acquire().draw_calls, 0);
    }
}
