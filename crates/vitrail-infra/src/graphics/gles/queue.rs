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
use vitrail_core::renderer::traits::{
    CommandBuffer, CommandBufferState, GpuResource, Queue, ResourceLifecycle,
};
use vitrail_core::renderer::ResourceError;

use super::command_allocator::GlesCommandAllocator;
use super::command_buffer::GlesCommandBuffer;
use super::commands;
use super::driver::GlesShared;
use super::state_cache::GlesStateCache;

/// Executes command buffers and counts what they draw until the next present.
#[derive(Debug)]
pub struct GlesQueue {
    shared: Rc<GlesShared>,
    queue_type: QueueType,
    draw_calls: u32,
    triangles: u32,
    live: bool,
}

impl GlesQueue {
    /// Creates an empty queue bound to the device.
    pub fn new(shared: Rc<GlesShared>) -> Self {
        Self {
            shared,
            queue_type: QueueType::Graphics,
            draw_calls: 0,
            triangles: 0,
            live: false,
        }
    }

    /// Replays each buffer, adds its counters and retires its storage.
    ///
    /// Every buffer is checked before anything executes, so a rejected
    /// submission has no effect.
    pub(crate) fn submit(
        &mut self,
        command_buffers: &mut [&mut GlesCommandBuffer],
        allocator: &mut GlesCommandAllocator,
        cache: &mut GlesStateCache,
        window_framebuffer: NativeHandle,
    ) -> Result<(), ResourceError> {
        for buffer in command_buffers.iter() {
            if buffer.buffer_kind() != CommandBufferKind::Primary
                || buffer.state() != CommandBufferState::Executable
            {
                return Err(ResourceError::InvalidState {
                    kind: ResourceKind::Queue,
                    reason: "only executable primary command buffers can be submitted"
                        .to_string(),
                });
            }
        }

        cache.invalidate();
        let driver = self.shared.driver.as_ref();
        for buffer in command_buffers.iter_mut() {
            let package = buffer.take_package(allocator.acquire());
            commands::execute(driver, cache, &package, window_framebuffer);
            self.draw_calls = self.draw_calls.saturating_add(package.draw_calls);
            self.triangles = self.triangles.saturating_add(package.triangles);
            allocator.retire(package);
        }
        Ok(())
    }
}

impl ResourceLifecycle for GlesQueue {
    type Descriptor<'a> = QueueDescriptor;
    const KIND: ResourceKind = ResourceKind::Queue;

    fn initialize(&mut self, descriptor: &QueueDescriptor) -> Result<(), ResourceError> {
        if descriptor.queue_type != QueueType::Graphics {
            return Err(ResourceError::InvalidDescriptor {
                kind: ResourceKind::Queue,
                reason: format!("GLES only has a graphics queue, got {:?}", descriptor.queue_type),
            });
        }
        self.queue_type = descriptor.queue_type;
        self.live = true;
        Ok(())
    }

    fn destroy(&mut self) {
        self.reset_counters();
        self.live = false;
    }
}

impl GpuResource for GlesQueue {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Queue
    }

    fn native_handle(&self) -> NativeHandle {
        NativeHandle::NONE
    }
}

impl Queue for GlesQueue {
    fn queue_type(&self) -> QueueType {
        self.queue_type
    }

    fn draw_calls(&self) -> u32 {
        self.draw_calls
    }

    fn triangles(&self) -> u32 {
        self.triangles
    }

    fn reset_counters(&mut self) {
        self.draw_calls = 0;
        self.triangles = 0;
    }
}
