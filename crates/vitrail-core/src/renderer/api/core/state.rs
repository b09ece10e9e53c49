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

//! Device bootstrap state.

/// The bootstrap progress of a device.
///
/// Subsystems are built in declaration order. `Failed` behaves like
/// `Uninitialized`: nothing is alive and `initialize` may be called again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeviceState {
    /// Nothing has been created.
    #[default]
    Uninitialized,
    /// The native context exists and capabilities are known.
    ContextReady,
    /// The presentation surface exists.
    WindowReady,
    /// The submission queue exists.
    QueueReady,
    /// The command allocator exists.
    AllocatorReady,
    /// Every subsystem exists; factories may be used.
    Ready,
    /// The last `initialize` failed and everything was torn down.
    Failed,
}

impl DeviceState {
    /// Returns `true` once every subsystem is alive.
    pub const fn is_ready(self) -> bool {
        matches!(self, DeviceState::Ready)
    }

    /// Returns `true` if `initialize` may be called.
    pub const fn can_initialize(self) -> bool {
        matches!(self, DeviceState::Uninitialized | DeviceState::Failed)
    }
}
