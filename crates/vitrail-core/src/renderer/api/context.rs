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

//! Descriptors for the native context and the presentation window.

use crate::platform::VitrailWindowHandle;
use crate::renderer::api::core::NativeHandle;
use crate::renderer::api::util::TextureFormat;
use std::fmt;

/// Parameters for creating the native context.
#[derive(Clone, Default)]
pub struct ContextDescriptor {
    /// The window the context presents to, `None` for a surfaceless context.
    pub window_handle: Option<VitrailWindowHandle>,
    /// A context to share objects with.
    pub shared_context: Option<NativeHandle>,
}

impl fmt::Debug for ContextDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextDescriptor")
            .field("window_handle", &self.window_handle.is_some())
            .field("shared_context", &self.shared_context)
            .finish()
    }
}

/// The formats negotiated for the default framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceFormats {
    /// Color format.
    pub color: TextureFormat,
    /// Depth/stencil format.
    pub depth_stencil: TextureFormat,
}

impl Default for SurfaceFormats {
    fn default() -> Self {
        Self {
            color: TextureFormat::Rgba8Unorm,
            depth_stencil: TextureFormat::Depth24Stencil8,
        }
    }
}

/// Parameters for creating the presentation window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowDescriptor {
    /// Title of the surface.
    pub title: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Render into a device-owned framebuffer.
    pub offscreen: bool,
    /// Formats of the attachments.
    pub formats: SurfaceFormats,
}
