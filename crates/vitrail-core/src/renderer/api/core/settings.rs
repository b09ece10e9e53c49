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

//! Device configuration.

use crate::platform::VitrailWindowHandle;
use crate::renderer::api::core::NativeHandle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configurable properties of a device, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    /// Logical width in points.
    pub width: u32,
    /// Logical height in points.
    pub height: u32,
    /// Backing width in pixels.
    pub native_width: u32,
    /// Backing height in pixels.
    pub native_height: u32,
    /// Render into a device-owned framebuffer instead of the window surface.
    pub offscreen: bool,
    /// Title given to the presentation surface, if any.
    pub window_title: String,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            native_width: 1280,
            native_height: 720,
            offscreen: false,
            window_title: "Vitrail".to_string(),
        }
    }
}

impl DeviceSettings {
    /// Parses settings from JSON. Missing fields take their default value.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Everything `initialize` needs: settings plus runtime-only handles.
#[derive(Clone, Default)]
pub struct DeviceInfo {
    /// Static configuration.
    pub settings: DeviceSettings,
    /// The native window the context binds to. `None` for headless use.
    pub window_handle: Option<VitrailWindowHandle>,
    /// A context to share objects with.
    pub shared_context: Option<NativeHandle>,
}

impl DeviceInfo {
    /// Creates device info from settings.
    pub fn new(settings: DeviceSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Sets the window handle.
    pub fn with_window(mut self, handle: VitrailWindowHandle) -> Self {
        self.window_handle = Some(handle);
        self
    }

    /// Sets the shared context.
    pub fn with_shared_context(mut self, context: NativeHandle) -> Self {
        self.shared_context = Some(context);
        self
    }
}

impl fmt::Debug for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceInfo")
            .field("settings", &self.settings)
            .field("window_handle", &self.window_handle.is_some())
            .field("shared_context", &self.shared_context)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings =
            DeviceSettings::from_json(r#"{ "width": 640, "offscreen": true }"#).unwrap();
        assert_eq!(settings.width, 640);
        assert_eq!(settings.height, 720);
        assert!(settings.offscreen);
        assert_eq!(settings.window_title, "Vitrail");
    }

    #[test]
    fn test_json_round_trip() {
        let settings = DeviceSettings {
            native_width: 2560,
            native_height: 1440,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(DeviceSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(DeviceSettings::from_json("{ width: }").is_err());
    }

    #[test]
    fn test_device_info_builder() {
        let info = DeviceInfo::new(DeviceSettings::default()).with_shared_context(NativeHandle(7));
        assert_eq!(info.shared_context, Some(NativeHandle(7)));
        assert!(format!("{info:?}").contains("window_handle: false"));
    }
}
