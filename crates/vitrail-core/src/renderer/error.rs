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

//! Defines the hierarchy of error types for the graphics device layer.

use crate::renderer::api::core::Feature;
use crate::renderer::api::util::{ResourceKind, ShaderStage, TextureFormat};
use std::fmt;

/// An error related to building a shader program.
#[derive(Debug)]
pub enum ShaderError {
    /// The backend failed to compile or link the program.
    CompilationFailed {
        /// The name of the shader.
        name: String,
        /// Detailed messages from the compiler or linker.
        details: String,
    },
    /// A stage every program needs was not provided.
    MissingStage {
        /// The name of the shader.
        name: String,
        /// The missing stage.
        stage: ShaderStage,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::CompilationFailed { name, details } => {
                write!(f, "Shader compilation failed for '{name}': {details}")
            }
            ShaderError::MissingStage { name, stage } => {
                write!(f, "Shader '{name}' is missing its {stage:?} stage")
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// An error related to the creation or use of a GPU resource.
#[derive(Debug)]
pub enum ResourceError {
    /// A factory or transfer was called while the device is not ready.
    DeviceNotReady,
    /// The descriptor was rejected before any native object was touched.
    InvalidDescriptor {
        /// The kind of resource being built.
        kind: ResourceKind,
        /// Why the descriptor was rejected.
        reason: String,
    },
    /// The resource is not in a state that allows the requested operation.
    InvalidState {
        /// The kind of resource involved.
        kind: ResourceKind,
        /// A description of the mismatch.
        reason: String,
    },
    /// The texture format needs a capability the device did not report.
    UnsupportedFormat {
        /// The requested format.
        format: TextureFormat,
        /// The missing capability.
        feature: Feature,
    },
    /// An access fell outside the bounds of a resource.
    OutOfBounds,
    /// An error originating from the native driver.
    Backend(String),
    /// A shader-specific error occurred.
    Shader(ShaderError),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::DeviceNotReady => {
                write!(f, "The graphics device is not initialized.")
            }
            ResourceError::InvalidDescriptor { kind, reason } => {
                write!(f, "Invalid {kind} descriptor: {reason}")
            }
            ResourceError::InvalidState { kind, reason } => {
                write!(f, "Invalid {kind} state: {reason}")
            }
            ResourceError::UnsupportedFormat { format, feature } => {
                write!(f, "Format {format:?} requires unsupported feature {feature:?}")
            }
            ResourceError::OutOfBounds => write!(f, "Resource access out of bounds."),
            ResourceError::Backend(msg) => write!(f, "Backend resource error: {msg}"),
            ResourceError::Shader(err) => write!(f, "Shader resource error: {err}"),
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Shader(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShaderError> for ResourceError {
    fn from(err: ShaderError) -> Self {
        ResourceError::Shader(err)
    }
}

/// A device-level error.
#[derive(Debug)]
pub enum RenderError {
    /// An operation was attempted before the device was initialized.
    NotInitialized,
    /// `initialize` was called on a device that is already ready.
    AlreadyInitialized,
    /// A bootstrap step failed; everything built before it was torn down.
    InitializationFailed {
        /// The subsystem whose construction failed.
        step: ResourceKind,
        /// The underlying failure.
        reason: String,
    },
    /// An error occurred while managing a GPU resource.
    ResourceError(ResourceError),
    /// An unexpected or internal error occurred.
    Internal(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NotInitialized => write!(f, "The graphics device is not initialized."),
            RenderError::AlreadyInitialized => {
                write!(f, "The graphics device is already initialized.")
            }
            RenderError::InitializationFailed { step, reason } => {
                write!(f, "Device initialization failed at {step}: {reason}")
            }
            RenderError::ResourceError(err) => {
                write!(f, "Graphics resource operation failed: {err}")
            }
            RenderError::Internal(msg) => {
                write!(f, "An internal or unexpected error occurred: {msg}")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::ResourceError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::ResourceError(err)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn shader_error_display() {
        let err = ShaderError::MissingStage {
            name: "sprite".to_string(),
            stage: ShaderStage::Fragment,
        };
        assert_eq!(format!("{err}"), "Shader 'sprite' is missing its Fragment stage");
    }

    #[test]
    fn resource_error_display_wrapping_shader_error() {
        let res_err: ResourceError = ShaderError::CompilationFailed {
            name: "blit".to_string(),
            details: "0:1 syntax error".to_string(),
        }
        .into();
        assert_eq!(
            format!("{res_err}"),
            "Shader resource error: Shader compilation failed for 'blit': 0:1 syntax error"
        );
        assert!(res_err.source().is_some());
    }

    #[test]
    fn initialization_failure_names_the_step() {
        let err = RenderError::InitializationFailed {
            step: ResourceKind::CommandAllocator,
            reason: "out of memory".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "Device initialization failed at command allocator: out of memory"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn render_error_wraps_resource_error() {
        let render_err: RenderError = ResourceError::DeviceNotReady.into();
        assert_eq!(
            format!("{render_err}"),
            "Graphics resource operation failed: The graphics device is not initialized."
        );
        assert!(render_err.source().is_some());
    }
}
