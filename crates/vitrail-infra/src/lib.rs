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

//! # Vitrail Infra
//!
//! Concrete backends for the contracts defined in `vitrail-core`. The only
//! backend today drives OpenGL ES 2 through the [`GlesDriver`] boundary.
//!
//! [`GlesDriver`]: graphics::gles::GlesDriver

pub mod graphics;

pub use graphics::gles::{GlesDevice, GlesDriver, HeadlessDriver};
#[cfg(not(target_arch = "wasm32"))]
pub use graphics::gles::GlowDriver;
